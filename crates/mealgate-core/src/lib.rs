// mealgate-core: Meal-redemption domain layer between mealgate-api and
// the CLI / station binaries.

pub mod capture;
pub mod decision;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod scan_log;
pub mod slots;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use capture::{CaptureState, ScanCapture, ScanEvent, ScanKey};
pub use decision::{Decision, decide};
pub use error::CoreError;
pub use evaluator::Evaluator;
pub use scan_log::ScanLog;
pub use slots::{HourRange, MealWindows};
pub use store::{HistoryStore, HttpHistoryStore, MemoryStore};

pub use model::{Meal, MealHistory, ScanOutcome, ScanRecord, ScanResolution, SlotCode};
