// Domain model types shared across the workspace.

pub mod history;
pub mod scan;
pub mod slot;

pub use history::MealHistory;
pub use scan::{ScanOutcome, ScanRecord, ScanResolution};
pub use slot::{Meal, SlotCode, weekday_abbrev};
