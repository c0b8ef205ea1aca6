//! Scan records -- the transient, in-memory log of badge scans.
//!
//! Entries exist only to deduplicate rapid rescans and to render the last
//! outcome; nothing here survives a process restart.

use chrono::{DateTime, Local};
use serde::Serialize;

use super::slot::SlotCode;

/// Outcome of a single redemption decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// Slot was not in the history; redemption recorded.
    Approved { slot: SlotCode },
    /// Slot already claimed; nothing written.
    AlreadyUsed { slot: SlotCode },
    /// Current time falls outside every meal window. A deny, not an error.
    NoActiveSlot,
}

impl ScanOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }

    /// The slot this outcome was decided for, if any.
    pub fn slot(&self) -> Option<&SlotCode> {
        match self {
            Self::Approved { slot } | Self::AlreadyUsed { slot } => Some(slot),
            Self::NoActiveSlot => None,
        }
    }

    /// Short status word for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approved { .. } => "approved",
            Self::AlreadyUsed { .. } | Self::NoActiveSlot => "denied",
        }
    }
}

/// One entry in the in-memory scan log.
#[derive(Debug, Clone, Serialize)]
pub struct ScanRecord {
    pub identifier: String,
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    pub at: DateTime<Local>,
}

/// What a scan resolved to, and whether it was answered from the log.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResolution {
    #[serde(flatten)]
    pub record: ScanRecord,
    /// `true` when the outcome was reused from a scan within the dedup
    /// window instead of being recomputed.
    pub deduplicated: bool,
}
