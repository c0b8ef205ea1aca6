//! The redemption decision -- the one rule the whole station exists for.

use crate::model::{MealHistory, SlotCode};

/// Approve or deny a redemption for `slot` given the attendee's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Slot not yet claimed -- caller appends it and persists.
    Approved,
    /// Slot already claimed -- nothing may be mutated.
    AlreadyUsed,
}

/// Approve iff `slot` is not present in `history`.
///
/// Denial is idempotent: it never mutates anything, so repeated calls with
/// the same inputs always deny.
pub fn decide(history: &MealHistory, slot: &SlotCode) -> Decision {
    if history.contains(slot) {
        Decision::AlreadyUsed
    } else {
        Decision::Approved
    }
}
