//! Meal-slot resolution from wall-clock time.
//!
//! The hour windows are a product decision, not a technical one, and the
//! two historical client variants disagreed on the dinner upper bound
//! (21:00 vs 24:00). The bounds therefore come from configuration; the
//! defaults below are the conservative variant. Outside every window no
//! slot is active, which callers treat as "deny, nothing to redeem".

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::{Meal, SlotCode};

/// Half-open hour range `[start, end)` in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}

impl HourRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, hour: u32) -> bool {
        self.start <= hour && hour < self.end
    }
}

/// Configured meal windows. Windows are checked in meal order; they are
/// not expected to overlap, and the first match wins if they do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealWindows {
    pub breakfast: HourRange,
    pub lunch: HourRange,
    pub dinner: HourRange,
}

impl Default for MealWindows {
    fn default() -> Self {
        Self {
            breakfast: HourRange::new(6, 11),
            lunch: HourRange::new(11, 14),
            dinner: HourRange::new(17, 21),
        }
    }
}

impl MealWindows {
    /// The meal whose window contains `hour`, if any.
    pub fn meal_at(&self, hour: u32) -> Option<Meal> {
        if self.breakfast.contains(hour) {
            Some(Meal::Breakfast)
        } else if self.lunch.contains(hour) {
            Some(Meal::Lunch)
        } else if self.dinner.contains(hour) {
            Some(Meal::Dinner)
        } else {
            None
        }
    }

    /// The active slot code for a local timestamp, e.g. `mon-lunch`.
    ///
    /// `None` outside all windows -- a normal deny-path outcome.
    pub fn current_slot(&self, now: NaiveDateTime) -> Option<SlotCode> {
        self.meal_at(now.hour())
            .map(|meal| SlotCode::new(now.weekday(), meal))
    }
}
