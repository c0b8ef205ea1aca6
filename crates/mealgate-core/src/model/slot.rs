//! Meal and slot-code types.
//!
//! A slot code is the unit of redemption: `{weekday}-{meal}`, e.g.
//! `mon-lunch`. One code gates one redemption per attendee.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// The three meals a day can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
}

impl Meal {
    /// Lowercase name as used in slot codes.
    pub fn name(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Three-letter lowercase weekday abbreviation for slot codes.
pub fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

/// A day+meal identifier string, e.g. `sat-dinner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotCode(String);

impl SlotCode {
    /// Build the code for a weekday and meal.
    pub fn new(day: Weekday, meal: Meal) -> Self {
        Self(format!("{}-{}", weekday_abbrev(day), meal.name()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlotCode {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_code_format() {
        assert_eq!(SlotCode::new(Weekday::Mon, Meal::Lunch).as_str(), "mon-lunch");
        assert_eq!(SlotCode::new(Weekday::Tue, Meal::Dinner).as_str(), "tue-dinner");
        assert_eq!(
            SlotCode::new(Weekday::Sun, Meal::Breakfast).as_str(),
            "sun-breakfast"
        );
    }
}
