//! Redemption history -- the server-held record of claimed slots.
//!
//! The backend stores history as a single space-delimited string. We treat
//! it as a set of whitespace-separated tokens: order is preserved for
//! round-tripping, membership is what matters for decisions.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::slot::SlotCode;

/// Parsed redemption history.
///
/// Parsing normalizes whitespace, so `"a  b"` and `"a b"` compare equal --
/// which is exactly the equality the compare-and-swap update wants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealHistory {
    tokens: Vec<String>,
}

impl MealHistory {
    /// Parse the server-side string. Malformed or empty input is an empty
    /// set, never an error.
    pub fn parse(raw: &str) -> Self {
        Self {
            tokens: raw.split_whitespace().map(str::to_owned).collect(),
        }
    }

    /// Whether a slot has already been claimed.
    pub fn contains(&self, slot: &SlotCode) -> bool {
        self.tokens.iter().any(|t| t == slot.as_str())
    }

    /// A copy with `slot` appended. The caller is responsible for only
    /// appending slots that are not already present.
    pub fn with(&self, slot: &SlotCode) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(slot.as_str().to_owned());
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// The claimed slot codes, in server order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl fmt::Display for MealHistory {
    /// Serialize back to the server's space-delimited form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}
