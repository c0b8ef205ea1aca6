// ── Core error types ──
//
// User-facing errors from mealgate-core. Consumers never see HTTP status
// plumbing or JSON parse failures directly -- the `From<mealgate_api::Error>`
// impl translates transport-layer errors into the four outcomes the
// check-in flow actually distinguishes.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No usable session -- the operator must go through the login portal.
    #[error("Sign in required: {reason}")]
    AuthRequired { reason: String },

    /// The backend refused the form read/write. Scanning stays disabled
    /// for the rest of the session.
    #[error("You don't have access (HTTP {status})")]
    AccessDenied { status: u16 },

    /// The attendee's history changed between our read and our write.
    /// One retry is attempted by the evaluator; a second conflict
    /// surfaces as this error.
    #[error("Redemption history for '{identifier}' changed mid-update")]
    UpdateConflict { identifier: String },

    /// Network or backend failure. State is left unchanged; nothing is
    /// retried automatically.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// Configuration problem (bad URL, bad meal windows).
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl From<mealgate_api::Error> for CoreError {
    fn from(err: mealgate_api::Error) -> Self {
        use mealgate_api::Error as Api;
        match err {
            Api::TokenInvalid { .. } | Api::TokenExpired => Self::AuthRequired {
                reason: err.to_string(),
            },
            Api::NotOrganizer => Self::AccessDenied { status: 403 },
            Api::AccessDenied { status } => Self::AccessDenied { status },
            Api::Backend { .. } | Api::Transport(_) | Api::InvalidUrl(_) => Self::Backend {
                message: err.to_string(),
            },
            Api::Deserialization { ref message, .. } => Self::Backend {
                message: format!("unreadable backend response: {message}"),
            },
        }
    }
}
