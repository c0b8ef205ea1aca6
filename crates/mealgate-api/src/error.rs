use thiserror::Error;

/// Top-level error type for the `mealgate-api` crate.
///
/// Covers authentication, transport, and backend failures.
/// `mealgate-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The stored token failed structural validation (not a JWT,
    /// undecodable payload, missing claims).
    #[error("Invalid session token: {reason}")]
    TokenInvalid { reason: String },

    /// The token's `exp` claim is in the past.
    #[error("Session token expired -- sign in again")]
    TokenExpired,

    /// The token is valid but its group claims don't grant check-in
    /// authority.
    #[error("Account is not an organizer for the current event")]
    NotOrganizer,

    // ── Backend ─────────────────────────────────────────────────────
    /// The backend answered with a non-200 status on a form read.
    /// The original client renders this as "You don't have access".
    #[error("Access denied by the registration backend (HTTP {status})")]
    AccessDenied { status: u16 },

    /// Any other non-success status from the backend.
    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
