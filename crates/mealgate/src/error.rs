//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use mealgate_config::ConfigError;
use mealgate_core::CoreError;

/// Exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const ACCESS: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code)]
pub enum CliError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Sign in required: {reason}")]
    #[diagnostic(
        code(mealgate::auth_required),
        help(
            "Sign in at {login_url}, copy the issued token, then run:\n\
             mealgate login --token <jwt>"
        )
    )]
    AuthRequired { reason: String, login_url: String },

    // ── Access ───────────────────────────────────────────────────────
    #[error("You don't have access (HTTP {status})")]
    #[diagnostic(
        code(mealgate::access_denied),
        help("Your account must be in the organizer group for the current event.")
    )]
    AccessDenied { status: u16 },

    // ── Conflict ─────────────────────────────────────────────────────
    #[error("Redemption history for '{identifier}' changed mid-update")]
    #[diagnostic(
        code(mealgate::update_conflict),
        help("Another station recorded a redemption at the same moment. Re-scan the badge.")
    )]
    UpdateConflict { identifier: String },

    // ── Backend / connection ─────────────────────────────────────────
    #[error("Backend error: {message}")]
    #[diagnostic(
        code(mealgate::backend),
        help("Nothing was changed. Check connectivity and try again.")
    )]
    Backend { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mealgate::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No backend endpoint configured")]
    #[diagnostic(
        code(mealgate::no_endpoint),
        help(
            "Set `endpoint` in the config file (mealgate config init),\n\
             or pass --endpoint / MEALGATE_ENDPOINT."
        )
    )]
    NoEndpoint,

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(mealgate::config_exists), help("Use --force to overwrite it."))]
    ConfigExists { path: String },

    #[error("Configuration error: {0}")]
    #[diagnostic(code(mealgate::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(mealgate::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthRequired { .. } => exit_code::AUTH,
            Self::AccessDenied { .. } => exit_code::ACCESS,
            Self::UpdateConflict { .. } => exit_code::CONFLICT,
            Self::Backend { .. } => exit_code::CONNECTION,
            Self::Validation { .. } | Self::NoEndpoint | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the configured login URL to auth errors so the help text
    /// points somewhere real.
    pub fn from_core(err: CoreError, login_url: &str) -> Self {
        match err {
            CoreError::AuthRequired { reason } => Self::AuthRequired {
                reason,
                login_url: login_url.to_owned(),
            },
            CoreError::AccessDenied { status } => Self::AccessDenied { status },
            CoreError::UpdateConflict { identifier } => Self::UpdateConflict { identifier },
            CoreError::Backend { message } => Self::Backend { message },
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
