//! Runtime settings resolution: config file + env + CLI flags.
//!
//! Precedence, highest first: CLI flag, `MEALGATE_*` env var, config file,
//! built-in default. Token resolution follows the original client's order:
//! an explicitly supplied token (the `tkn` registration-flow bypass) wins
//! over the stored session token; no token at all is the sign-in-required
//! path.

use std::time::Duration;

use chrono::Utc;
use secrecy::SecretString;
use url::Url;

use mealgate_api::{BearerToken, CheckinClient, TlsMode, TransportConfig};
use mealgate_config as cfg;
use mealgate_core::{Evaluator, HttpHistoryStore, MealWindows};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Fallback portal URL when none is configured -- only used so error help
/// text always points somewhere.
const DEFAULT_LOGIN_URL: &str = "https://login.example-event.com";

/// Fully resolved runtime settings.
pub struct Settings {
    pub endpoint: Url,
    pub login_url: String,
    pub windows: MealWindows,
    pub transport: TransportConfig,
}

/// Resolve settings from the config file overlaid with global flags.
pub fn resolve(global: &GlobalOpts) -> Result<Settings, CliError> {
    let file = cfg::load_config()?;

    let endpoint_str = global
        .endpoint
        .clone()
        .or(file.endpoint)
        .ok_or(CliError::NoEndpoint)?;
    let endpoint: Url = endpoint_str.parse().map_err(|_| CliError::Validation {
        field: "endpoint".into(),
        reason: format!("invalid URL: {endpoint_str}"),
    })?;

    let login_url = file
        .login_url
        .unwrap_or_else(|| DEFAULT_LOGIN_URL.to_owned());

    let transport = TransportConfig {
        tls: if global.insecure || file.defaults.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: Duration::from_secs(global.timeout.unwrap_or(file.defaults.timeout)),
    };

    Ok(Settings {
        endpoint,
        login_url,
        windows: file.windows,
        transport,
    })
}

/// Resolve a live, organizer-scoped bearer token.
pub fn resolve_token(global: &GlobalOpts, settings: &Settings) -> Result<BearerToken, CliError> {
    let raw: Option<SecretString> = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| cfg::load_token(&cfg::token_path()));

    let Some(raw) = raw else {
        return Err(CliError::AuthRequired {
            reason: "no session token stored".into(),
            login_url: settings.login_url.clone(),
        });
    };

    BearerToken::decode_checked(raw, Utc::now())
        .map_err(|e| CliError::from_core(e.into(), &settings.login_url))
}

/// Build an evaluator over the HTTP history store.
pub fn build_evaluator(
    global: &GlobalOpts,
    settings: &Settings,
) -> Result<Evaluator<HttpHistoryStore>, CliError> {
    let token = resolve_token(global, settings)?;
    let client = CheckinClient::new(settings.endpoint.clone(), token, &settings.transport)
        .map_err(|e| CliError::from_core(e.into(), &settings.login_url))?;
    Ok(Evaluator::new(
        HttpHistoryStore::new(client),
        settings.windows.clone(),
    ))
}
