//! Shared configuration for the mealgate CLI and station.
//!
//! TOML config file + `MEALGATE_` environment overlay (figment), plus the
//! session-token file -- the CLI analog of the browser's persistent token
//! storage in the original check-in page. Both binaries depend on this
//! crate; the CLI adds flag-aware resolution on top.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use mealgate_core::MealWindows;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and station.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Registration backend API root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// SSO login portal root. Used for sign-in/sign-out hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login_url: Option<String>,

    /// Request defaults.
    pub defaults: Defaults,

    /// Meal-window hour ranges. The dinner upper bound in particular is
    /// deliberately configuration, not code.
    pub windows: MealWindows,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            login_url: None,
            defaults: Defaults::default(),
            windows: MealWindows::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Defaults {
    /// Request timeout in seconds.
    pub timeout: u64,

    /// Accept self-signed TLS certificates (staging backends).
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: 30,
            insecure: false,
        }
    }
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Path of the stored session token.
pub fn token_path() -> PathBuf {
    config_dir().join("session.jwt")
}

fn config_dir() -> PathBuf {
    ProjectDirs::from("org", "mealgate", "mealgate").map_or_else(dirs_fallback, |dirs| {
        dirs.config_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mealgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full config: defaults ← TOML file ← `MEALGATE_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path (tests, `--config`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MEALGATE_").split("__"))
        .extract()?;
    Ok(config)
}

/// Write a config file (used by `mealgate config init`).
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(config)?)?;
    Ok(())
}

// ── Session token storage ───────────────────────────────────────────

/// Store the session token at `path`.
pub fn save_token(token: &str, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token.trim())?;
    Ok(())
}

/// Load the stored session token, if one exists.
pub fn load_token(path: &Path) -> Option<SecretString> {
    let raw = fs::read_to_string(path).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| SecretString::from(trimmed.to_owned()))
}

/// Remove the stored session token (sign-out). Missing file is fine.
pub fn clear_token(path: &Path) -> Result<(), ConfigError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealgate_core::HourRange;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_when_no_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = load_config_from(&dir.path().join("missing.toml")).expect("load");
        assert_eq!(config.defaults.timeout, 30);
        assert_eq!(config.windows, MealWindows::default());
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn file_overrides_windows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
endpoint = "https://api.example.com"
login_url = "https://login.example.com"

[windows.dinner]
start = 17
end = 24
"#,
        )
        .expect("write");

        let config = load_config_from(&path).expect("load");
        assert_eq!(config.endpoint.as_deref(), Some("https://api.example.com"));
        assert_eq!(config.windows.dinner, HourRange::new(17, 24));
        // untouched windows keep their defaults
        assert_eq!(config.windows.lunch, HourRange::new(11, 14));
    }

    #[test]
    fn config_round_trips_through_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.endpoint = Some("https://api.example.com".into());
        config.windows.dinner = HourRange::new(17, 24);
        save_config(&config, &path).expect("save");

        let loaded = load_config_from(&path).expect("load");
        assert_eq!(loaded.endpoint, config.endpoint);
        assert_eq!(loaded.windows, config.windows);
    }

    #[test]
    fn token_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.jwt");

        assert!(load_token(&path).is_none());
        save_token("  abc.def.ghi\n", &path).expect("save");
        assert_eq!(
            load_token(&path).expect("token").expose_secret(),
            "abc.def.ghi"
        );
        clear_token(&path).expect("clear");
        assert!(load_token(&path).is_none());
        // clearing twice is fine
        clear_token(&path).expect("clear again");
    }
}
