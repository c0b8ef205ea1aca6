mod app;
mod event;
mod theme;
mod tui;
mod ui;

use chrono::Utc;
use color_eyre::eyre::{Result, eyre};
use directories::ProjectDirs;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use mealgate_api::{BearerToken, CheckinClient, TlsMode, TransportConfig};
use mealgate_config as cfg;
use mealgate_core::{Evaluator, HttpHistoryStore};

use crate::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    tui::install_hooks()?;
    let _log_guard = init_logging();

    let config = cfg::load_config()?;
    let evaluator = build_evaluator(&config)?;

    let mut app = App::new(evaluator, config.windows);
    app.run().await
}

/// Log to a file -- the terminal belongs to the UI.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dirs = ProjectDirs::from("org", "mealgate", "mealgate")?;
    let appender = tracing_appender::rolling::never(dirs.data_dir(), "station.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

fn build_evaluator(config: &cfg::Config) -> Result<Evaluator<HttpHistoryStore>> {
    let login_url = config
        .login_url
        .as_deref()
        .unwrap_or("the login portal")
        .to_owned();

    let endpoint: url::Url = config
        .endpoint
        .as_deref()
        .ok_or_else(|| eyre!("no endpoint configured -- run `mealgate config init` first"))?
        .parse()
        .map_err(|e| eyre!("invalid endpoint URL: {e}"))?;

    let raw = std::env::var("MEALGATE_TOKEN")
        .ok()
        .map(SecretString::from)
        .or_else(|| cfg::load_token(&cfg::token_path()))
        .ok_or_else(|| {
            eyre!("no session token -- sign in at {login_url} and run `mealgate login --token <jwt>`")
        })?;
    let token = BearerToken::decode_checked(raw, Utc::now())
        .map_err(|e| eyre!("{e} (sign in at {login_url})"))?;

    let transport = TransportConfig {
        tls: if config.defaults.insecure {
            TlsMode::DangerAcceptInvalid
        } else {
            TlsMode::System
        },
        timeout: std::time::Duration::from_secs(config.defaults.timeout),
    };

    let client = CheckinClient::new(endpoint, token, &transport)?;
    Ok(Evaluator::new(
        HttpHistoryStore::new(client),
        config.windows.clone(),
    ))
}
