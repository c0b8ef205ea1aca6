//! `mealgate config` -- show, initialize, and locate the config file.

use mealgate_config as cfg;

use crate::cli::{ConfigAction, ConfigArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match &args.action {
        ConfigAction::Show => show(global),
        ConfigAction::Init { force } => init(*force, global),
        ConfigAction::Path => {
            output::print_output(&cfg::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let config = cfg::load_config()?;
    let rendered = toml::to_string_pretty(&config).map_err(cfg::ConfigError::from)?;
    output::print_output(rendered.trim_end(), global.quiet);
    Ok(())
}

fn init(force: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let path = cfg::config_path();
    if path.exists() && !force {
        return Err(CliError::ConfigExists {
            path: path.display().to_string(),
        });
    }

    let mut starter = cfg::Config::default();
    starter.endpoint = Some("https://api.example-event.com".into());
    starter.login_url = Some("https://login.example-event.com".into());
    cfg::save_config(&starter, &path)?;

    output::print_output(
        &format!("Wrote starter config to {}", path.display()),
        global.quiet,
    );
    Ok(())
}
