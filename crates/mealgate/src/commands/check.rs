//! `mealgate check <identifier>` -- the manual-entry check-in path.

use chrono::Local;
use owo_colors::OwoColorize;

use mealgate_core::{ScanOutcome, ScanResolution};

use crate::cli::{CheckArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: &CheckArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let settings = config::resolve(global)?;
    let mut evaluator = config::build_evaluator(global, &settings)?;

    let resolution = evaluator
        .scan(&args.identifier, Local::now())
        .await
        .map_err(|e| CliError::from_core(e, &settings.login_url))?;

    let rendered = output::render_single(&global.output, &resolution, detail, plain);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn detail(resolution: &ScanResolution) -> String {
    let color = output::should_color();
    let line = match &resolution.record.outcome {
        ScanOutcome::Approved { slot } => {
            let status = if color {
                "approved".green().bold().to_string()
            } else {
                "approved".into()
            };
            format!("{status}  {slot} for {}", resolution.record.identifier)
        }
        ScanOutcome::AlreadyUsed { slot } => {
            let status = if color {
                "denied".red().bold().to_string()
            } else {
                "denied".into()
            };
            format!(
                "{status}  {slot} already used by {}",
                resolution.record.identifier
            )
        }
        ScanOutcome::NoActiveSlot => "No meals available at this time".into(),
    };
    if resolution.deduplicated {
        format!("{line}  (repeat scan, outcome reused)")
    } else {
        line
    }
}

fn plain(resolution: &ScanResolution) -> String {
    resolution.record.outcome.label().to_owned()
}
