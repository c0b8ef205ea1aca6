//! `mealgate history <identifier>` -- show an attendee's claimed slots.

use tabled::Tabled;

use mealgate_core::HistoryStore;

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SlotRow {
    #[tabled(rename = "Slot")]
    slot: String,
}

pub async fn handle(args: &HistoryArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let settings = config::resolve(global)?;
    let evaluator = config::build_evaluator(global, &settings)?;

    let history = evaluator
        .store()
        .fetch(&args.identifier)
        .await
        .map_err(|e| CliError::from_core(e, &settings.login_url))?;

    if history.is_empty() {
        output::print_output("No meals redeemed yet", global.quiet);
        return Ok(());
    }

    let slots: Vec<String> = history.tokens().map(str::to_owned).collect();
    let rendered = output::render_list(
        &global.output,
        &slots,
        |s| SlotRow { slot: s.clone() },
        Clone::clone,
    );
    output::print_output(&rendered, global.quiet);
    Ok(())
}
