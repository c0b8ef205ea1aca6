//! `mealgate slot` -- what meal window, if any, is open right now.

use chrono::{DateTime, Local};
use serde::Serialize;

use mealgate_core::SlotCode;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SlotInfo {
    slot: Option<SlotCode>,
    checked_at: DateTime<Local>,
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    // Slot resolution is pure local computation; it must work with no
    // endpoint and no token, so only the windows are pulled from config.
    let windows = mealgate_config::load_config()?.windows;
    let now = Local::now();

    let info = SlotInfo {
        slot: windows.current_slot(now.naive_local()),
        checked_at: now,
    };

    let rendered = output::render_single(&global.output, &info, detail, plain);
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn detail(info: &SlotInfo) -> String {
    match &info.slot {
        Some(slot) => format!("Active slot: {slot}"),
        None => "No meals available at this time".into(),
    }
}

fn plain(info: &SlotInfo) -> String {
    info.slot
        .as_ref()
        .map_or_else(|| "none".into(), ToString::to_string)
}
