// Command handlers -- one module per subcommand.

pub mod check;
pub mod config_cmd;
pub mod history;
pub mod login;
pub mod slot;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Check(args) => check::handle(&args, global).await,
        Command::History(args) => history::handle(&args, global).await,
        Command::Slot => slot::handle(global),
        Command::Login(args) => login::login(&args, global),
        Command::Logout => login::logout(global),
        Command::Config(args) => config_cmd::handle(&args, global),
        // completions are generated in main before dispatch
        Command::Completions(_) => Ok(()),
    }
}
