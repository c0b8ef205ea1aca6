//! Clap derive structures for the `mealgate` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mealgate -- event meal check-in from the command line
#[derive(Debug, Parser)]
#[command(
    name = "mealgate",
    version,
    about = "Check attendees in for meals at the event",
    long_about = "Meal check-in against the registration backend.\n\n\
        Scan badges at a station with `mealgate-station`, or check a single\n\
        attendee in manually with `mealgate check <identifier>`.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Registration backend API root (overrides config file)
    #[arg(long, short = 'e', env = "MEALGATE_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Session token (bypasses the stored token; registration-flow analog
    /// of the `tkn` query parameter)
    #[arg(long, env = "MEALGATE_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MEALGATE_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MEALGATE_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MEALGATE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check one attendee in for the current meal slot
    #[command(alias = "c")]
    Check(CheckArgs),

    /// Show an attendee's redemption history
    #[command(alias = "h")]
    History(HistoryArgs),

    /// Show the currently active meal slot
    Slot,

    /// Store a session token from the login portal
    Login(LoginArgs),

    /// Remove the stored session token
    Logout,

    /// Manage configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Per-command args ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Attendee identifier (badge code / user id)
    pub identifier: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Attendee identifier (badge code / user id)
    pub identifier: String,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// JWT issued by the login portal. Without this, prints the portal URL.
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a starter config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file path
    Path,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
