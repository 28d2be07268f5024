//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Revlane - versioned, reversible schema revisions
#[derive(Parser, Debug)]
#[command(name = "rl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Named target from the config file (or REVLANE_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the database path
    #[arg(short, long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply revisions up to a target
    Upgrade(UpgradeArgs),

    /// Revert revisions down to a target
    Downgrade(DowngradeArgs),

    /// Show the current revision
    Current,

    /// List all revisions and which are applied
    History(HistoryArgs),

    /// Record a revision as current without running it
    Stamp(StampArgs),

    /// Show the live schema
    Inspect(InspectArgs),
}

/// Arguments for the upgrade command
#[derive(Args, Debug)]
pub struct UpgradeArgs {
    /// `head`, a revision id or prefix, or `+N`
    #[arg(default_value = "head")]
    pub revision: String,

    /// Print the plan without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the downgrade command
#[derive(Args, Debug)]
pub struct DowngradeArgs {
    /// `base`, a revision id or prefix, or `-N`
    #[arg(allow_hyphen_values = true)]
    pub revision: String,

    /// Print the plan without running it
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: HistoryOutput,
}

/// History output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutput {
    /// One line per revision
    Text,
    /// JSON array
    Json,
}

/// Arguments for the stamp command
#[derive(Args, Debug)]
pub struct StampArgs {
    /// `head`, `base`, a revision id or prefix
    #[arg(allow_hyphen_values = true)]
    pub revision: String,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Only show this table
    pub table: Option<String>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
