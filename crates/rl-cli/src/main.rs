//! Revlane CLI - apply and revert schema revisions

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;

use cli::Cli;
use commands::{current, downgrade, history, inspect, stamp, upgrade};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();

    match &cli.command {
        cli::Commands::Upgrade(args) => upgrade::execute(args, &cli.global).await,
        cli::Commands::Downgrade(args) => downgrade::execute(args, &cli.global).await,
        cli::Commands::Current => current::execute(&cli.global).await,
        cli::Commands::History(args) => history::execute(args, &cli.global).await,
        cli::Commands::Stamp(args) => stamp::execute(args, &cli.global).await,
        cli::Commands::Inspect(args) => inspect::execute(args, &cli.global).await,
    }
}
