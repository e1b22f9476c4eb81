mod cli;
mod commands;
mod run;

use anyhow::Result;
use clap::Parser;

use tripwire_core::config::{load_dotenv, Config};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    load_dotenv();
    let config = Config::from_env();
    config.log_summary();

    match args.command {
        Command::Run(run) => commands::run(&config, run).await,
        Command::Check(arg) => commands::check(&arg.config),
        Command::TestNotify => commands::test_notify(&config).await,
        Command::State(command) => commands::state(&config, command).await,
    }
}
