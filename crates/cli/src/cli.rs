use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use tripwire_rules::loader::DEFAULT_CONFIG_PATH;

/// Budget tripwires: push alerts when category spending crosses a threshold.
#[derive(Parser, Debug)]
#[command(name = "tripwire", version, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Evaluate all rules once and deliver any new alerts.
    Run(RunArgs),
    /// Load and validate the rules file without contacting any service.
    Check(ConfigArg),
    /// Send a test notification through every configured channel.
    TestNotify,
    /// Inspect or clean up persisted alert state.
    #[command(subcommand)]
    State(StateCommand),
}

#[derive(Args, Debug)]
pub struct ConfigArg {
    /// Path to the alert rules file
    #[arg(long, env = "TRIPWIRE_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArg,

    /// Evaluate and print alerts without sending them or saving state
    #[arg(long)]
    pub dry_run: bool,

    /// Evaluate as of this RFC 3339 instant instead of the current time
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Subcommand, Debug)]
pub enum StateCommand {
    /// Print the stored last-fired timestamps as JSON.
    Show,
    /// Remove entries that last fired more than N days ago.
    Prune {
        #[arg(long)]
        older_than_days: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_run_with_flags() {
        let args = CliArgs::try_parse_from([
            "tripwire",
            "run",
            "--config",
            "rules.yaml",
            "--dry-run",
            "--now",
            "2026-04-16T00:00:00Z",
        ])
        .unwrap();
        match args.command {
            Command::Run(run) => {
                assert_eq!(run.config.config, PathBuf::from("rules.yaml"));
                assert!(run.dry_run);
                assert_eq!(run.now.unwrap().to_rfc3339(), "2026-04-16T00:00:00+00:00");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_state_prune() {
        let args =
            CliArgs::try_parse_from(["tripwire", "state", "prune", "--older-than-days", "60"]).unwrap();
        assert!(matches!(
            args.command,
            Command::State(StateCommand::Prune { older_than_days: 60 })
        ));
    }

    #[test]
    fn rejects_bad_timestamp() {
        assert!(CliArgs::try_parse_from(["tripwire", "run", "--now", "yesterday"]).is_err());
    }
}
