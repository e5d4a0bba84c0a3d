//! CLI inspection entry point.
//!
//! # Responsibility
//! - Open the store from environment configuration.
//! - Print a deterministic summary of the published state.

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::process::ExitCode;
use tasktrack_core::selectors::{status_distribution, unique_assignees, unread_count};
use tasktrack_core::{KeyValueStore, LoadSource, Store, StoreConfig, TaskStatus};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Inspect the TaskTrack task/project store", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Check that the core library is linked
    Ping,

    /// Print collection counts, load sources and task status shares (default)
    Summary,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Summary) {
        Command::Ping => {
            println!("tasktrack_core ping={}", tasktrack_core::ping());
            println!("tasktrack_core version={}", tasktrack_core::core_version());
            ExitCode::SUCCESS
        }
        Command::Summary => run_summary(),
    }
}

fn run_summary() -> ExitCode {
    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::from(2);
        }
    };
    if let Err(err) = config.init_logging() {
        eprintln!("logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok command=summary persistent={}",
        config.storage_path.is_some()
    );

    let storage = match config.open_storage() {
        Ok(storage) => storage,
        Err(err) => {
            error!("event=cli_open_storage module=cli status=error error={err}");
            eprintln!("failed to open storage: {err}");
            return ExitCode::FAILURE;
        }
    };

    let store = Store::open(storage);
    let report = store.load_report();
    if [report.tasks, report.projects, report.notifications].contains(&LoadSource::Recovered) {
        warn!("event=cli_load module=cli status=recovered");
    }
    print_summary(&store);
    ExitCode::SUCCESS
}

fn print_summary<S: KeyValueStore>(store: &Store<S>) {
    let report = store.load_report();
    println!("tasks={} source={:?}", store.tasks().len(), report.tasks);
    println!("projects={} source={:?}", store.projects().len(), report.projects);
    println!(
        "notifications={} unread={} source={:?}",
        store.notifications().len(),
        unread_count(store.notifications()),
        report.notifications
    );

    let distribution = status_distribution(store.tasks());
    for status in TaskStatus::ALL {
        println!(
            "status.{}={:.0}%",
            status.as_str(),
            distribution.percent(status)
        );
    }
    println!("assignees={}", unique_assignees(store.tasks()).join(", "));
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_summary() {
        let cli = Cli::try_parse_from(["tasktrack"]).unwrap();
        assert_eq!(cli.command.unwrap_or(Command::Summary), Command::Summary);
    }

    #[test]
    fn ping_subcommand_parses() {
        let cli = Cli::try_parse_from(["tasktrack", "ping"]).unwrap();
        assert_eq!(cli.command, Some(Command::Ping));
    }

    #[test]
    fn unknown_subcommand_is_a_usage_error() {
        let err = Cli::try_parse_from(["tasktrack", "frobnicate"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn help_is_rendered_by_clap() {
        let err = Cli::try_parse_from(["tasktrack", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
