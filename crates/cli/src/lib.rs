pub mod commands;
pub mod telemetry;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "regimen",
    about = "Regimen storefront operator CLI",
    long_about = "Run the guided peptide quiz, inspect the catalog and configuration, and \
                  manage persisted quiz progress.",
    after_help = "Examples:\n  regimen quiz\n  regimen recommend --goals muscle_growth,energy\n  regimen doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Run the interactive six-step recommendation quiz")]
    Quiz {
        #[arg(long, help = "Ignore any persisted quiz progress and start fresh")]
        fresh: bool,
    },
    #[command(about = "Run the recommendation engine once for a set of goals")]
    Recommend {
        #[arg(long, help = "Comma-separated goal ids, e.g. fat_loss,energy")]
        goals: String,
        #[arg(long, help = "Use the built-in seed catalog instead of the configured file")]
        seed: bool,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Load the catalog and summarize listings and goal coverage")]
    Catalog {
        #[arg(long, help = "Summarize the built-in seed catalog instead of the configured file")]
        seed: bool,
    },
    #[command(about = "Validate config, catalog readability, and progress-store writability")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Delete the persisted quiz progress snapshot")]
    Reset,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init_logging_best_effort();

    let result = match cli.command {
        Command::Quiz { fresh } => commands::quiz::run(fresh),
        Command::Recommend { goals, seed, json } => commands::recommend::run(&goals, seed, json),
        Command::Catalog { seed } => commands::catalog::run(seed),
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Reset => commands::reset::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
