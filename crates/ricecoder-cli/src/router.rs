// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::*;
use crate::error::CliResult;
use crate::logging;

/// rice-complete - completion broker for composite documents
#[derive(Parser, Debug)]
#[command(name = "rice-complete")]
#[command(bin_name = "rice-complete")]
#[command(about = "Replay completion requests against composite documents")]
#[command(
    long_about = "rice-complete: run completion requests through the composite document broker.\n\nA scenario file lays out the editors and virtual documents of one buffer,\nscripts what each backend answers, and holds the request to complete.\n\n  rice-complete replay notebook.yaml\n  rice-complete merge runtime.json analysis.json --line 'x = stats.me'"
)]
#[command(version)]
#[command(author = "RiceCoder Contributors")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Replay a recorded completion scenario
    #[command(about = "Run a scenario file through the completion broker")]
    Replay {
        /// Scenario file (.yaml, .yml or .json)
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,

        /// Broker configuration file
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Merge a runtime reply with an analysis reply
    #[command(about = "Merge two recorded completion replies")]
    Merge {
        /// Runtime reply (JSON)
        #[arg(value_name = "RUNTIME")]
        runtime: PathBuf,

        /// Analysis reply (JSON)
        #[arg(value_name = "ANALYSIS")]
        analysis: PathBuf,

        /// Text of the cursor line
        #[arg(long, value_name = "TEXT")]
        line: String,

        /// Broker configuration file
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse CLI arguments and route to appropriate handler
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        logging::init_logging(logging::level_from_flags(
            cli.log_level.as_deref(),
            cli.verbose,
            cli.quiet,
        ));

        Self::execute(&cli).await
    }

    /// Execute a parsed command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        match &cli.command {
            Commands::Replay { scenario, config } => {
                let cmd = ReplayCommand::new(scenario.clone(), config.clone());
                cmd.execute().await
            }
            Commands::Merge {
                runtime,
                analysis,
                line,
                config,
            } => {
                let cmd = MergeCommand::new(
                    runtime.clone(),
                    analysis.clone(),
                    line.clone(),
                    config.clone(),
                );
                cmd.execute().await
            }
        }
    }
}
