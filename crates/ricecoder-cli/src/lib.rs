//! Command-line front end of the composite completion broker
//!
//! The `rice-complete` binary replays recorded [`scenario::Scenario`]s
//! through [`ricecoder_completion::CompletionBroker`] and merges recorded
//! replies with [`ricecoder_completion::ResultMerger`].

pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;
pub mod scenario;

pub use error::{CliError, CliResult};
pub use scenario::{AnalysisScript, RuntimeScript, Scenario};
