// Command handlers for rice-complete

pub mod merge;
pub mod replay;

pub use merge::MergeCommand;
pub use replay::{render_outcome, ReplayCommand};

use std::path::Path;

use ricecoder_completion::{CompletionConfig, ConfigLoader};

use crate::error::{CliError, CliResult};

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Load the broker configuration, or the defaults when no file is given
pub fn load_config(path: Option<&Path>) -> CliResult<CompletionConfig> {
    match path {
        Some(path) => ConfigLoader::load_from_path(path).map_err(|e| CliError::Config(e.to_string())),
        None => Ok(CompletionConfig::default()),
    }
}
