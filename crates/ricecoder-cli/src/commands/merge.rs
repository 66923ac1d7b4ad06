// Merge a runtime reply with an analysis reply

use std::path::{Path, PathBuf};

use ricecoder_completion::{CompletionReply, ResultMerger};
use tracing::debug;

use super::{load_config, Command};
use crate::error::{CliError, CliResult};

/// Merge two recorded replies and print the result as JSON
pub struct MergeCommand {
    runtime: PathBuf,
    analysis: PathBuf,
    line: String,
    config: Option<PathBuf>,
}

impl MergeCommand {
    pub fn new(runtime: PathBuf, analysis: PathBuf, line: String, config: Option<PathBuf>) -> Self {
        Self {
            runtime,
            analysis,
            line,
            config,
        }
    }

    /// Merge the replies
    pub fn run(&self) -> CliResult<CompletionReply> {
        let config = load_config(self.config.as_deref())?;
        let runtime = read_reply(&self.runtime)?;
        let analysis = read_reply(&self.analysis)?;

        debug!(
            runtime = runtime.matches.len(),
            analysis = analysis.matches.len(),
            "Merging recorded replies"
        );

        let merger = ResultMerger::with_unknown_markers(config.unknown_type_markers);
        Ok(merger.merge(&runtime, &analysis, &self.line))
    }
}

#[async_trait::async_trait]
impl Command for MergeCommand {
    async fn execute(&self) -> CliResult<()> {
        let merged = self.run()?;
        println!("{}", serde_json::to_string_pretty(&merged)?);
        Ok(())
    }
}

fn read_reply(path: &Path) -> CliResult<CompletionReply> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::InvalidArgument {
        message: format!("{} is not a completion reply: {}", path.display(), e),
    })
}
