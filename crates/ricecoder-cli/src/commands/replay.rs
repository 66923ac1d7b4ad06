// Replay a recorded completion scenario

use std::path::PathBuf;

use ricecoder_completion::CompletionOutcome;
use serde_json::{json, Value};
use tracing::info;

use super::{load_config, Command};
use crate::error::CliResult;
use crate::output;
use crate::scenario::Scenario;

/// Run one scenario through the broker and print the outcome as JSON
pub struct ReplayCommand {
    scenario: PathBuf,
    config: Option<PathBuf>,
}

impl ReplayCommand {
    pub fn new(scenario: PathBuf, config: Option<PathBuf>) -> Self {
        Self { scenario, config }
    }

    /// Replay the scenario and return the rendered outcome
    pub async fn run(&self) -> CliResult<Value> {
        let scenario = Scenario::load(&self.scenario)?;
        let config = load_config(self.config.as_deref())?;

        let mapper = scenario.mapper();
        let registry = scenario.registry()?;
        let broker = scenario.broker(config);

        info!(
            scenario = %self.scenario.display(),
            editor = %scenario.request.editor_id,
            "Replaying scenario"
        );

        let outcome = match &scenario.inserted {
            Some(inserted) => {
                broker
                    .complete_after_edit(&mapper, &registry, &scenario.request, inserted)
                    .await?
            }
            None => Some(
                broker
                    .complete(&mapper, &registry, &scenario.request, scenario.trigger_kind)
                    .await?,
            ),
        };

        Ok(render_outcome(outcome.as_ref()))
    }
}

#[async_trait::async_trait]
impl Command for ReplayCommand {
    async fn execute(&self) -> CliResult<()> {
        let rendered = self.run().await?;
        match rendered["status"].as_str() {
            Some("suppressed") => output::print_info("Completion suppressed for this token"),
            Some("not-triggered") => output::print_info("The edit does not open completion"),
            _ => {}
        }
        println!("{}", serde_json::to_string_pretty(&rendered)?);
        Ok(())
    }
}

/// JSON view of a broker outcome
///
/// `None` means the edit did not open completion.
pub fn render_outcome(outcome: Option<&CompletionOutcome>) -> Value {
    match outcome {
        None => json!({ "status": "not-triggered" }),
        Some(CompletionOutcome::Suppressed) => json!({ "status": "suppressed" }),
        Some(CompletionOutcome::Reply(reply)) => json!({ "status": "reply", "reply": reply }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ricecoder_completion::CompletionReply;

    #[test]
    fn test_render_outcome() {
        assert_eq!(render_outcome(None)["status"], "not-triggered");
        assert_eq!(
            render_outcome(Some(&CompletionOutcome::Suppressed))["status"],
            "suppressed"
        );

        let reply = CompletionReply::new(10, 12).with_match("mean", "function");
        let rendered = render_outcome(Some(&CompletionOutcome::Reply(reply)));
        assert_eq!(rendered["status"], "reply");
        assert_eq!(rendered["reply"]["rangeStart"], 10);
        assert_eq!(rendered["reply"]["matches"][0], "mean");
        assert_eq!(rendered["reply"]["metadata"]["itemTypes"][0]["type"], "function");
    }
}
