//! Recorded completion scenarios
//!
//! A scenario describes a composite buffer (editor placements and virtual
//! regions), what each backend answers, and one editor-level request. Backends
//! are scripted, so a scenario replays the same way every time.
//!
//! ```yaml
//! editors:
//!   - { editor_id: cell-1, root_first_line: 0, line_count: 1 }
//! regions:
//!   - document: { id_path: nb, language: python }
//!     root_start: { line: 0, column: 0 }
//!     root_end: { line: 1, column: 0 }
//!     virtual_start: { line: 0, column: 0 }
//! analysis:
//!   nb:
//!     items: [{ label: mean }, { label: median }]
//! request:
//!   editor_id: cell-1
//!   text: "x = stats.me"
//!   cursor: { line: 0, column: 12 }
//!   token: { text: me, type: property, offset: 10 }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ricecoder_completion::{
    AnalysisBackend, CompletionBroker, CompletionConfig, CompletionError, CompletionFetcher,
    CompletionItem, CompletionReply, CompletionResult, EditorRequest, ReplyConnector,
    RuntimeBackend, SharedConnections, TriggerKind, VirtualToken,
};
use ricecoder_vdoc::{
    CoordinateMapper, EditorPlacement, VirtualDocumentRegistry, VirtualPosition, VirtualRegion,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Scripted analysis connection of one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisScript {
    /// Items returned on success
    pub items: Vec<CompletionItem>,
    /// Trigger characters the connection declares
    pub trigger_characters: Vec<String>,
    /// Fail every call
    pub fail: bool,
    /// Delay before answering
    pub delay_ms: u64,
}

/// Scripted runtime session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeScript {
    /// Language the session executes
    pub language: String,
    /// Reply returned on success
    #[serde(default)]
    pub reply: CompletionReply,
    /// Fail every call
    #[serde(default)]
    pub fail: bool,
}

/// A recorded completion scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub editors: Vec<EditorPlacement>,
    pub regions: Vec<VirtualRegion>,
    #[serde(default)]
    pub analysis: HashMap<String, AnalysisScript>,
    #[serde(default)]
    pub runtime: Option<RuntimeScript>,
    pub request: EditorRequest,
    #[serde(default)]
    pub trigger_kind: TriggerKind,
    /// Text inserted by the edit; when set, completion only runs if it auto-invokes
    #[serde(default)]
    pub inserted: Option<String>,
}

impl Scenario {
    /// Load a scenario, picking the format from the file extension
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Err(CliError::Scenario(format!(
                "unsupported scenario file: {}",
                path.display()
            ))),
        }
    }

    /// Coordinate mapper with the scenario's editor placements
    pub fn mapper(&self) -> CoordinateMapper {
        let mut mapper = CoordinateMapper::new();
        for placement in &self.editors {
            mapper.place_editor(placement.clone());
        }
        mapper
    }

    /// Registry with the scenario's regions
    pub fn registry(&self) -> CliResult<VirtualDocumentRegistry> {
        let mut registry = VirtualDocumentRegistry::new();
        for region in &self.regions {
            registry
                .register_region(region.clone())
                .map_err(|e| CliError::Scenario(e.to_string()))?;
        }
        Ok(registry)
    }

    /// Broker wired to the scenario's scripted backends
    pub fn broker(&self, config: CompletionConfig) -> CompletionBroker {
        let connections = Arc::new(SharedConnections::new());
        for (id_path, script) in &self.analysis {
            connections.connect(id_path.clone(), Arc::new(ScriptedAnalysis(script.clone())));
        }

        let runtime = self
            .runtime
            .clone()
            .map(|script| Arc::new(ScriptedRuntime(script)) as Arc<dyn RuntimeBackend>);

        debug!(
            analysis = self.analysis.len(),
            runtime = runtime.is_some(),
            "Wired scenario backends"
        );
        CompletionBroker::new(CompletionFetcher::with_config(connections, runtime, config))
    }
}

struct ScriptedAnalysis(AnalysisScript);

#[async_trait]
impl AnalysisBackend for ScriptedAnalysis {
    fn name(&self) -> &str {
        "scripted-analysis"
    }

    async fn completion(
        &self,
        _cursor: VirtualPosition,
        _token: &VirtualToken,
        _typed_character: Option<char>,
        _trigger_kind: TriggerKind,
    ) -> CompletionResult<Vec<CompletionItem>> {
        if self.0.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.0.delay_ms)).await;
        }
        if self.0.fail {
            return Err(CompletionError::backend_failure(self.name(), "scripted failure"));
        }
        Ok(self.0.items.clone())
    }

    fn trigger_characters(&self) -> Vec<String> {
        self.0.trigger_characters.clone()
    }
}

struct ScriptedRuntime(RuntimeScript);

#[async_trait]
impl ReplyConnector for ScriptedRuntime {
    fn name(&self) -> &str {
        "scripted-runtime"
    }

    async fn fetch(&self, _request: &EditorRequest) -> CompletionResult<CompletionReply> {
        if self.0.fail {
            return Err(CompletionError::backend_failure(self.name(), "scripted failure"));
        }
        Ok(self.0.reply.clone())
    }
}

impl RuntimeBackend for ScriptedRuntime {
    fn language(&self) -> &str {
        &self.0.language
    }
}
