//! Backend dispatch with fallback
//!
//! # Routing
//!
//! ```text
//! runtime applicable?  ──yes──> join(runtime, analysis) ──> ResultMerger
//!        │ no                          │ analysis failed
//!        v                             v
//!   analysis alone ──failed──> fallback connector (reply returned as is)
//! ```
//!
//! The runtime is applicable when a session exists, runtime completion is
//! enabled, and the session's language is the owning document's language.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use ricecoder_vdoc::VirtualDocument;
use tracing::{debug, info, warn};

use crate::backend::{ConnectionLookup, ReplyConnector, RuntimeBackend};
use crate::config::CompletionConfig;
use crate::connectors::{CombinedConnector, ContextConnector};
use crate::error::{CompletionError, CompletionResult};
use crate::hint::hint;
use crate::merger::ResultMerger;
use crate::types::{CompletionReply, CompletionRequest, EditorRequest, TriggerKind};

/// Dispatches requests to the analysis and runtime backends
pub struct CompletionFetcher {
    connections: Arc<dyn ConnectionLookup>,
    runtime: Option<Arc<dyn RuntimeBackend>>,
    fallback: Arc<dyn ReplyConnector>,
    context: Arc<dyn ReplyConnector>,
    merger: ResultMerger,
    config: CompletionConfig,
}

impl CompletionFetcher {
    /// Create a fetcher with the default configuration
    pub fn new(
        connections: Arc<dyn ConnectionLookup>,
        runtime: Option<Arc<dyn RuntimeBackend>>,
    ) -> Self {
        Self::with_config(connections, runtime, CompletionConfig::default())
    }

    /// Create a fetcher with an explicit configuration
    ///
    /// The fallback connector is the runtime+context connector when a runtime
    /// session is usable, the context connector otherwise.
    pub fn with_config(
        connections: Arc<dyn ConnectionLookup>,
        runtime: Option<Arc<dyn RuntimeBackend>>,
        config: CompletionConfig,
    ) -> Self {
        let runtime = runtime.filter(|_| config.runtime_enabled);
        let context: Arc<dyn ReplyConnector> = Arc::new(ContextConnector::new());
        let fallback: Arc<dyn ReplyConnector> = match &runtime {
            Some(runtime) => Arc::new(CombinedConnector::new(runtime.clone())),
            None => context.clone(),
        };
        let merger = ResultMerger::with_unknown_markers(config.unknown_type_markers.iter().cloned());

        Self {
            connections,
            runtime,
            fallback,
            context,
            merger,
            config,
        }
    }

    /// Replace the fallback connector
    pub fn with_fallback(mut self, fallback: Arc<dyn ReplyConnector>) -> Self {
        self.fallback = fallback;
        self
    }

    /// Name of the active fallback connector
    pub fn fallback_name(&self) -> &str {
        self.fallback.name()
    }

    /// Fallback connector for a document
    ///
    /// Documents the runtime session cannot execute get the context connector.
    pub fn fallback_for(&self, document: &VirtualDocument) -> &dyn ReplyConnector {
        if self.runtime.is_some() && !self.runtime_applicable(document) {
            self.context.as_ref()
        } else {
            self.fallback.as_ref()
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Analysis connections in use
    pub fn connections(&self) -> &dyn ConnectionLookup {
        self.connections.as_ref()
    }

    /// Whether the runtime session should be asked for this document
    pub fn runtime_applicable(&self, document: &VirtualDocument) -> bool {
        match &self.runtime {
            Some(runtime) if runtime.language() == document.language => true,
            Some(runtime) => {
                debug!(
                    runtime_language = runtime.language(),
                    document = %document.id_path,
                    language = %document.language,
                    "Runtime language does not match document, skipping runtime"
                );
                false
            }
            None => false,
        }
    }

    /// Fetch a reply for a built request
    ///
    /// `editor_request` is what the runtime and fallback connectors receive;
    /// `request` is what the analysis backend receives. `trigger_kind` is only
    /// passed to the analysis backend of this call.
    ///
    /// # Errors
    ///
    /// Any analysis failure, whatever the runtime did, goes to the fallback
    /// connector; if that fails too the result is a `BackendFailure`.
    pub async fn fetch(
        &self,
        editor_request: &EditorRequest,
        request: &CompletionRequest,
        trigger_kind: TriggerKind,
    ) -> CompletionResult<CompletionReply> {
        let Some(analysis) = self.connections.analysis_for(&request.document.id_path) else {
            let err = CompletionError::backend_unavailable("analysis", &request.document.id_path);
            return self.fall_back(editor_request, &request.document, err).await;
        };

        let analysis_call = self.timed(analysis.name(), hint(analysis.as_ref(), request, trigger_kind));

        match &self.runtime {
            Some(runtime) if self.runtime_applicable(&request.document) => {
                let (runtime_reply, analysis_reply) = tokio::join!(
                    self.timed(runtime.name(), runtime.fetch(editor_request)),
                    analysis_call
                );

                match analysis_reply {
                    Ok(analysis_reply) => {
                        let runtime_reply = runtime_reply.unwrap_or_else(|err| {
                            warn!(runtime = runtime.name(), error = %err, "Runtime completion failed, using analysis only");
                            CompletionReply::default()
                        });
                        Ok(self
                            .merger
                            .merge(&runtime_reply, &analysis_reply, editor_request.line_text()))
                    }
                    Err(err) => self.fall_back(editor_request, &request.document, err).await,
                }
            }
            _ => match analysis_call.await {
                Ok(reply) => Ok(reply),
                Err(err) => self.fall_back(editor_request, &request.document, err).await,
            },
        }
    }

    async fn fall_back(
        &self,
        editor_request: &EditorRequest,
        document: &VirtualDocument,
        err: CompletionError,
    ) -> CompletionResult<CompletionReply> {
        let fallback = self.fallback_for(document);
        info!(
            fallback = fallback.name(),
            document = %document.id_path,
            error = %err,
            "Analysis completion unavailable, using fallback connector"
        );

        self.timed(fallback.name(), fallback.fetch(editor_request))
            .await
            .map_err(|fallback_err| match fallback_err {
                CompletionError::BackendFailure { .. } => fallback_err,
                other => CompletionError::backend_failure(fallback.name(), other.to_string()),
            })
    }

    /// Run a backend call under the configured timeout
    async fn timed<T, F>(&self, backend: &str, call: F) -> CompletionResult<T>
    where
        F: Future<Output = CompletionResult<T>>,
    {
        let timeout_ms = self.config.request_timeout_ms;
        if timeout_ms == 0 {
            return call.await;
        }

        match tokio::time::timeout(Duration::from_millis(timeout_ms), call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(backend = backend, timeout_ms, "Backend call timed out");
                Err(CompletionError::timeout(backend, timeout_ms))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::AnalysisBackend;
    use crate::types::{CompletionItem, EditorToken, VirtualToken};
    use async_trait::async_trait;
    use ricecoder_vdoc::{EditorPosition, Span, VirtualPosition};
    use std::collections::HashMap;

    struct Items(Vec<&'static str>);

    #[async_trait]
    impl AnalysisBackend for Items {
        fn name(&self) -> &str {
            "pylsp"
        }

        async fn completion(
            &self,
            _cursor: VirtualPosition,
            _token: &VirtualToken,
            _typed_character: Option<char>,
            _trigger_kind: TriggerKind,
        ) -> CompletionResult<Vec<CompletionItem>> {
            Ok(self.0.iter().map(|label| CompletionItem::new(*label)).collect())
        }
    }

    struct Kernel(&'static str);

    #[async_trait]
    impl ReplyConnector for Kernel {
        fn name(&self) -> &str {
            "ipykernel"
        }

        async fn fetch(&self, _request: &EditorRequest) -> CompletionResult<CompletionReply> {
            Ok(CompletionReply::new(10, 12).with_match("memoryview", "class"))
        }
    }

    impl RuntimeBackend for Kernel {
        fn language(&self) -> &str {
            self.0
        }
    }

    fn requests(language: &str) -> (EditorRequest, CompletionRequest) {
        let editor_request = EditorRequest::new(
            "cell-1",
            "x = 1\nstats.me",
            EditorPosition::new(1, 8),
            EditorToken::new("me", "property", 12),
        );
        let request = CompletionRequest {
            token: VirtualToken {
                text: "me".to_string(),
                span: Span::new(VirtualPosition::new(1, 6), VirtualPosition::new(1, 8)),
            },
            cursor: VirtualPosition::new(1, 8),
            typed_character: Some('e'),
            document: VirtualDocument::new("nb", language),
            offset: 12,
        };
        (editor_request, request)
    }

    fn connections() -> Arc<dyn ConnectionLookup> {
        let mut map: HashMap<String, Arc<dyn AnalysisBackend>> = HashMap::new();
        map.insert("nb".to_string(), Arc::new(Items(vec!["mean", "median"])));
        Arc::new(map)
    }

    #[test]
    fn test_fallback_selection() {
        let fetcher = CompletionFetcher::new(connections(), None);
        assert_eq!(fetcher.fallback_name(), "context");

        let fetcher = CompletionFetcher::new(connections(), Some(Arc::new(Kernel("python"))));
        assert_eq!(fetcher.fallback_name(), "runtime+context");

        let config = CompletionConfig {
            runtime_enabled: false,
            ..Default::default()
        };
        let fetcher =
            CompletionFetcher::with_config(connections(), Some(Arc::new(Kernel("python"))), config);
        assert_eq!(fetcher.fallback_name(), "context");
        assert!(!fetcher.runtime_applicable(&VirtualDocument::new("nb", "python")));
    }

    #[test]
    fn test_fallback_for_skips_runtime_of_other_language() {
        let fetcher = CompletionFetcher::new(connections(), Some(Arc::new(Kernel("python"))));
        let python = VirtualDocument::new("nb", "python");
        let r = VirtualDocument::new("nb/r", "r");
        assert_eq!(fetcher.fallback_for(&python).name(), "runtime+context");
        assert_eq!(fetcher.fallback_for(&r).name(), "context");
    }

    #[test]
    fn test_runtime_applicable_requires_matching_language() {
        let fetcher = CompletionFetcher::new(connections(), Some(Arc::new(Kernel("python"))));
        assert!(fetcher.runtime_applicable(&VirtualDocument::new("nb", "python")));
        assert!(!fetcher.runtime_applicable(&VirtualDocument::new("nb/r", "r")));
    }

    #[tokio::test]
    async fn test_analysis_only() {
        let fetcher = CompletionFetcher::new(connections(), None);
        let (editor_request, request) = requests("python");

        let reply = fetcher
            .fetch(&editor_request, &request, TriggerKind::Invoked)
            .await
            .unwrap();

        assert_eq!(reply.matches, vec!["mean", "median"]);
        assert_eq!((reply.range_start, reply.range_end), (12, 14));
    }

    #[tokio::test]
    async fn test_runtime_and_analysis_are_merged() {
        let fetcher = CompletionFetcher::new(connections(), Some(Arc::new(Kernel("python"))));
        let (editor_request, request) = requests("python");

        let reply = fetcher
            .fetch(&editor_request, &request, TriggerKind::Invoked)
            .await
            .unwrap();

        assert_eq!(reply.matches, vec!["memoryview", "mean", "median"]);
        assert_eq!(reply.range_start, 12);
    }

    #[tokio::test]
    async fn test_missing_connection_falls_back_to_context() {
        let fetcher = CompletionFetcher::new(connections(), None);
        let (editor_request, mut request) = requests("python");
        request.document = VirtualDocument::new("other", "python");

        let reply = fetcher
            .fetch(&editor_request, &request, TriggerKind::Invoked)
            .await
            .unwrap();

        // the editor text holds no identifier extending `me`
        assert!(reply.is_empty());
        assert_eq!(reply.range_start, 12);
    }
}
