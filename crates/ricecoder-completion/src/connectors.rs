//! Fallback connectors
//!
//! Used when the analysis backend cannot answer. [`ContextConnector`] completes
//! from words already in the editor; [`CombinedConnector`] puts a runtime
//! session in front of it.

use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::backend::{ReplyConnector, RuntimeBackend};
use crate::error::{CompletionError, CompletionResult};
use crate::types::{CompletionReply, EditorRequest};

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"\b[_\p{Alphabetic}]\w*").expect("identifier pattern is valid")
    })
}

/// Completes from identifiers present in the editor text
#[derive(Debug, Clone, Default)]
pub struct ContextConnector;

impl ContextConnector {
    pub fn new() -> Self {
        Self
    }

    /// Identifiers of `text` extending `token`, in first-seen order
    pub fn candidates(text: &str, token: &str) -> Vec<String> {
        if token.is_empty() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        identifier_regex()
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|word| word.starts_with(token) && *word != token)
            .filter(|word| seen.insert(*word))
            .map(str::to_string)
            .collect()
    }
}

#[async_trait]
impl ReplyConnector for ContextConnector {
    fn name(&self) -> &str {
        "context"
    }

    async fn fetch(&self, request: &EditorRequest) -> CompletionResult<CompletionReply> {
        let token = &request.token;
        let mut reply = CompletionReply::new(
            token.offset,
            token.offset + token.text.chars().count(),
        );
        reply.matches = Self::candidates(&request.text, &token.text);
        Ok(reply)
    }
}

/// Runtime session backed by the context connector
///
/// Both halves are asked concurrently. A failing half counts as an empty reply.
pub struct CombinedConnector {
    runtime: Arc<dyn RuntimeBackend>,
    context: ContextConnector,
}

impl CombinedConnector {
    pub fn new(runtime: Arc<dyn RuntimeBackend>) -> Self {
        Self {
            runtime,
            context: ContextConnector::new(),
        }
    }
}

#[async_trait]
impl ReplyConnector for CombinedConnector {
    fn name(&self) -> &str {
        "runtime+context"
    }

    async fn fetch(&self, request: &EditorRequest) -> CompletionResult<CompletionReply> {
        let (runtime, context) = tokio::join!(
            self.runtime.fetch(request),
            self.context.fetch(request)
        );

        match (runtime, context) {
            (Ok(runtime), Ok(context)) => Ok(combine(runtime, context)),
            (Ok(runtime), Err(err)) => {
                warn!(error = %err, "Context completion failed");
                Ok(runtime)
            }
            (Err(err), Ok(context)) => {
                warn!(runtime = self.runtime.name(), error = %err, "Runtime completion failed");
                Ok(context)
            }
            (Err(runtime_err), Err(context_err)) => Err(CompletionError::backend_failure(
                self.name(),
                format!("runtime: {}; context: {}", runtime_err, context_err),
            )),
        }
    }
}

/// Runtime matches first, then context matches it lacks, over the runtime range
fn combine(runtime: CompletionReply, context: CompletionReply) -> CompletionReply {
    if runtime.is_empty() {
        return context;
    }
    if context.is_empty() {
        return runtime;
    }

    let mut combined = runtime;
    let mut added = 0;
    for text in context.matches {
        if combined.push_match(text) {
            added += 1;
        }
    }
    debug!(matches = combined.matches.len(), added, "Combined runtime and context replies");
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EditorToken;
    use ricecoder_vdoc::EditorPosition;

    struct StaticRuntime(CompletionResult<CompletionReply>);

    #[async_trait]
    impl ReplyConnector for StaticRuntime {
        fn name(&self) -> &str {
            "ipykernel"
        }

        async fn fetch(&self, _request: &EditorRequest) -> CompletionResult<CompletionReply> {
            match &self.0 {
                Ok(reply) => Ok(reply.clone()),
                Err(err) => Err(CompletionError::backend_failure("ipykernel", err.to_string())),
            }
        }
    }

    impl RuntimeBackend for StaticRuntime {
        fn language(&self) -> &str {
            "python"
        }
    }

    fn request() -> EditorRequest {
        EditorRequest::new(
            "cell-1",
            "mean_value = 1\nmedian = mean_value + me",
            EditorPosition::new(1, 24),
            EditorToken::new("me", "variable", 37),
        )
    }

    #[test]
    fn test_candidates_extend_the_token() {
        let candidates = ContextConnector::candidates("mean_value = me + median + mean_value", "me");
        assert_eq!(candidates, vec!["mean_value", "median"]);
    }

    #[test]
    fn test_candidates_skip_words_inside_numbers() {
        assert!(ContextConnector::candidates("x = 1mex", "me").is_empty());
        assert!(ContextConnector::candidates("median", "").is_empty());
    }

    #[tokio::test]
    async fn test_context_reply_covers_the_token() {
        let reply = ContextConnector::new().fetch(&request()).await.unwrap();
        assert_eq!((reply.range_start, reply.range_end), (37, 39));
        assert_eq!(reply.matches, vec!["mean_value", "median"]);
    }

    #[tokio::test]
    async fn test_combined_puts_runtime_first() {
        let runtime = CompletionReply::new(37, 39)
            .with_match("median", "instance")
            .with_match("memoryview", "class");
        let connector = CombinedConnector::new(Arc::new(StaticRuntime(Ok(runtime))));

        let reply = connector.fetch(&request()).await.unwrap();

        assert_eq!(reply.matches, vec!["median", "memoryview", "mean_value"]);
        assert_eq!(reply.type_of("memoryview"), Some("class"));
    }

    #[tokio::test]
    async fn test_combined_survives_runtime_failure() {
        let failing = Err(CompletionError::backend_failure("ipykernel", "kernel died"));
        let connector = CombinedConnector::new(Arc::new(StaticRuntime(failing)));

        let reply = connector.fetch(&request()).await.unwrap();
        assert_eq!(reply.matches, vec!["mean_value", "median"]);
    }
}
