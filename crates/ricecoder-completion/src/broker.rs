//! Top-level completion pipeline
//!
//! `TriggerPolicy` gate, then `RequestBuilder`, then `CompletionFetcher`
//! (which merges when two backends answered).

use ricecoder_vdoc::{CoordinateMapper, VirtualDocument, VirtualDocumentRegistry};
use tracing::debug;

use crate::config::CompletionConfig;
use crate::error::CompletionResult;
use crate::fetcher::CompletionFetcher;
use crate::request::RequestBuilder;
use crate::trigger::TriggerPolicy;
use crate::types::{CompletionOutcome, EditorRequest, TriggerKind};

/// Completion broker for one composite buffer
///
/// The mapper and registry are passed per call: they belong to the layer that
/// lays out the buffer and may change between keystrokes.
pub struct CompletionBroker {
    policy: TriggerPolicy,
    fetcher: CompletionFetcher,
}

impl CompletionBroker {
    /// Create a broker whose suppression set comes from the fetcher's configuration
    pub fn new(fetcher: CompletionFetcher) -> Self {
        Self {
            policy: TriggerPolicy::from_config(fetcher.config()),
            fetcher,
        }
    }

    pub fn policy(&self) -> &TriggerPolicy {
        &self.policy
    }

    pub fn config(&self) -> &CompletionConfig {
        self.fetcher.config()
    }

    /// Complete at the request's cursor
    ///
    /// # Errors
    ///
    /// Mapping and resolution failures abort the request. Backend failures are
    /// recovered through the fallback connector when possible.
    pub async fn complete(
        &self,
        mapper: &CoordinateMapper,
        registry: &VirtualDocumentRegistry,
        request: &EditorRequest,
        trigger_kind: TriggerKind,
    ) -> CompletionResult<CompletionOutcome> {
        if self.policy.should_suppress(&request.token.token_type) {
            debug!(
                token_type = %request.token.token_type,
                editor = %request.editor_id,
                "Suppressing completion"
            );
            return Ok(CompletionOutcome::Suppressed);
        }

        let built = RequestBuilder::new(mapper, registry).build_for(request)?;
        let reply = self.fetcher.fetch(request, &built, trigger_kind).await?;

        debug!(
            document = %built.document.id_path,
            matches = reply.matches.len(),
            range_start = reply.range_start,
            range_end = reply.range_end,
            "Completion finished"
        );
        Ok(CompletionOutcome::Reply(reply))
    }

    /// Complete after an edit if the inserted text ends with a trigger character
    ///
    /// Returns `None` when the edit does not auto-invoke completion. Tokens
    /// inside suppressed categories are `Suppressed` before any mapping.
    pub async fn complete_after_edit(
        &self,
        mapper: &CoordinateMapper,
        registry: &VirtualDocumentRegistry,
        request: &EditorRequest,
        inserted: &str,
    ) -> CompletionResult<Option<CompletionOutcome>> {
        if self.policy.should_suppress(&request.token.token_type) {
            debug!(
                token_type = %request.token.token_type,
                editor = %request.editor_id,
                "Suppressing completion after edit"
            );
            return Ok(Some(CompletionOutcome::Suppressed));
        }

        let root = mapper.to_root(request.token_start(), &request.editor_id)?;
        let document = registry.document_at(root)?;

        match self.auto_invoke_kind(inserted, document) {
            Some(kind) => Ok(Some(self.complete(mapper, registry, request, kind).await?)),
            None => Ok(None),
        }
    }

    /// Trigger characters of a document's language
    ///
    /// Characters reported by the analysis connection win over configured ones.
    pub fn trigger_characters(&self, document: &VirtualDocument) -> Vec<String> {
        let reported = self
            .fetcher
            .connections()
            .analysis_for(&document.id_path)
            .map(|backend| backend.trigger_characters())
            .unwrap_or_default();

        if reported.is_empty() {
            self.config()
                .trigger_characters_for(&document.language)
                .to_vec()
        } else {
            reported
        }
    }

    /// Trigger kind for an edit, if the edit should open completion
    pub fn auto_invoke_kind(&self, inserted: &str, document: &VirtualDocument) -> Option<TriggerKind> {
        let last = TriggerPolicy::last_typed_character(inserted)?;
        self.policy
            .should_auto_invoke(&last, &self.trigger_characters(document))
            .then_some(TriggerKind::TriggerCharacter)
    }
}
