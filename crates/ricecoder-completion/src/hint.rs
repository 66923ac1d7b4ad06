//! Turns analysis-backend items into a completion reply

use tracing::debug;

use crate::backend::AnalysisBackend;
use crate::error::{CompletionError, CompletionResult};
use crate::types::{CompletionItem, CompletionReply, CompletionRequest, TriggerKind};

/// Ask an analysis backend for candidates and build the reply
///
/// Every error coming out of the backend is reported as a backend error, so
/// the caller can always fall back.
pub async fn hint(
    backend: &dyn AnalysisBackend,
    request: &CompletionRequest,
    trigger_kind: TriggerKind,
) -> CompletionResult<CompletionReply> {
    let items = backend
        .completion(
            request.cursor,
            &request.token,
            request.typed_character,
            trigger_kind,
        )
        .await
        .map_err(|err| {
            if err.is_recoverable() {
                err
            } else {
                CompletionError::backend_failure(backend.name(), err.to_string())
            }
        })?;

    let reply = reply_from_items(&items, &request.token.text, request.offset);
    debug!(
        backend = backend.name(),
        document = %request.document.id_path,
        items = items.len(),
        matches = reply.matches.len(),
        "Analysis backend replied"
    );
    Ok(reply)
}

/// Build a reply from raw items for a token at `offset`
///
/// When no candidate extends the typed token the range starts one character
/// later, so the character that opened the list is kept. The start never
/// passes the end: an empty token with no items gives an empty range at
/// `offset`.
pub fn reply_from_items(items: &[CompletionItem], token_text: &str, offset: usize) -> CompletionReply {
    let mut all_non_prefixed = true;
    let mut reply = CompletionReply::default();

    for item in items {
        let text = item.display_text();
        if text.starts_with(token_text) {
            all_non_prefixed = false;
        }
        reply.tag_type(text, item.kind.map(|kind| kind.name()).unwrap_or_default());
        reply.push_match(text);
    }

    reply.range_end = offset + token_text.chars().count();
    reply.range_start = (offset + usize::from(all_non_prefixed)).min(reply.range_end);
    reply
}
