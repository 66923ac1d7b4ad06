//! Reply merging

use crate::types::{CompletionReply, ItemTypeTag, ReplyMetadata};
use std::collections::HashSet;
use tracing::debug;

/// Merges a runtime reply into an analysis reply
///
/// The merged reply always uses the analysis reply's range. Runtime candidates
/// the analysis backend did not produce and that carry a known type are
/// surfaced first; the remaining runtime candidates follow the analysis ones.
#[derive(Debug, Clone)]
pub struct ResultMerger {
    unknown_type_markers: Vec<String>,
}

impl ResultMerger {
    /// Create a merger treating `"<unknown>"` and `"unknown"` as unknown types
    pub fn new() -> Self {
        Self::with_unknown_markers(["<unknown>", "unknown"])
    }

    /// Create a merger with custom unknown-type markers
    pub fn with_unknown_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unknown_type_markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    fn is_unknown(&self, item_type: &str) -> bool {
        self.unknown_type_markers.iter().any(|m| m == item_type)
    }

    /// Merge a runtime reply and an analysis reply
    ///
    /// # Arguments
    ///
    /// * `runtime` - Reply of the runtime backend
    /// * `analysis` - Reply built from the analysis backend
    /// * `line_text` - Text of the cursor's line
    ///
    /// # Returns
    ///
    /// The other reply unchanged when either side has no matches, otherwise a
    /// duplicate-free merged reply over the analysis range.
    pub fn merge(
        &self,
        runtime: &CompletionReply,
        analysis: &CompletionReply,
        line_text: &str,
    ) -> CompletionReply {
        if runtime.is_empty() {
            return analysis.clone();
        }
        if analysis.is_empty() {
            return runtime.clone();
        }

        let mut memo: HashSet<&str> = HashSet::new();
        let mut matches: Vec<String> = Vec::new();
        for text in &analysis.matches {
            if memo.insert(text) {
                matches.push(text.clone());
            }
        }

        let mut item_types = analysis.metadata.item_types.clone();
        let mut typed: HashSet<String> = item_types.iter().map(|t| t.text.clone()).collect();

        // runtime started later: its candidates lack the analysis prefix
        let prefix = if runtime.range_start > analysis.range_start {
            char_slice(line_text, analysis.range_start, analysis.range_end)
        } else {
            ""
        };
        let strip = |value: &str| -> String {
            value.strip_prefix(prefix).unwrap_or(value).to_string()
        };

        let mut priority: Vec<String> = Vec::new();
        let mut prioritized: HashSet<String> = HashSet::new();
        for tag in &runtime.metadata.item_types {
            let text = strip(&tag.text);
            if typed.contains(&text) || memo.contains(text.as_str()) {
                continue;
            }
            typed.insert(text.clone());
            item_types.push(ItemTypeTag::new(text.clone(), tag.item_type.clone()));
            if !self.is_unknown(&tag.item_type) && prioritized.insert(text.clone()) {
                priority.push(text);
            }
        }

        let mut appended: Vec<String> = Vec::new();
        for value in &runtime.matches {
            let text = strip(value);
            if memo.contains(text.as_str())
                || prioritized.contains(&text)
                || appended.contains(&text)
            {
                continue;
            }
            appended.push(text);
        }

        debug!(
            analysis = analysis.matches.len(),
            runtime = runtime.matches.len(),
            priority = priority.len(),
            prefix = %prefix,
            "Merged runtime and analysis replies"
        );

        let mut merged = priority;
        merged.extend(matches);
        merged.extend(appended);

        CompletionReply {
            range_start: analysis.range_start,
            range_end: analysis.range_end,
            matches: merged,
            metadata: ReplyMetadata { item_types },
        }
    }
}

impl Default for ResultMerger {
    fn default() -> Self {
        Self::new()
    }
}

/// Characters `[start, end)` of `text`, clamped to its length
fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let byte_at = |index: usize| {
        text.char_indices()
            .nth(index)
            .map(|(byte, _)| byte)
            .unwrap_or(text.len())
    };
    let start = byte_at(start);
    let end = byte_at(end).max(start);
    &text[start..end]
}
