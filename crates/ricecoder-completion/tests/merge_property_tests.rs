/// Property-based tests for reply construction and merging
/// **Feature: ricecoder-completion, Property: Range shift, empty-side identity, dedup, priority**
/// **Validates: analysis range shift, merge identity, duplicate-free matches, priority ordering**

use itertools::Itertools;
use proptest::prelude::*;
use ricecoder_completion::{reply_from_items, CompletionItem, CompletionReply, ResultMerger};

/// Strategy for generating candidate texts
fn candidate_strategy() -> impl Strategy<Value = String> {
    "[a-d][a-d_]{0,4}".prop_map(|s| s.to_string())
}

/// Strategy for generating type tags, unknown markers included
fn type_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("function".to_string()),
        Just("instance".to_string()),
        Just("<unknown>".to_string()),
        Just("unknown".to_string()),
        Just(String::new()),
    ]
}

/// Strategy for generating non-empty replies over a random range
fn reply_strategy() -> impl Strategy<Value = CompletionReply> {
    (
        0usize..8,
        0usize..4,
        prop::collection::vec((candidate_strategy(), type_strategy()), 1..12),
    )
        .prop_map(|(start, width, candidates)| {
            candidates.into_iter().fold(
                CompletionReply::new(start, start + width),
                |reply, (text, item_type)| reply.with_match(text, item_type),
            )
        })
}

/// Strategy for generating line text
fn line_strategy() -> impl Strategy<Value = String> {
    "[a-d_ ]{0,16}".prop_map(|s| s.to_string())
}

proptest! {
    /// Property: the range starts one character later iff no candidate extends the token
    #[test]
    fn prop_range_shift(
        labels in prop::collection::vec(candidate_strategy(), 0..10),
        token in "[a-d]{1,3}",
        offset in 0usize..100,
    ) {
        let items: Vec<CompletionItem> = labels.iter().map(CompletionItem::new).collect();
        let reply = reply_from_items(&items, &token, offset);

        let any_prefixed = labels.iter().any(|label| label.starts_with(token.as_str()));
        let expected_start = if any_prefixed { offset } else { offset + 1 };
        prop_assert_eq!(reply.range_start, expected_start);
        prop_assert_eq!(reply.range_end, offset + token.len());
    }

    /// Property: an empty side leaves the other reply untouched
    #[test]
    fn prop_merge_identity_on_empty_side(
        reply in reply_strategy(),
        empty_start in 0usize..8,
        line in line_strategy(),
    ) {
        let merger = ResultMerger::new();
        let empty = CompletionReply::new(empty_start, empty_start + 1);

        prop_assert_eq!(merger.merge(&empty, &reply, &line), reply.clone());
        prop_assert_eq!(merger.merge(&reply, &empty, &line), reply);
    }

    /// Property: merged matches never hold the same text twice
    #[test]
    fn prop_merge_is_duplicate_free(
        runtime in reply_strategy(),
        analysis in reply_strategy(),
        line in line_strategy(),
    ) {
        let merged = ResultMerger::new().merge(&runtime, &analysis, &line);
        prop_assert!(merged.matches.iter().all_unique());
        prop_assert!(merged.metadata.item_types.iter().map(|tag| &tag.text).all_unique());
    }

    /// Property: merged replies keep the analysis range
    #[test]
    fn prop_merge_keeps_analysis_range(
        runtime in reply_strategy(),
        analysis in reply_strategy(),
        line in line_strategy(),
    ) {
        let merged = ResultMerger::new().merge(&runtime, &analysis, &line);
        prop_assert_eq!(merged.range_start, analysis.range_start);
        prop_assert_eq!(merged.range_end, analysis.range_end);
    }

    /// Property: known-typed runtime candidates precede every analysis-only match
    #[test]
    fn prop_known_runtime_candidates_come_first(
        runtime in reply_strategy(),
        analysis in reply_strategy(),
    ) {
        // equal range starts: no prefix stripping
        let mut runtime = runtime;
        runtime.range_start = analysis.range_start;

        let merged = ResultMerger::new().merge(&runtime, &analysis, "");

        let promoted: Vec<&String> = runtime
            .metadata
            .item_types
            .iter()
            .filter(|tag| tag.item_type != "<unknown>" && tag.item_type != "unknown")
            .map(|tag| &tag.text)
            .filter(|text| !analysis.matches.contains(text))
            .collect();

        let first_analysis = analysis
            .matches
            .iter()
            .filter_map(|text| merged.matches.iter().position(|m| m == text))
            .min();

        for text in promoted {
            let position = merged.matches.iter().position(|m| m == text);
            prop_assert!(position.is_some());
            if let Some(first) = first_analysis {
                prop_assert!(position.unwrap() < first);
            }
        }
    }
}

#[test]
fn test_prefix_stripping_example() {
    // analysis [5, 7), runtime [3, 7) on "ab_mean": the runtime started earlier,
    // so its candidates are compared as they are
    let analysis = CompletionReply::new(5, 7).with_match("an_other", "instance");
    let runtime = CompletionReply::new(3, 7).with_match("ab_mean_val", "instance");

    let merged = ResultMerger::new().merge(&runtime, &analysis, "ab_mean");
    assert_eq!(merged.matches, vec!["ab_mean_val", "an_other"]);
}

#[test]
fn test_prefix_stripping_when_runtime_is_narrower() {
    // analysis replaces `an` at [5, 7); the runtime only saw the last character
    let analysis = CompletionReply::new(5, 7).with_match("and", "Keyword");
    let runtime = CompletionReply::new(6, 7)
        .with_match("an_value", "instance")
        .with_match("nope", "instance");

    let merged = ResultMerger::new().merge(&runtime, &analysis, "ab_mean");
    assert_eq!(merged.matches, vec!["_value", "nope", "and"]);
    assert_eq!(merged.range_start, 5);
}
