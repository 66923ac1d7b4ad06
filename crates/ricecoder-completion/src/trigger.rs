//! Gates deciding whether completion runs at all

use std::collections::HashSet;

use crate::config::CompletionConfig;

/// Suppression and auto-invoke gates
///
/// The two gates are independent. Suppression looks at the type of the token
/// under the cursor before the edit; auto-invoke looks at the character the
/// edit just inserted. Explicit invocations only pass the suppression gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerPolicy {
    suppressed_token_types: HashSet<String>,
}

impl TriggerPolicy {
    /// Create a policy suppressing the given token types
    pub fn new<I, S>(suppressed_token_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            suppressed_token_types: suppressed_token_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a policy from the broker configuration
    pub fn from_config(config: &CompletionConfig) -> Self {
        Self::new(config.suppressed_token_types.iter().cloned())
    }

    /// Whether completion must not run inside a token of this type
    pub fn should_suppress(&self, token_type: &str) -> bool {
        self.suppressed_token_types.contains(token_type)
    }

    /// Whether the character just typed should open completion on its own
    pub fn should_auto_invoke(&self, last_typed: &str, trigger_characters: &[String]) -> bool {
        !last_typed.is_empty() && trigger_characters.iter().any(|c| c == last_typed)
    }

    /// Last character of the text inserted by an edit
    pub fn last_typed_character(inserted: &str) -> Option<String> {
        inserted.chars().last().map(String::from)
    }
}

impl Default for TriggerPolicy {
    fn default() -> Self {
        Self::from_config(&CompletionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot_and_bracket() -> Vec<String> {
        vec![".".to_string(), "[".to_string()]
    }

    #[test]
    fn test_default_suppresses_strings_and_comments() {
        let policy = TriggerPolicy::default();
        assert!(policy.should_suppress("string"));
        assert!(policy.should_suppress("comment"));
        assert!(!policy.should_suppress("variable"));
        assert!(!policy.should_suppress(""));
    }

    #[test]
    fn test_custom_suppression_set() {
        let policy = TriggerPolicy::new(["string-2"]);
        assert!(policy.should_suppress("string-2"));
        assert!(!policy.should_suppress("string"));
    }

    #[test]
    fn test_auto_invoke_on_trigger_character() {
        let policy = TriggerPolicy::default();
        assert!(policy.should_auto_invoke(".", &dot_and_bracket()));
        assert!(!policy.should_auto_invoke("a", &dot_and_bracket()));
        assert!(!policy.should_auto_invoke(".", &[]));
        assert!(!policy.should_auto_invoke("", &dot_and_bracket()));
    }

    #[test]
    fn test_last_typed_character() {
        assert_eq!(TriggerPolicy::last_typed_character("foo."), Some(".".to_string()));
        assert_eq!(TriggerPolicy::last_typed_character("é"), Some("é".to_string()));
        assert_eq!(TriggerPolicy::last_typed_character(""), None);
    }
}
