//! Configuration loading and management for the completion broker

use crate::error::{CompletionError, CompletionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Broker configuration
///
/// Every field has a default, so an empty document is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Token types inside which completion is suppressed
    pub suppressed_token_types: Vec<String>,
    /// Trigger characters per language, used when the analysis connection reports none
    pub trigger_characters: HashMap<String, Vec<String>>,
    /// Timeout for each backend call in milliseconds (0 disables)
    pub request_timeout_ms: u64,
    /// Whether the runtime backend may be queried at all
    pub runtime_enabled: bool,
    /// Runtime type tags that never earn priority when merging
    pub unknown_type_markers: Vec<String>,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            suppressed_token_types: vec!["string".to_string(), "comment".to_string()],
            trigger_characters: HashMap::new(),
            request_timeout_ms: 5000,
            runtime_enabled: true,
            unknown_type_markers: vec!["<unknown>".to_string(), "unknown".to_string()],
        }
    }
}

impl CompletionConfig {
    /// Configured trigger characters for a language
    pub fn trigger_characters_for(&self, language: &str) -> &[String] {
        self.trigger_characters
            .get(language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Completion configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load completion configuration from a YAML file
    pub fn load_from_yaml(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: CompletionConfig = serde_yaml::from_str(&content)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load completion configuration from a JSON file
    pub fn load_from_json(path: &Path) -> CompletionResult<CompletionConfig> {
        let content = std::fs::read_to_string(path)?;
        let config: CompletionConfig = serde_json::from_str(&content)?;
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load completion configuration from a string
    pub fn load_from_string(
        content: &str,
        format: ConfigFormat,
    ) -> CompletionResult<CompletionConfig> {
        let config = match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Self::validate_config(&config)?;
        Ok(config)
    }

    /// Load a configuration file, picking the format from its extension
    pub fn load_from_path(path: &Path) -> CompletionResult<CompletionConfig> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path),
            Some("json") => Self::load_from_json(path),
            _ => Err(CompletionError::config_error(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))),
        }
    }

    /// Validate completion configuration
    fn validate_config(config: &CompletionConfig) -> CompletionResult<()> {
        if config
            .suppressed_token_types
            .iter()
            .any(|token_type| token_type.is_empty())
        {
            return Err(CompletionError::config_error(
                "Suppressed token types cannot be empty",
            ));
        }

        for (language, characters) in &config.trigger_characters {
            if language.is_empty() {
                return Err(CompletionError::config_error(
                    "Language name cannot be empty",
                ));
            }
            if characters.iter().any(|c| c.is_empty()) {
                return Err(CompletionError::config_error(format!(
                    "Empty trigger character for language: {}",
                    language
                )));
            }
        }

        Ok(())
    }
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
}
