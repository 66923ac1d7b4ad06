// CLI error types

use ricecoder_completion::CompletionError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scenario error: {0}")]
    Scenario(String),

    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'rice-complete --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(msg) => {
                format!(
                    "Configuration error: {}\n\nCheck the file passed with --config.",
                    msg
                )
            }
            CliError::Scenario(msg) => {
                format!(
                    "Scenario error: {}\n\nA scenario needs editors, regions and a request.",
                    msg
                )
            }
            CliError::Completion(CompletionError::Document(e)) => {
                format!(
                    "The request does not map into any virtual document: {}\n\nCheck the editor placements and regions of the scenario.",
                    e
                )
            }
            CliError::Completion(e) => format!("Completion failed: {}", e),
            CliError::Json(e) => format!("Invalid JSON: {}", e),
            CliError::Yaml(e) => format!("Invalid YAML: {}", e),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use ricecoder_vdoc::{RootPosition, VdocError};

    #[test]
    fn test_document_errors_point_at_the_layout() {
        let err = CliError::from(CompletionError::from(VdocError::NoOwningDocument {
            position: RootPosition::new(3, 0),
        }));
        let message = err.user_message();
        assert!(message.contains("root 3:0"));
        assert!(message.contains("editor placements"));
    }

    #[test]
    fn test_config_errors_are_converted() {
        let err: CliError = CompletionError::config_error("bad timeout").into();
        assert!(err.user_message().contains("bad timeout"));
    }
}
