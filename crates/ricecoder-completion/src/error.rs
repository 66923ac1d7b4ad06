//! Error types for the completion broker

use ricecoder_vdoc::VdocError;
use thiserror::Error;

/// Completion error
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Coordinate mapping or document resolution failed; aborts the request
    #[error("Document resolution error: {0}")]
    Document(#[from] VdocError),

    /// No backend is connected for the document
    #[error("Backend '{backend}' is not available for '{document}'")]
    BackendUnavailable {
        /// Backend role or name
        backend: String,
        /// Document the backend was looked up for
        document: String,
    },

    /// A backend call failed
    #[error("Backend '{backend}' failed: {reason}")]
    BackendFailure {
        /// Backend role or name
        backend: String,
        /// Failure description
        reason: String,
    },

    /// A backend call did not finish in time
    #[error("Backend '{backend}' timed out after {timeout_ms}ms")]
    BackendTimeout {
        /// Backend role or name
        backend: String,
        /// Configured timeout
        timeout_ms: u64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CompletionError {
    /// Create a backend-unavailable error
    pub fn backend_unavailable(backend: impl Into<String>, document: impl Into<String>) -> Self {
        CompletionError::BackendUnavailable {
            backend: backend.into(),
            document: document.into(),
        }
    }

    /// Create a backend-failure error
    pub fn backend_failure(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        CompletionError::BackendFailure {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend-timeout error
    pub fn timeout(backend: impl Into<String>, timeout_ms: u64) -> Self {
        CompletionError::BackendTimeout {
            backend: backend.into(),
            timeout_ms,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        CompletionError::ConfigError(message.into())
    }

    /// Whether the request can continue through a fallback connector
    ///
    /// Only backend errors are recoverable. Mapping and resolution failures
    /// abort the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CompletionError::BackendUnavailable { .. }
                | CompletionError::BackendFailure { .. }
                | CompletionError::BackendTimeout { .. }
        )
    }
}

/// Result type for completion operations
pub type CompletionResult<T> = Result<T, CompletionError>;
