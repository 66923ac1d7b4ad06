//! Error types for virtual document resolution

use thiserror::Error;

use crate::position::RootPosition;

/// Virtual document error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VdocError {
    /// A position lies outside every known region of its space
    #[error("Unmappable position ({position}): {reason}")]
    UnmappablePosition {
        /// The offending position, rendered with its space
        position: String,
        /// Why it could not be mapped
        reason: String,
    },

    /// No registered virtual document covers the root position
    #[error("No virtual document owns {position}")]
    NoOwningDocument {
        /// The root position that was looked up
        position: RootPosition,
    },

    /// A region would overlap a region that is already registered
    #[error("Region of '{document}' overlaps a region of '{other}'")]
    OverlappingRegion {
        /// Document of the rejected region
        document: String,
        /// Document of the region already registered
        other: String,
    },

    /// A region is malformed (e.g. ends before it starts)
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
}

impl VdocError {
    /// Create an unmappable-position error
    pub fn unmappable(position: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        VdocError::UnmappablePosition {
            position: position.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for virtual document operations
pub type VdocResult<T> = Result<T, VdocError>;
