//! Positions in the three coordinate spaces of a composite buffer
//!
//! A composite buffer is seen through three coordinate systems:
//!
//! - **Editor**: what a single editing widget reports (one cell, one pane)
//! - **Root**: the single composite document the user sees
//! - **Virtual**: the text of one virtual document, as an analysis backend sees it
//!
//! Each space has its own position type and none of them converts into another
//! implicitly. Conversions go through [`CoordinateMapper`](crate::CoordinateMapper).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position as exposed by an editing widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EditorPosition {
    /// Line number (0-based)
    pub line: u32,
    /// Column (0-based, in characters)
    pub column: u32,
}

impl EditorPosition {
    /// Create a new editor position
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for EditorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "editor {}:{}", self.line, self.column)
    }
}

/// Position in the composite root document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RootPosition {
    /// Line number (0-based)
    pub line: u32,
    /// Column (0-based, in characters)
    pub column: u32,
}

impl RootPosition {
    /// Create a new root position
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for RootPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "root {}:{}", self.line, self.column)
    }
}

/// Position inside one virtual document's own text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VirtualPosition {
    /// Line number (0-based)
    pub line: u32,
    /// Column (0-based, in characters)
    pub column: u32,
}

impl VirtualPosition {
    /// Create a new virtual position
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for VirtualPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "virtual {}:{}", self.line, self.column)
    }
}

/// Half-open span between two positions of the same space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span<P> {
    /// Start position (inclusive)
    pub start: P,
    /// End position (exclusive)
    pub end: P,
}

impl<P: Copy + Ord> Span<P> {
    /// Create a new span
    pub fn new(start: P, end: P) -> Self {
        Self { start, end }
    }

    /// Whether the span covers no text
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Identity of one editing widget placed inside the root document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EditorId(String);

impl EditorId {
    /// Create a new editor id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EditorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EditorId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_order_by_line_then_column() {
        assert!(RootPosition::new(1, 0) > RootPosition::new(0, 40));
        assert!(RootPosition::new(2, 3) < RootPosition::new(2, 4));
        assert_eq!(VirtualPosition::new(3, 1), VirtualPosition::new(3, 1));
    }

    #[test]
    fn test_span_is_empty() {
        let span = Span::new(EditorPosition::new(0, 2), EditorPosition::new(0, 2));
        assert!(span.is_empty());

        let span = Span::new(EditorPosition::new(0, 2), EditorPosition::new(0, 5));
        assert!(!span.is_empty());
    }

    #[test]
    fn test_display_names_the_space() {
        assert_eq!(EditorPosition::new(1, 2).to_string(), "editor 1:2");
        assert_eq!(RootPosition::new(1, 2).to_string(), "root 1:2");
        assert_eq!(VirtualPosition::new(1, 2).to_string(), "virtual 1:2");
    }

    #[test]
    fn test_editor_id_serializes_as_plain_string() {
        let id = EditorId::from("cell-3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cell-3\"");
        assert_eq!(id.as_str(), "cell-3");
    }
}
