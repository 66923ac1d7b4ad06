//! Virtual documents and the root regions they occupy

use serde::{Deserialize, Serialize};

use crate::position::{RootPosition, VirtualPosition};

/// An independently analyzable document living inside the root document
///
/// Identity is the `id_path`; two handles with the same `id_path` refer to the
/// same virtual document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VirtualDocument {
    /// Stable identity (e.g. `"notebook.ipynb"` or `"notebook.ipynb/r"`)
    pub id_path: String,
    /// Declared language of the document
    pub language: String,
}

impl VirtualDocument {
    /// Create a new virtual document handle
    pub fn new(id_path: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id_path: id_path.into(),
            language: language.into(),
        }
    }
}

/// A contiguous stretch of the root document owned by one virtual document
///
/// The region covers `[root_start, root_end)` in root coordinates and its first
/// character is `virtual_start` in the virtual document. Lines after the first
/// keep their column; the first line is shifted by the difference between
/// `virtual_start.column` and `root_start.column`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualRegion {
    /// Owning virtual document
    pub document: VirtualDocument,
    /// First root position of the region (inclusive)
    pub root_start: RootPosition,
    /// End of the region in root coordinates (exclusive)
    pub root_end: RootPosition,
    /// Where `root_start` lands in the virtual document
    pub virtual_start: VirtualPosition,
}

impl VirtualRegion {
    /// Create a new region
    pub fn new(
        document: VirtualDocument,
        root_start: RootPosition,
        root_end: RootPosition,
        virtual_start: VirtualPosition,
    ) -> Self {
        Self {
            document,
            root_start,
            root_end,
            virtual_start,
        }
    }

    /// Region made of whole root lines `[first_line, end_line)`
    pub fn lines(
        document: VirtualDocument,
        first_line: u32,
        end_line: u32,
        virtual_first_line: u32,
    ) -> Self {
        Self::new(
            document,
            RootPosition::new(first_line, 0),
            RootPosition::new(end_line, 0),
            VirtualPosition::new(virtual_first_line, 0),
        )
    }

    /// Whether `position` is inside the region (start-inclusive, end-exclusive)
    pub fn contains(&self, position: RootPosition) -> bool {
        self.root_start <= position && position < self.root_end
    }

    /// Whether the region ends exactly at `position`
    pub fn ends_at(&self, position: RootPosition) -> bool {
        self.root_end == position
    }

    /// Whether two regions share at least one root position
    pub fn overlaps(&self, other: &VirtualRegion) -> bool {
        self.root_start < other.root_end && other.root_start < self.root_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> VirtualDocument {
        VirtualDocument::new("notebook.ipynb", "python")
    }

    #[test]
    fn test_region_contains_is_half_open() {
        let region = VirtualRegion::lines(python(), 2, 5, 0);

        assert!(!region.contains(RootPosition::new(1, 10)));
        assert!(region.contains(RootPosition::new(2, 0)));
        assert!(region.contains(RootPosition::new(4, 99)));
        assert!(!region.contains(RootPosition::new(5, 0)));
        assert!(region.ends_at(RootPosition::new(5, 0)));
    }

    #[test]
    fn test_adjacent_regions_do_not_overlap() {
        let a = VirtualRegion::lines(python(), 0, 3, 0);
        let b = VirtualRegion::lines(VirtualDocument::new("notebook.ipynb/r", "r"), 3, 6, 0);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));

        let c = VirtualRegion::lines(python(), 2, 4, 10);
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }
}
