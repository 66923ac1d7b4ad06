//! Registry resolving root positions to the virtual document that owns them

use tracing::debug;

use crate::document::{VirtualDocument, VirtualRegion};
use crate::error::{VdocError, VdocResult};
use crate::position::RootPosition;

/// Registry of the regions making up the root document
///
/// Regions are kept sorted by their root start and never overlap, so every
/// lookup has at most one answer. The document-management layer registers and
/// removes regions as the composite buffer changes; completion only reads.
///
/// # Boundary rule
///
/// Regions are start-inclusive and end-exclusive: a position sitting exactly on
/// the boundary between two adjacent regions belongs to the region that starts
/// there. A position that only matches a region's end (e.g. the very end of the
/// buffer) belongs to the region ending there. Callers resolving a token pass
/// the token's start, so a token touching a boundary is owned by the document
/// it starts in.
#[derive(Debug, Clone, Default)]
pub struct VirtualDocumentRegistry {
    regions: Vec<VirtualRegion>,
}

impl VirtualDocumentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region
    ///
    /// # Errors
    ///
    /// `InvalidRegion` if the region ends before it starts, `OverlappingRegion`
    /// if it shares a position with a registered region.
    pub fn register_region(&mut self, region: VirtualRegion) -> VdocResult<()> {
        if region.root_end < region.root_start {
            return Err(VdocError::InvalidRegion(format!(
                "region of '{}' ends ({}) before it starts ({})",
                region.document.id_path, region.root_end, region.root_start
            )));
        }

        if let Some(existing) = self.regions.iter().find(|r| r.overlaps(&region)) {
            return Err(VdocError::OverlappingRegion {
                document: region.document.id_path.clone(),
                other: existing.document.id_path.clone(),
            });
        }

        let index = self
            .regions
            .partition_point(|r| r.root_start <= region.root_start);
        debug!(
            document = %region.document.id_path,
            language = %region.document.language,
            start = %region.root_start,
            end = %region.root_end,
            "Registered virtual region"
        );
        self.regions.insert(index, region);
        Ok(())
    }

    /// Remove every region of a document, returning how many were removed
    pub fn remove_document(&mut self, id_path: &str) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| r.document.id_path != id_path);
        before - self.regions.len()
    }

    /// Remove all regions
    pub fn clear(&mut self) {
        self.regions.clear();
    }

    /// Registered regions in root order
    pub fn regions(&self) -> &[VirtualRegion] {
        &self.regions
    }

    /// Distinct documents in order of their first region
    pub fn documents(&self) -> Vec<&VirtualDocument> {
        let mut documents: Vec<&VirtualDocument> = Vec::new();
        for region in &self.regions {
            if !documents
                .iter()
                .any(|d| d.id_path == region.document.id_path)
            {
                documents.push(&region.document);
            }
        }
        documents
    }

    /// Whether no region is registered
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Region owning a root position
    ///
    /// # Errors
    ///
    /// `NoOwningDocument` if no region covers the position.
    pub fn region_at(&self, position: RootPosition) -> VdocResult<&VirtualRegion> {
        self.regions
            .iter()
            .find(|r| r.contains(position))
            .or_else(|| self.regions.iter().find(|r| r.ends_at(position)))
            .ok_or(VdocError::NoOwningDocument { position })
    }

    /// Virtual document owning a root position
    ///
    /// # Errors
    ///
    /// `NoOwningDocument` if no region covers the position.
    pub fn document_at(&self, position: RootPosition) -> VdocResult<&VirtualDocument> {
        Ok(&self.region_at(position)?.document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn python() -> VirtualDocument {
        VirtualDocument::new("nb", "python")
    }

    fn r() -> VirtualDocument {
        VirtualDocument::new("nb/r", "r")
    }

    fn registry() -> VirtualDocumentRegistry {
        let mut registry = VirtualDocumentRegistry::new();
        registry
            .register_region(VirtualRegion::lines(python(), 0, 3, 0))
            .unwrap();
        registry
            .register_region(VirtualRegion::lines(r(), 3, 5, 0))
            .unwrap();
        registry
            .register_region(VirtualRegion::lines(python(), 5, 9, 4))
            .unwrap();
        registry
    }

    #[test]
    fn test_empty_registry_has_no_owner() {
        let registry = VirtualDocumentRegistry::new();
        let err = registry.document_at(RootPosition::new(0, 0)).unwrap_err();
        assert_eq!(
            err,
            VdocError::NoOwningDocument {
                position: RootPosition::new(0, 0)
            }
        );
    }

    #[test]
    fn test_boundary_belongs_to_region_starting_there() {
        let registry = registry();
        assert_eq!(registry.document_at(RootPosition::new(3, 0)).unwrap(), &r());
        assert_eq!(
            registry.document_at(RootPosition::new(2, 80)).unwrap(),
            &python()
        );
        assert_eq!(
            registry.document_at(RootPosition::new(5, 0)).unwrap(),
            &python()
        );
    }

    #[test]
    fn test_buffer_end_belongs_to_last_region() {
        let registry = registry();
        let region = registry.region_at(RootPosition::new(9, 0)).unwrap();
        assert_eq!(region.root_start, RootPosition::new(5, 0));
    }

    #[test]
    fn test_position_past_every_region_has_no_owner() {
        let registry = registry();
        assert!(registry.document_at(RootPosition::new(12, 0)).is_err());
    }

    #[test]
    fn test_overlapping_region_is_rejected() {
        let mut registry = registry();
        let err = registry
            .register_region(VirtualRegion::lines(r(), 4, 6, 10))
            .unwrap_err();
        assert!(matches!(err, VdocError::OverlappingRegion { .. }));
    }

    #[test]
    fn test_inverted_region_is_rejected() {
        let mut registry = VirtualDocumentRegistry::new();
        let err = registry
            .register_region(VirtualRegion::lines(r(), 4, 2, 0))
            .unwrap_err();
        assert!(matches!(err, VdocError::InvalidRegion(_)));
    }

    #[test]
    fn test_regions_are_kept_in_root_order() {
        let mut registry = VirtualDocumentRegistry::new();
        registry
            .register_region(VirtualRegion::lines(python(), 5, 9, 4))
            .unwrap();
        registry
            .register_region(VirtualRegion::lines(python(), 0, 3, 0))
            .unwrap();
        registry
            .register_region(VirtualRegion::lines(r(), 3, 5, 0))
            .unwrap();

        let starts: Vec<u32> = registry.regions().iter().map(|r| r.root_start.line).collect();
        assert_eq!(starts, vec![0, 3, 5]);
        assert_eq!(registry.documents(), vec![&python(), &r()]);
    }

    #[test]
    fn test_remove_document() {
        let mut registry = registry();
        assert_eq!(registry.remove_document("nb"), 2);
        assert_eq!(registry.regions().len(), 1);
        assert!(registry.document_at(RootPosition::new(0, 0)).is_err());
    }
}
