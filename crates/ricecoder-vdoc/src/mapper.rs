//! Conversions between editor, root and virtual coordinates

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

use crate::document::VirtualRegion;
use crate::error::{VdocError, VdocResult};
use crate::position::{EditorId, EditorPosition, RootPosition, VirtualPosition};

/// Where one editor sits inside the root document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPlacement {
    /// The placed editor
    pub editor_id: EditorId,
    /// Root line holding the editor's first line
    pub root_first_line: u32,
    /// Number of lines the editor holds (an empty editor still holds one)
    #[serde(deserialize_with = "at_least_one_line")]
    pub line_count: u32,
}

fn at_least_one_line<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    u32::deserialize(deserializer).map(|count| count.max(1))
}

impl EditorPlacement {
    /// Create a new placement
    pub fn new(editor_id: impl Into<EditorId>, root_first_line: u32, line_count: u32) -> Self {
        Self {
            editor_id: editor_id.into(),
            root_first_line,
            line_count: line_count.max(1),
        }
    }
}

/// Maps positions between coordinate spaces
///
/// Editor placements are owned by whoever lays out the composite buffer; the
/// mapper only reads them. Root to virtual conversion needs the owning region,
/// which the [`VirtualDocumentRegistry`](crate::VirtualDocumentRegistry)
/// resolves first.
#[derive(Debug, Clone, Default)]
pub struct CoordinateMapper {
    placements: HashMap<EditorId, EditorPlacement>,
}

impl CoordinateMapper {
    /// Create a mapper with no editors placed
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or re-place) an editor in the root document
    pub fn place_editor(&mut self, placement: EditorPlacement) {
        self.placements
            .insert(placement.editor_id.clone(), placement);
    }

    /// Remove an editor's placement
    pub fn remove_editor(&mut self, editor_id: &EditorId) -> Option<EditorPlacement> {
        self.placements.remove(editor_id)
    }

    /// Placement of an editor, if known
    pub fn placement(&self, editor_id: &EditorId) -> Option<&EditorPlacement> {
        self.placements.get(editor_id)
    }

    /// Convert an editor position to root coordinates
    ///
    /// # Errors
    ///
    /// `UnmappablePosition` if the editor is not placed or the line lies past
    /// the editor's last line.
    pub fn to_root(
        &self,
        position: EditorPosition,
        editor_id: &EditorId,
    ) -> VdocResult<RootPosition> {
        let placement = self.placements.get(editor_id).ok_or_else(|| {
            VdocError::unmappable(
                position,
                format!("editor '{}' is not placed in the root document", editor_id),
            )
        })?;

        if position.line >= placement.line_count {
            return Err(VdocError::unmappable(
                position,
                format!(
                    "editor '{}' has only {} line(s)",
                    editor_id, placement.line_count
                ),
            ));
        }

        let line = placement
            .root_first_line
            .checked_add(position.line)
            .ok_or_else(|| VdocError::unmappable(position, "root line overflows"))?;
        let root = RootPosition::new(line, position.column);
        trace!(editor = %editor_id, from = %position, to = %root, "Mapped editor position");
        Ok(root)
    }

    /// Convert a root position to the coordinates of the region's document
    ///
    /// The region's end is accepted so that exclusive span ends map too.
    ///
    /// # Errors
    ///
    /// `UnmappablePosition` if the position is outside the region.
    pub fn to_virtual(
        &self,
        position: RootPosition,
        region: &VirtualRegion,
    ) -> VdocResult<VirtualPosition> {
        if position < region.root_start || position > region.root_end {
            return Err(VdocError::unmappable(
                position,
                format!(
                    "outside region [{}, {}) of '{}'",
                    region.root_start, region.root_end, region.document.id_path
                ),
            ));
        }

        let overflow = || VdocError::unmappable(position, "virtual coordinates overflow");
        let line_delta = position.line - region.root_start.line;
        let column = if line_delta == 0 {
            region
                .virtual_start
                .column
                .checked_add(position.column - region.root_start.column)
                .ok_or_else(overflow)?
        } else {
            position.column
        };
        let line = region
            .virtual_start
            .line
            .checked_add(line_delta)
            .ok_or_else(overflow)?;

        Ok(VirtualPosition::new(line, column))
    }
}
