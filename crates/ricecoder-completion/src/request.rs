//! Builds normalized completion requests from editor state

use ricecoder_vdoc::{
    CoordinateMapper, EditorId, EditorPosition, RootPosition, Span, VdocResult,
    VirtualDocumentRegistry, VirtualPosition, VirtualRegion,
};
use tracing::debug;

use crate::types::{CompletionRequest, EditorRequest, VirtualToken};

/// Assembles [`CompletionRequest`]s from editor coordinates
///
/// Pure: it only reads the mapper and the registry. Mapping failures are
/// returned unchanged.
pub struct RequestBuilder<'a> {
    mapper: &'a CoordinateMapper,
    registry: &'a VirtualDocumentRegistry,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(mapper: &'a CoordinateMapper, registry: &'a VirtualDocumentRegistry) -> Self {
        Self { mapper, registry }
    }

    /// Build a request from explicit token coordinates
    ///
    /// The owning document is resolved from the token's start. End and cursor
    /// are expressed in that document when its region reaches them, otherwise
    /// in the document owning them.
    pub fn build(
        &self,
        token_text: &str,
        start: EditorPosition,
        end: EditorPosition,
        cursor: EditorPosition,
        offset: usize,
        editor_id: &EditorId,
    ) -> VdocResult<CompletionRequest> {
        let typed_character = typed_character(token_text, start, cursor);

        let root_start = self.mapper.to_root(start, editor_id)?;
        let root_end = self.mapper.to_root(end, editor_id)?;
        let root_cursor = self.mapper.to_root(cursor, editor_id)?;

        let region = self.registry.region_at(root_start)?;
        let span = Span::new(
            self.mapper.to_virtual(root_start, region)?,
            self.to_virtual_near(root_end, region)?,
        );
        let cursor = self.to_virtual_near(root_cursor, region)?;

        debug!(
            document = %region.document.id_path,
            language = %region.document.language,
            cursor = %cursor,
            "Built completion request"
        );

        Ok(CompletionRequest {
            token: VirtualToken {
                text: token_text.to_string(),
                span,
            },
            cursor,
            typed_character,
            document: region.document.clone(),
            offset,
        })
    }

    /// Build a request for an editor-level request
    pub fn build_for(&self, request: &EditorRequest) -> VdocResult<CompletionRequest> {
        self.build(
            &request.token.text,
            request.token_start(),
            request.token_end(),
            request.cursor,
            request.token.offset,
            &request.editor_id,
        )
    }

    fn to_virtual_near(
        &self,
        position: RootPosition,
        owner: &VirtualRegion,
    ) -> VdocResult<VirtualPosition> {
        self.mapper.to_virtual(position, owner).or_else(|_| {
            let region = self.registry.region_at(position)?;
            self.mapper.to_virtual(position, region)
        })
    }
}

/// Character immediately behind the cursor within the token
///
/// `None` when the cursor sits on or before the token's first character, or
/// past its last one.
pub fn typed_character(
    token_text: &str,
    start: EditorPosition,
    cursor: EditorPosition,
) -> Option<char> {
    let index = cursor.column.checked_sub(start.column)?.checked_sub(1)?;
    token_text.chars().nth(index as usize)
}
