//! RiceCoder Virtual Documents
//!
//! Models a composite buffer (one root document built from several editing
//! widgets) as a set of virtual documents, each holding the text of a single
//! language. Analysis tooling only ever sees virtual documents; this crate
//! translates positions between the spaces involved and answers which virtual
//! document owns a given root position.
//!
//! # Components
//!
//! - [`CoordinateMapper`]: editor to root, and root to virtual, conversions
//! - [`VirtualDocumentRegistry`]: ordered, non-overlapping regions of the root
//!   document and the document that owns each of them
//!
//! # Example
//!
//! ```
//! use ricecoder_vdoc::*;
//!
//! let mut mapper = CoordinateMapper::new();
//! mapper.place_editor(EditorPlacement::new("cell-1", 4, 2));
//!
//! let mut registry = VirtualDocumentRegistry::new();
//! registry
//!     .register_region(VirtualRegion::lines(VirtualDocument::new("nb", "python"), 0, 6, 0))
//!     .unwrap();
//!
//! let root = mapper.to_root(EditorPosition::new(1, 3), &EditorId::from("cell-1")).unwrap();
//! let region = registry.region_at(root).unwrap();
//! let virt = mapper.to_virtual(root, region).unwrap();
//!
//! assert_eq!(region.document.language, "python");
//! assert_eq!(virt, VirtualPosition::new(5, 3));
//! ```

pub mod document;
pub mod error;
pub mod mapper;
pub mod position;
pub mod registry;

pub use document::{VirtualDocument, VirtualRegion};
pub use error::{VdocError, VdocResult};
pub use mapper::{CoordinateMapper, EditorPlacement};
pub use position::{EditorId, EditorPosition, RootPosition, Span, VirtualPosition};
pub use registry::VirtualDocumentRegistry;
