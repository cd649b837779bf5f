//! Layer 0: Text and annotation core
//!
//! Pure text editing state with no knowledge of the DOM. The buffer here is
//! the source of truth for content; the view is derived from it.
//!
//! ## Modules
//!
//! - `buffer`: Character storage and checked edits
//! - `cursor`: Selections and view-position mapping
//! - `annotations`: Typed ranges over the text
//! - `transform`: Keeps annotation ranges consistent across edits

pub mod annotations;
pub mod buffer;
pub mod cursor;
pub mod transform;

// Re-exports for convenience
pub use annotations::{Annotation, AnnotationId, AnnotationSet, Span};
pub use buffer::{TextBuffer, TextCore, LINE_BREAK};
pub use cursor::{Selection, SelectionMapper, ViewAnchor, ViewRange};
pub use transform::{apply_edit, transform_span, Edit, EditKind, SpanOutcome};
