//! Shared types for the WASM API
//!
//! Result types returned to JavaScript after surface operations.

use crate::renderers::display_list::DisplayList;
use crate::text::{Selection, ViewRange};

/// Result of an edit operation
///
/// The view replaces its DOM with `display_list` and places its caret at
/// `view_selection`.
#[derive(serde::Serialize, serde::Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditResult {
    pub display_list: DisplayList,
    pub selection: Selection,
    pub view_selection: ViewRange,
}
