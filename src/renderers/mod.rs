//! Renderers module for the surface
//!
//! Derives the view's representation from the text buffer and annotations.

pub mod display_list;

// Re-export commonly used types
pub use display_list::{DisplayElement, DisplayList, RenderMode};
