//! Annotated Text Surface WASM Module
//!
//! Core of a contenteditable rich-text surface. The text buffer is the
//! source of truth; annotations are typed `(start, length)` ranges over it
//! that are transformed on every insert and delete. The DOM is rebuilt from
//! the derived display list after each edit.

pub mod error;
pub mod text;
pub mod renderers;
pub mod surface;
pub mod api;

// Re-export commonly used types
pub use error::{Result, SurfaceError};
pub use surface::{Key, PendingPaste, Surface, SurfaceEvent, SurfaceOptions, SurfaceState};
pub use text::{Annotation, AnnotationId, AnnotationSet, Edit, EditKind, Selection, Span, ViewAnchor, ViewRange};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    init_logger();

    log::info!("Surface WASM module initialized");
}

#[cfg(feature = "console_log")]
fn init_logger() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}

#[cfg(not(feature = "console_log"))]
fn init_logger() {}
