//! Surface WASM API
//!
//! The JavaScript-facing layer. It converts between JS values and the core
//! types, turns core errors into `JsValue`s and logs to the browser console.
//!
//! # Module Structure
//!
//! - `helpers`: Serialization, error conversion and console logging macros
//! - `types`: Result types returned to JavaScript
//! - `surface`: The `Surface` class the view drives

pub mod helpers;
pub mod types;
pub mod surface;

pub use surface::SurfaceHandle;
pub use types::EditResult;
