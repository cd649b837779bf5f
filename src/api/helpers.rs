//! Boundary plumbing for the JS-facing surface class
//!
//! Console output with a `[WASM]` prefix, serde-wasm-bindgen conversion and
//! mapping of [`SurfaceError`] into thrown JS strings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::SurfaceError;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = info)]
    fn console_info(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = warn)]
    fn console_warn(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(s: &str);
}

/// Console severity used by the `wasm_*` macros
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::console(
            $crate::api::helpers::ConsoleLevel::Debug,
            &format!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::console(
            $crate::api::helpers::ConsoleLevel::Info,
            &format!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::console(
            $crate::api::helpers::ConsoleLevel::Warn,
            &format!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::console(
            $crate::api::helpers::ConsoleLevel::Error,
            &format!($($arg)*),
        )
    };
}

/// Write one prefixed line to the browser console
pub fn console(level: ConsoleLevel, msg: &str) {
    match level {
        ConsoleLevel::Debug => console_log(&format!("[WASM] {}", msg)),
        ConsoleLevel::Info => console_info(&format!("[WASM] {}", msg)),
        ConsoleLevel::Warn => console_warn(&format!("[WASM] ⚠️ {}", msg)),
        ConsoleLevel::Error => console_error(&format!("[WASM] ❌ {}", msg)),
    }
}

fn boundary_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    let msg = format!("{}: {}", context, err);
    console(ConsoleLevel::Error, &msg);
    JsValue::from_str(&msg)
}

/// Read a JS value into `T`; failures become a thrown string prefixed by `context`
pub fn deserialize<T: DeserializeOwned>(value: JsValue, context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| boundary_error(context, e))
}

/// Convert `value` for JS
pub fn serialize<T: Serialize>(value: &T, context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| boundary_error(context, e))
}

pub fn surface_error(err: SurfaceError) -> JsValue {
    let msg = err.to_string();
    console(ConsoleLevel::Error, &msg);
    JsValue::from_str(&msg)
}

/// JS numbers arrive as `f64`; only whole, finite values are offsets
pub fn js_index(index: f64) -> Result<i64, JsValue> {
    if !index.is_finite() || index.fract() != 0.0 {
        return Err(boundary_error("Invalid index", index));
    }
    Ok(index as i64)
}
