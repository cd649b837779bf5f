//! JavaScript-facing surface class
//!
//! Each `new Surface(options)` on the JS side owns one core [`Surface`];
//! there is no module-level document. The view forwards keys, pastes and
//! focus changes here and re-renders from the returned display list.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::api::helpers::{deserialize, js_index, serialize, surface_error};
use crate::api::types::EditResult;
use crate::surface::{Key, PendingPaste, Surface, SurfaceEvent, SurfaceOptions};
use crate::text::{Annotation, AnnotationId, Selection, ViewRange};
use crate::{wasm_error, wasm_info, wasm_log, wasm_warn};

struct Shared {
    surface: RefCell<Surface>,
    /// Paste waiting for the view to hand back plain text
    pending: RefCell<Option<PendingPaste>>,
    /// Events raised by the core, delivered once the surface borrow is released
    outbox: Rc<RefCell<Vec<SurfaceEvent>>>,
    listeners: RefCell<Vec<(u32, String, js_sys::Function)>>,
    next_listener: Cell<u32>,
}

impl Shared {
    fn new(mut surface: Surface) -> Self {
        let outbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outbox);
        surface
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Shared {
            surface: RefCell::new(surface),
            pending: RefCell::new(None),
            outbox,
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
        }
    }

    fn deliver_events(&self) {
        let events: Vec<SurfaceEvent> = self.outbox.borrow_mut().drain(..).collect();
        if events.is_empty() {
            return;
        }
        let listeners = self.listeners.borrow().clone();
        for event in &events {
            let SurfaceEvent::ContentChanged { content, previous } = event;
            for (_, name, callback) in listeners.iter().filter(|(_, name, _)| name == event.name()) {
                if let Err(e) = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(content),
                    &JsValue::from_str(previous),
                ) {
                    wasm_error!("'{}' listener threw: {:?}", name, e);
                }
            }
        }
    }

    fn resolve_pending(&self, raw: &str) -> Result<Selection, JsValue> {
        let pending = self
            .pending
            .borrow_mut()
            .take()
            .ok_or_else(|| surface_error(crate::error::SurfaceError::NoPasteInFlight))?;
        self.surface
            .borrow_mut()
            .resolve_paste(pending, raw)
            .map_err(surface_error)
    }

    /// Drop a pending paste that will never be resolved, lowering the guard
    fn abandon_paste(&self) {
        if let Some(pending) = self.pending.borrow_mut().take() {
            let mut surface = self.surface.borrow_mut();
            if surface.resolve_paste(pending, "").is_err() {
                log::warn!("abandoned paste was no longer pending");
            }
        }
    }
}

fn edit_result(surface: &Surface) -> Result<JsValue, JsValue> {
    let result = EditResult {
        display_list: surface.display_list(),
        selection: surface.selection(),
        view_selection: surface.view_selection(),
    };
    serialize(&result, "Failed to serialize edit result")
}

/// Annotated text surface
#[wasm_bindgen(js_name = Surface)]
pub struct SurfaceHandle {
    shared: Rc<Shared>,
}

impl SurfaceHandle {
    fn apply_key(&self, key: Key, index: usize, length: usize) -> Result<JsValue, JsValue> {
        wasm_log!("key {:?} at ({}, {})", key, index, length);
        let mut surface = self.shared.surface.borrow_mut();
        surface
            .handle_key(key, Selection::new(index, length))
            .map_err(surface_error)?;
        edit_result(&surface)
    }
}

#[wasm_bindgen(js_class = Surface)]
impl SurfaceHandle {
    /// Create a surface from an options object (`content`, `annotations`, ...)
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<SurfaceHandle, JsValue> {
        let options: SurfaceOptions = if options.is_undefined() || options.is_null() {
            SurfaceOptions::default()
        } else {
            deserialize(options, "Invalid surface options")?
        };

        let surface = Surface::new(options).map_err(surface_error)?;
        wasm_info!("Surface created with {} chars", surface.len());

        Ok(SurfaceHandle {
            shared: Rc::new(Shared::new(surface)),
        })
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = getContent)]
    pub fn get_content(&self) -> String {
        self.shared.surface.borrow().get_content()
    }

    #[wasm_bindgen(js_name = displayList)]
    pub fn display_list(&self) -> Result<JsValue, JsValue> {
        serialize(&self.shared.surface.borrow().display_list(), "Failed to serialize display list")
    }

    #[wasm_bindgen(js_name = renderHtml)]
    pub fn render_html(&self) -> String {
        self.shared.surface.borrow().display_list().to_html()
    }

    pub fn annotations(&self) -> Result<JsValue, JsValue> {
        serialize(self.shared.surface.borrow().annotations(), "Failed to serialize annotations")
    }

    pub fn selection(&self) -> Result<JsValue, JsValue> {
        serialize(&self.shared.surface.borrow().selection(), "Failed to serialize selection")
    }

    #[wasm_bindgen(js_name = isPasting)]
    pub fn is_pasting(&self) -> bool {
        self.shared.surface.borrow().is_pasting()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `[start, end)`, or place a caret when `end` is omitted.
    /// Returns the view range to apply.
    pub fn select(&self, start: usize, end: Option<usize>) -> Result<JsValue, JsValue> {
        let view = self.shared.surface.borrow_mut().select(start, end);
        serialize(&view, "Failed to serialize view range")
    }

    /// Report the view's selection; returns it as `(index, length)`
    #[wasm_bindgen(js_name = selectView)]
    pub fn select_view(&self, range: JsValue) -> Result<JsValue, JsValue> {
        let range: ViewRange = deserialize(range, "Invalid view range")?;
        let selection = self.shared.surface.borrow_mut().select_view(&range);
        serialize(&selection, "Failed to serialize selection")
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    /// Handle "enter", "backspace" or a single typed character
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str, index: usize, length: usize) -> Result<JsValue, JsValue> {
        let key = Key::from_name(key).map_err(surface_error)?;
        self.apply_key(key, index, length)
    }

    /// Handle a keypress character code
    #[wasm_bindgen(js_name = handleKeyCode)]
    pub fn handle_key_code(&self, code: u32, index: usize, length: usize) -> Result<JsValue, JsValue> {
        let key = Key::from_char_code(code).map_err(surface_error)?;
        self.apply_key(key, index, length)
    }

    #[wasm_bindgen(js_name = insertText)]
    pub fn insert_text(&self, text: &str, at: usize) -> Result<JsValue, JsValue> {
        let mut surface = self.shared.surface.borrow_mut();
        surface.apply_insert(text, at).map_err(surface_error)?;
        edit_result(&surface)
    }

    /// Delete `length` characters at `index`; a negative index is ignored
    #[wasm_bindgen(js_name = deleteRange)]
    pub fn delete_range(&self, index: f64, length: usize) -> Result<JsValue, JsValue> {
        let index = js_index(index)?;
        let mut surface = self.shared.surface.borrow_mut();
        surface.delete_range(index, length).map_err(surface_error)?;
        edit_result(&surface)
    }

    #[wasm_bindgen(js_name = insertAnnotation)]
    pub fn insert_annotation(&self, annotation: JsValue) -> Result<usize, JsValue> {
        let annotation: Annotation = deserialize(annotation, "Invalid annotation")?;
        let id = self
            .shared
            .surface
            .borrow_mut()
            .insert_annotation(annotation)
            .map_err(surface_error)?;
        Ok(id.0)
    }

    #[wasm_bindgen(js_name = removeAnnotation)]
    pub fn remove_annotation(&self, id: usize) {
        self.shared.surface.borrow_mut().remove_annotation(AnnotationId(id));
    }

    // ------------------------------------------------------------------
    // Paste
    // ------------------------------------------------------------------

    /// Start a paste; returns the offset the text will land at
    #[wasm_bindgen(js_name = beginPaste)]
    pub fn begin_paste(&self, index: usize, length: usize) -> Result<usize, JsValue> {
        let pending = self
            .shared
            .surface
            .borrow_mut()
            .begin_paste(Selection::new(index, length))
            .map_err(surface_error)?;
        let at = pending.index();
        *self.shared.pending.borrow_mut() = Some(pending);
        Ok(at)
    }

    /// Finish the paste started by `beginPaste` with the staged plain text
    #[wasm_bindgen(js_name = resolvePaste)]
    pub fn resolve_paste(&self, text: &str) -> Result<JsValue, JsValue> {
        self.shared.resolve_pending(text)?;
        edit_result(&self.shared.surface.borrow())
    }

    /// Start a paste and resolve it after the configured delay, reading the
    /// staged text through `read_pasted`. `on_done` receives the edit result.
    #[wasm_bindgen(js_name = handlePaste)]
    pub fn handle_paste(
        &self,
        index: usize,
        length: usize,
        read_pasted: js_sys::Function,
        on_done: Option<js_sys::Function>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
        self.begin_paste(index, length)?;
        let delay = self.shared.surface.borrow().paste_delay_ms();

        let shared = Rc::clone(&self.shared);
        let callback = Closure::once_into_js(move || {
            let raw = match read_pasted.call0(&JsValue::NULL) {
                Ok(value) => value.as_string().unwrap_or_default(),
                Err(e) => {
                    wasm_warn!("readPasted threw, pasting nothing: {:?}", e);
                    String::new()
                }
            };
            let outcome = shared
                .resolve_pending(&raw)
                .and_then(|_| edit_result(&shared.surface.borrow()));
            match (outcome, on_done) {
                (Ok(result), Some(done)) => {
                    if let Err(e) = done.call1(&JsValue::NULL, &result) {
                        wasm_error!("paste completion callback threw: {:?}", e);
                    }
                }
                (Ok(_), None) => {}
                (Err(e), _) => wasm_error!("paste failed: {:?}", e),
            }
        });

        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay as i32,
        ) {
            wasm_error!("could not schedule paste: {:?}", e);
            self.shared.abandon_paste();
            return Err(e);
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Surface gained focus; returns the annotated display list
    pub fn focus(&self) -> Result<JsValue, JsValue> {
        let list = self.shared.surface.borrow_mut().activate();
        serialize(&list, "Failed to serialize display list")
    }

    /// Surface lost focus; fires `content:changed` listeners if the content
    /// changed and returns the static display list
    pub fn blur(&self) -> Result<JsValue, JsValue> {
        let list = {
            let mut surface = self.shared.surface.borrow_mut();
            surface.commit();
            surface.display_list()
        };
        self.shared.deliver_events();
        serialize(&list, "Failed to serialize display list")
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register `callback(content, previous)` for an event; returns a handle for `off`
    pub fn on(&self, event: &str, callback: js_sys::Function) -> Result<u32, JsValue> {
        if event != SurfaceEvent::CONTENT_CHANGED {
            wasm_warn!("Unknown event '{}'", event);
            return Err(JsValue::from_str(&format!("Unknown event: {}", event)));
        }
        let id = self.shared.next_listener.get();
        self.shared.next_listener.set(id.wrapping_add(1));
        self.shared
            .listeners
            .borrow_mut()
            .push((id, event.to_string(), callback));
        Ok(id)
    }

    /// Remove a listener; returns false for an unknown handle
    pub fn off(&self, handle: u32) -> bool {
        let mut listeners = self.shared.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _, _)| *id != handle);
        listeners.len() != before
    }
}
