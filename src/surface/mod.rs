//! Surface orchestrator
//!
//! A [`Surface`] owns the canonical text, its annotations, the current
//! selection and the change emitter. Edit intents from the view are
//! validated here once; after validation the buffer is mutated and the
//! annotation ranges are transformed inside the same call, so no observer
//! ever sees text and ranges out of step.
//!
//! ## State machine
//!
//! ```text
//! Idle --activate--> Editing --commit--> Idle
//! ```
//!
//! A paste is the only operation spanning two calls: [`Surface::begin_paste`]
//! raises a guard and hands out a [`PendingPaste`]; [`Surface::resolve_paste`]
//! consumes it. While the guard is up every other edit is rejected and
//! focus changes are ignored.

pub mod events;
pub mod input;
pub mod options;

pub use events::{EventEmitter, Subscription, SurfaceEvent};
pub use input::{sanitize_pasted_text, Key};
pub use options::SurfaceOptions;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};
use crate::renderers::display_list::{DisplayList, RenderMode};
use crate::text::{
    apply_edit, Annotation, AnnotationId, AnnotationSet, Edit, Selection, SelectionMapper,
    TextBuffer, TextCore, ViewRange,
};

/// Focus state of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceState {
    Idle,
    Editing,
}

/// Ticket for a paste waiting on the view's deferred tick
///
/// Not `Clone`: a paste resolves exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingPaste {
    index: usize,
}

impl PendingPaste {
    /// Offset the pasted text will be inserted at
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct Surface {
    buffer: TextBuffer,
    annotations: AnnotationSet,
    selection: Selection,
    state: SurfaceState,
    /// Content as of the last commit
    committed: String,
    pasting: bool,
    paste_delay_ms: u32,
    render_annotations_on_load: bool,
    events: EventEmitter,
}

impl Surface {
    /// Build a surface from validated options
    pub fn new(options: SurfaceOptions) -> Result<Self> {
        options.validate()?;
        log::info!(
            "surface created: {} chars, {} annotation(s)",
            options.content.chars().count(),
            options.annotations.len()
        );

        Ok(Self {
            buffer: TextBuffer::from(options.content.as_str()),
            annotations: AnnotationSet::from(options.annotations),
            selection: Selection::default(),
            state: SurfaceState::Idle,
            committed: options.content,
            pasting: false,
            paste_delay_ms: options.paste_delay_ms,
            render_annotations_on_load: options.render_annotations_on_load,
            events: EventEmitter::new(),
        })
    }

    /// Surface over plain text with no annotations
    pub fn from_text(content: &str) -> Self {
        Self {
            buffer: TextBuffer::from(content),
            annotations: AnnotationSet::new(),
            selection: Selection::default(),
            state: SurfaceState::Idle,
            committed: content.to_string(),
            pasting: false,
            paste_delay_ms: options::DEFAULT_PASTE_DELAY_MS,
            render_annotations_on_load: false,
            events: EventEmitter::new(),
        }
    }

    // ------------------------------------------------------------------
    // State access
    // ------------------------------------------------------------------

    pub fn get_content(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_pasting(&self) -> bool {
        self.pasting
    }

    pub fn paste_delay_ms(&self) -> u32 {
        self.paste_delay_ms
    }

    pub fn events(&self) -> &EventEmitter {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventEmitter {
        &mut self.events
    }

    fn mapper(&self) -> SelectionMapper {
        SelectionMapper::new(self.buffer.len())
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render_mode(&self) -> RenderMode {
        if self.state == SurfaceState::Editing || self.render_annotations_on_load {
            RenderMode::Annotated
        } else {
            RenderMode::Static
        }
    }

    /// Current display list, rebuilt from the buffer and annotations
    pub fn display_list(&self) -> DisplayList {
        DisplayList::build(&self.buffer, &self.annotations, self.render_mode())
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// Surface gained focus
    pub fn activate(&mut self) -> DisplayList {
        if self.pasting {
            log::debug!("activate ignored: paste in flight");
        } else {
            self.state = SurfaceState::Editing;
        }
        self.display_list()
    }

    /// Surface lost focus: emit `content:changed` if the content differs
    /// from the last commit. Returns whether the event fired.
    pub fn commit(&mut self) -> bool {
        if self.pasting {
            log::debug!("commit ignored: paste in flight");
            return false;
        }
        self.state = SurfaceState::Idle;

        let content = self.get_content();
        if content == self.committed {
            return false;
        }

        let previous = std::mem::replace(&mut self.committed, content.clone());
        log::info!("content changed: {} -> {} chars", previous.chars().count(), content.chars().count());
        self.events.emit(&SurfaceEvent::ContentChanged { content, previous });
        true
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Select `[start, end)`, or place a caret at `start` if `end` is omitted
    ///
    /// Returns where the view should place its selection. Offsets past the
    /// end of the text are pulled back to the end.
    pub fn select(&mut self, start: usize, end: Option<usize>) -> ViewRange {
        let wanted = Selection::between(start, end.unwrap_or(start));
        let mapper = self.mapper();
        let view = mapper.from_offset(wanted.index, wanted.length);
        self.selection = mapper.to_offset(&view);
        view
    }

    /// Record the selection the view reports, in view coordinates
    pub fn select_view(&mut self, range: &ViewRange) -> Selection {
        self.selection = self.mapper().to_offset(range);
        self.selection
    }

    /// View placement for the current selection
    pub fn view_selection(&self) -> ViewRange {
        self.mapper().from_offset(self.selection.index, self.selection.length)
    }

    // ------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------

    fn ensure_not_pasting(&self) -> Result<()> {
        if self.pasting {
            log::warn!("edit rejected: paste in flight");
            return Err(SurfaceError::PasteInFlight);
        }
        Ok(())
    }

    /// Prepare an edit at `selection`: a non-empty selection is deleted
    /// first. Returns the caret the following insertion goes to.
    pub fn begin_edit(&mut self, selection: Selection) -> Result<usize> {
        self.ensure_not_pasting()?;
        self.state = SurfaceState::Editing;
        if selection.length > 0 {
            self.delete_at(selection.index, selection.length)?;
        }
        Ok(selection.index)
    }

    /// Insert `text` before the character at `at`
    pub fn apply_insert(&mut self, text: &str, at: usize) -> Result<Selection> {
        self.ensure_not_pasting()?;
        self.insert_at(text, at)
    }

    /// Delete `length` characters from `index`
    ///
    /// A negative index is a no-op that leaves all state unchanged.
    pub fn apply_delete(&mut self, index: i64, length: usize) -> Result<Selection> {
        self.ensure_not_pasting()?;
        if index < 0 {
            log::debug!("delete at {} ignored", index);
            return Ok(self.selection);
        }
        let index = usize::try_from(index)
            .map_err(|_| SurfaceError::range(usize::MAX, length, self.buffer.len()))?;
        self.delete_at(index, length)
    }

    /// Same as [`Surface::apply_delete`]
    pub fn delete_range(&mut self, index: i64, length: usize) -> Result<Selection> {
        self.apply_delete(index, length)
    }

    fn insert_at(&mut self, text: &str, at: usize) -> Result<Selection> {
        let len = self.buffer.len();
        if at > len {
            return Err(SurfaceError::range(at, 0, len));
        }
        if text.is_empty() {
            self.selection = Selection::caret(at);
            return Ok(self.selection);
        }

        let inserted = self.buffer.insert_str(at, text)?;
        apply_edit(&Edit::insert(at, inserted), &mut self.annotations);
        self.selection = Selection::caret(at + inserted);
        Ok(self.selection)
    }

    fn delete_at(&mut self, index: usize, length: usize) -> Result<Selection> {
        let len = self.buffer.len();
        match index.checked_add(length) {
            Some(end) if end <= len => {}
            _ => return Err(SurfaceError::range(index, length, len)),
        }
        if length == 0 {
            self.selection = Selection::caret(index);
            return Ok(self.selection);
        }

        self.buffer.remove_range(index, length)?;
        apply_edit(&Edit::delete(index, length), &mut self.annotations);
        self.selection = Selection::caret(index);
        Ok(self.selection)
    }

    /// Handle a key at the view's current selection
    pub fn handle_key(&mut self, key: Key, selection: Selection) -> Result<Selection> {
        self.ensure_not_pasting()?;
        match key.inserted_char() {
            Some(ch) => {
                let caret = self.begin_edit(selection)?;
                let mut utf8 = [0u8; 4];
                self.insert_at(ch.encode_utf8(&mut utf8), caret)
            }
            None if selection.length > 0 => self.delete_at(selection.index, selection.length),
            None => match selection.index.checked_sub(1) {
                Some(previous) => self.delete_at(previous, 1),
                None => {
                    self.selection = Selection::caret(0);
                    Ok(self.selection)
                }
            },
        }
    }

    // ------------------------------------------------------------------
    // Paste
    // ------------------------------------------------------------------

    /// Start a paste at `selection`, deleting it if non-empty
    pub fn begin_paste(&mut self, selection: Selection) -> Result<PendingPaste> {
        if self.pasting {
            log::warn!("second paste rejected while one is pending");
            return Err(SurfaceError::PasteInFlight);
        }
        let index = self.begin_edit(selection)?;
        self.pasting = true;
        log::debug!("paste pending at {}", index);
        Ok(PendingPaste { index })
    }

    /// Insert the pasted text once the view has read it back
    pub fn resolve_paste(&mut self, paste: PendingPaste, raw: &str) -> Result<Selection> {
        if !self.pasting {
            return Err(SurfaceError::NoPasteInFlight);
        }
        self.pasting = false;

        let text = sanitize_pasted_text(raw);
        self.insert_at(&text, paste.index)?;
        self.selection = Selection::caret(paste.index + text.chars().count());
        Ok(self.selection)
    }

    /// Paste in one step, for views that already hold the plain text
    pub fn paste(&mut self, selection: Selection, raw: &str) -> Result<Selection> {
        let pending = self.begin_paste(selection)?;
        self.resolve_paste(pending, raw)
    }

    // ------------------------------------------------------------------
    // Annotations
    // ------------------------------------------------------------------

    /// Add an annotation; it must fit inside the current text
    pub fn insert_annotation(&mut self, annotation: Annotation) -> Result<AnnotationId> {
        let len = self.buffer.len();
        if annotation.pos.end() > len {
            return Err(SurfaceError::range(annotation.pos.start, annotation.pos.length, len));
        }
        log::debug!("annotation '{}' added at {:?}", annotation.kind, annotation.pos);
        Ok(self.annotations.add(annotation))
    }

    /// Soft-delete an annotation by id
    pub fn remove_annotation(&mut self, id: AnnotationId) {
        self.annotations.mark_deleted(id);
    }
}
