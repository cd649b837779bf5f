//! Selection management and view-position mapping
//!
//! A [`Selection`] is a linear `(index, length)` pair over the text buffer.
//! The view does not address characters by offset: it places its caret
//! relative to rendered elements, described here by [`ViewAnchor`].
//! [`SelectionMapper`] converts between the two.

use serde::{Deserialize, Serialize};

/// Linear selection over the text buffer; `length == 0` is a caret
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub index: usize,
    pub length: usize,
}

impl Selection {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// Create a collapsed selection (caret only)
    pub fn caret(index: usize) -> Self {
        Self { index, length: 0 }
    }

    /// Build from a `[start, end)` pair given in either order
    pub fn between(a: usize, b: usize) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            index: start,
            length: end - start,
        }
    }

    pub fn is_caret(&self) -> bool {
        self.length == 0
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.index + self.length
    }
}

/// A boundary between rendered elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "element", rename_all = "camelCase")]
pub enum ViewAnchor {
    /// Immediately before the element at this index
    Before(usize),
    /// After the last rendered element
    AfterLast,
}

/// A view-level range; collapsed when `start == end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRange {
    pub start: ViewAnchor,
    pub end: ViewAnchor,
}

impl ViewRange {
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Converts between linear offsets and view anchors
///
/// Only the text length is needed: the view renders exactly one element
/// per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionMapper {
    text_len: usize,
}

impl SelectionMapper {
    pub fn new(text_len: usize) -> Self {
        Self { text_len }
    }

    /// Offset of an anchor; anything at or past the end maps to the text length
    pub fn anchor_offset(&self, anchor: ViewAnchor) -> usize {
        match anchor {
            ViewAnchor::Before(element) => element.min(self.text_len),
            ViewAnchor::AfterLast => self.text_len,
        }
    }

    /// Anchor for an offset; the end of the text targets `AfterLast`
    pub fn anchor_for(&self, offset: usize) -> ViewAnchor {
        if offset >= self.text_len {
            ViewAnchor::AfterLast
        } else {
            ViewAnchor::Before(offset)
        }
    }

    /// Map a view range to a linear selection
    pub fn to_offset(&self, range: &ViewRange) -> Selection {
        let start = self.anchor_offset(range.start);
        let end = self.anchor_offset(range.end);
        Selection::new(start, end.saturating_sub(start))
    }

    /// Map a linear selection to a view range
    pub fn from_offset(&self, index: usize, length: usize) -> ViewRange {
        let start = self.anchor_for(index);
        if length == 0 {
            return ViewRange { start, end: start };
        }
        ViewRange {
            start,
            end: self.anchor_for(index.saturating_add(length)),
        }
    }
}
