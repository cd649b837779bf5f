//! Annotation layer for metadata on text
//!
//! Annotations are typed ranges stored separately from the text and linked
//! to it by `(start, length)` offsets. They track edits through
//! [`super::transform`]; nothing else mutates their ranges.

use serde::{Deserialize, Serialize};

/// `(start, length)` range, serialized as `[start, length]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Span {
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// Check if an offset is covered (exclusive end)
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, length): (usize, usize)) -> Self {
        Self { start, length }
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.start, span.length)
    }
}

/// A typed range of text, e.g. "bold" over `[0, 5]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: Span,
    /// Set once an edit consumed the whole range; never cleared
    #[serde(default)]
    pub deleted: bool,
}

impl Annotation {
    pub fn new(kind: impl Into<String>, start: usize, length: usize) -> Self {
        Self {
            kind: kind.into(),
            pos: Span::new(start, length),
            deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deleted
    }
}

/// Stable handle to an annotation: its insertion index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(pub usize);

/// Insertion-ordered annotation collection
///
/// Deleted annotations stay in place (soft delete), so ids never shift.
/// Overlapping and duplicate annotations are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationSet {
    annotations: Vec<Annotation>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    /// Append an annotation
    pub fn add(&mut self, annotation: Annotation) -> AnnotationId {
        self.annotations.push(annotation);
        AnnotationId(self.annotations.len() - 1)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id.0)
    }

    /// Number of records, deleted ones included
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// All records in insertion order, deleted ones included
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Non-deleted annotations with their ids, in insertion order
    pub fn active(&self) -> impl Iterator<Item = (AnnotationId, &Annotation)> {
        self.annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_active())
            .map(|(i, a)| (AnnotationId(i), a))
    }

    /// Visit every non-deleted annotation with mutable access to its fields
    pub fn for_each_active<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Annotation),
    {
        for annotation in self.annotations.iter_mut().filter(|a| a.is_active()) {
            f(annotation);
        }
    }

    /// Soft-delete an annotation; repeated calls are harmless
    pub fn mark_deleted(&mut self, id: AnnotationId) {
        if let Some(annotation) = self.annotations.get_mut(id.0) {
            annotation.deleted = true;
        }
    }

    /// Active annotations intersecting `[start, end)`
    ///
    /// Zero-length markers count when they sit inside the query range.
    pub fn overlapping(&self, start: usize, end: usize) -> Vec<(AnnotationId, &Annotation)> {
        self.active()
            .filter(|(_, a)| {
                if a.pos.length == 0 {
                    a.pos.start >= start && a.pos.start < end.max(start + 1)
                } else {
                    a.pos.start < end && a.pos.end() > start
                }
            })
            .collect()
    }

    /// Types of the active annotations covering one character, deduplicated
    pub fn types_at(&self, index: usize) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for (_, annotation) in self.active() {
            if annotation.pos.contains(index) && !types.contains(&annotation.kind.as_str()) {
                types.push(annotation.kind.as_str());
            }
        }
        types
    }
}

impl From<Vec<Annotation>> for AnnotationSet {
    fn from(annotations: Vec<Annotation>) -> Self {
        Self { annotations }
    }
}
