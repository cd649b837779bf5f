//! Annotation range transformation
//!
//! Given an edit (insert or delete of `length` characters at `position`)
//! and an annotation set, update every active annotation's range so it
//! keeps covering the same text. Pure arithmetic: no I/O, no failure
//! modes. Callers validate the edit against the buffer first.

use super::annotations::{AnnotationSet, Span};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    Insert,
    Delete,
}

/// An edit applied to the text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub kind: EditKind,
    pub position: usize,
    pub length: usize,
}

impl Edit {
    pub fn insert(position: usize, length: usize) -> Self {
        Self {
            kind: EditKind::Insert,
            position,
            length,
        }
    }

    pub fn delete(position: usize, length: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            position,
            length,
        }
    }

    /// Exclusive end of the affected span
    pub fn end(&self) -> usize {
        self.position + self.length
    }
}

/// What happened to one annotation range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanOutcome {
    Kept(Span),
    Deleted,
}

/// Transform a single range against an edit
pub fn transform_span(edit: &Edit, span: Span) -> SpanOutcome {
    match edit.kind {
        EditKind::Insert => SpanOutcome::Kept(transform_insert(edit, span)),
        EditKind::Delete => transform_delete(edit, span),
    }
}

/// Insertion never deletes. An insertion exactly at the start of an
/// annotation grows it rather than shifting it: text typed at the start
/// of a bold run is bold.
fn transform_insert(edit: &Edit, span: Span) -> Span {
    let (a_start, a_end) = (span.start, span.end());
    let p = edit.position;

    if a_start <= p && p <= a_end {
        Span::new(a_start, span.length + edit.length)
    } else if p < a_start {
        Span::new(a_start + edit.length, span.length)
    } else {
        span
    }
}

/// Deletion cases are checked in priority order; the first match wins.
fn transform_delete(edit: &Edit, span: Span) -> SpanOutcome {
    let (a_start, a_end) = (span.start, span.end());
    let (s_start, s_end) = (edit.position, edit.end());

    // Exact cover
    if a_start == s_start && a_end == s_end {
        log::debug!("delete {}..{}: exact cover of {:?}", s_start, s_end, span);
        return SpanOutcome::Deleted;
    }

    // Deletion strictly inside the annotation
    if a_start < s_start && a_end > s_end {
        return SpanOutcome::Kept(Span::new(a_start, span.length - edit.length));
    }

    // Annotation entirely after the deleted span. `a_start == s_end` is not
    // matched here; it reaches the left-side case below with a zero overlap,
    // which moves the start to `s_start`, the same shift.
    if a_start > s_start && s_end < a_start {
        return SpanOutcome::Kept(Span::new(a_start - edit.length, span.length));
    }

    // Right-side overlap: deletion reaches or passes the annotation end
    if s_start <= a_end && s_end >= a_end {
        if s_start < a_start {
            // Swallowed from both sides without exact cover
            log::debug!("delete {}..{}: swallows {:?}, collapsing", s_start, s_end, span);
            return SpanOutcome::Kept(Span::new(s_start, 0));
        }
        return SpanOutcome::Kept(Span::new(a_start, span.length - (a_end - s_start)));
    }

    // Left-side overlap: deletion starts at/before the annotation and ends inside it
    if s_start <= a_start && s_end >= a_start {
        return SpanOutcome::Kept(Span::new(s_start, span.length - (s_end - a_start)));
    }

    SpanOutcome::Kept(span)
}

/// Apply an edit to every active annotation in the set
///
/// Zero-length results are kept as markers, not deleted.
pub fn apply_edit(edit: &Edit, annotations: &mut AnnotationSet) {
    log::debug!(
        "transforming {} annotation(s) for {:?} at {} (+{})",
        annotations.len(),
        edit.kind,
        edit.position,
        edit.length
    );

    annotations.for_each_active(|annotation| match transform_span(edit, annotation.pos) {
        SpanOutcome::Kept(pos) => annotation.pos = pos,
        SpanOutcome::Deleted => annotation.deleted = true,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::annotations::{Annotation, AnnotationId};

    fn kept(start: usize, length: usize) -> SpanOutcome {
        SpanOutcome::Kept(Span::new(start, length))
    }

    #[test]
    fn test_insert_inside_grows() {
        assert_eq!(transform_span(&Edit::insert(3, 2), Span::new(1, 4)), kept(1, 6));
    }

    #[test]
    fn test_insert_at_start_grows_instead_of_shifting() {
        assert_eq!(transform_span(&Edit::insert(2, 1), Span::new(2, 3)), kept(2, 4));
    }

    #[test]
    fn test_insert_at_end_grows() {
        assert_eq!(transform_span(&Edit::insert(5, 3), Span::new(2, 3)), kept(2, 6));
    }

    #[test]
    fn test_insert_before_shifts() {
        assert_eq!(transform_span(&Edit::insert(0, 2), Span::new(2, 3)), kept(4, 3));
    }

    #[test]
    fn test_insert_after_unchanged() {
        assert_eq!(transform_span(&Edit::insert(6, 2), Span::new(2, 3)), kept(2, 3));
    }

    #[test]
    fn test_insert_into_zero_length_marker() {
        assert_eq!(transform_span(&Edit::insert(4, 1), Span::new(4, 0)), kept(4, 1));
    }

    #[test]
    fn test_delete_exact_cover() {
        assert_eq!(transform_span(&Edit::delete(2, 2), Span::new(2, 2)), SpanOutcome::Deleted);
    }

    #[test]
    fn test_delete_inner_containment() {
        assert_eq!(transform_span(&Edit::delete(3, 2), Span::new(1, 6)), kept(1, 4));
    }

    #[test]
    fn test_delete_before_shifts_left() {
        assert_eq!(transform_span(&Edit::delete(0, 2), Span::new(4, 2)), kept(2, 2));
    }

    #[test]
    fn test_delete_ending_exactly_at_annotation_start_shifts_left() {
        // s_end == a_start falls through to the left-side case with no overlap
        assert_eq!(transform_span(&Edit::delete(1, 3), Span::new(4, 2)), kept(1, 2));
        assert_eq!(transform_span(&Edit::delete(0, 4), Span::new(4, 2)), kept(0, 2));
    }

    #[test]
    fn test_delete_right_side_partial() {
        // annotation [2,6) , delete [4,8)
        assert_eq!(transform_span(&Edit::delete(4, 4), Span::new(2, 4)), kept(2, 2));
    }

    #[test]
    fn test_delete_tail_of_annotation() {
        assert_eq!(transform_span(&Edit::delete(4, 2), Span::new(2, 4)), kept(2, 2));
    }

    #[test]
    fn test_delete_from_annotation_start_past_end_leaves_marker() {
        assert_eq!(transform_span(&Edit::delete(2, 6), Span::new(2, 3)), kept(2, 0));
    }

    #[test]
    fn test_delete_swallowing_annotation_collapses_to_marker() {
        assert_eq!(transform_span(&Edit::delete(0, 8), Span::new(2, 3)), kept(0, 0));
        assert_eq!(transform_span(&Edit::delete(1, 4), Span::new(2, 3)), kept(1, 0));
    }

    #[test]
    fn test_delete_left_side_partial() {
        // annotation [0,6), delete [0,1)
        assert_eq!(transform_span(&Edit::delete(0, 1), Span::new(0, 6)), kept(0, 5));
        // annotation [3,8), delete [1,5)
        assert_eq!(transform_span(&Edit::delete(1, 4), Span::new(3, 5)), kept(1, 3));
    }

    #[test]
    fn test_delete_starting_at_annotation_end_unchanged() {
        assert_eq!(transform_span(&Edit::delete(5, 2), Span::new(2, 3)), kept(2, 3));
    }

    #[test]
    fn test_delete_after_annotation_unchanged() {
        assert_eq!(transform_span(&Edit::delete(7, 2), Span::new(2, 3)), kept(2, 3));
    }

    #[test]
    fn test_apply_edit_leaves_deleted_annotations_alone() {
        let mut set = AnnotationSet::new();
        let cd = set.add(Annotation::new("bold", 2, 2));
        let ef = set.add(Annotation::new("italic", 4, 2));
        let ab = set.add(Annotation::new("link", 0, 2));

        apply_edit(&Edit::delete(2, 2), &mut set);
        assert!(set.get(cd).unwrap().deleted);
        assert_eq!(set.get(cd).unwrap().pos, Span::new(2, 2));
        assert_eq!(set.get(ef).unwrap().pos, Span::new(2, 2));
        assert_eq!(set.get(ab).unwrap().pos, Span::new(0, 2));

        apply_edit(&Edit::insert(0, 3), &mut set);
        assert_eq!(set.get(cd).unwrap().pos, Span::new(2, 2));
        assert_eq!(set.get(ef).unwrap().pos, Span::new(5, 2));
        assert_eq!(set.get(AnnotationId(2)).unwrap().pos, Span::new(0, 5));
    }
}
