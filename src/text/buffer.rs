//! Text buffer implementation (Layer 0)
//!
//! Pure character storage with no knowledge of annotations or rendering.
//! Offsets are character offsets, which is also what the view counts:
//! one rendered element per character.

use crate::error::{Result, SurfaceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker stored in the buffer for a line break
pub const LINE_BREAK: char = '\n';

/// Core text buffer trait
///
/// Minimal interface the surface needs from its content store. Different
/// implementations can use different backing stores (Vec, Rope, ...).
pub trait TextCore {
    /// Number of characters
    fn len(&self) -> usize;

    /// Get a character at an offset
    fn char_at(&self, index: usize) -> Option<char>;

    /// Copy out `length` characters starting at `index`
    fn slice(&self, index: usize, length: usize) -> Result<String>;

    /// Insert text before the character at `index` (`index == len` appends)
    fn insert_str(&mut self, index: usize, text: &str) -> Result<usize>;

    /// Remove `length` characters starting at `index`, returning them
    fn remove_range(&mut self, index: usize, length: usize) -> Result<String>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Character-vector text buffer
///
/// Suitable for the paragraph-sized content a surface edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBuffer {
    chars: Vec<char>,
}

impl TextBuffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self { chars: Vec::new() }
    }

    /// Iterate over the characters in order
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }

    fn check(&self, index: usize, length: usize) -> Result<()> {
        match index.checked_add(length) {
            Some(end) if end <= self.chars.len() => Ok(()),
            _ => Err(SurfaceError::range(index, length, self.chars.len())),
        }
    }
}

impl From<&str> for TextBuffer {
    fn from(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
        }
    }
}

impl fmt::Display for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.chars {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl TextCore for TextBuffer {
    fn len(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    fn slice(&self, index: usize, length: usize) -> Result<String> {
        self.check(index, length)?;
        Ok(self.chars[index..index + length].iter().collect())
    }

    fn insert_str(&mut self, index: usize, text: &str) -> Result<usize> {
        self.check(index, 0)?;
        let before = self.chars.len();
        self.chars.splice(index..index, text.chars());
        Ok(self.chars.len() - before)
    }

    fn remove_range(&mut self, index: usize, length: usize) -> Result<String> {
        self.check(index, length)?;
        Ok(self.chars.drain(index..index + length).collect())
    }
}
