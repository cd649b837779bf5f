//! Key and paste input decoding

use crate::error::{Result, SurfaceError};
use crate::text::LINE_BREAK;

/// A key the surface reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
}

impl Key {
    /// Decode a key as the view names it: "enter", "backspace", or a single character
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "enter" => Ok(Key::Enter),
            "backspace" => Ok(Key::Backspace),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Ok(Key::Char(ch)),
                    _ => Err(SurfaceError::InvalidKey(name.to_string())),
                }
            }
        }
    }

    /// Decode a keypress character code
    pub fn from_char_code(code: u32) -> Result<Self> {
        match code {
            8 => Ok(Key::Backspace),
            10 | 13 => Ok(Key::Enter),
            _ => match char::from_u32(code) {
                Some(ch) if !ch.is_control() => Ok(Key::Char(ch)),
                _ => Err(SurfaceError::InvalidKey(format!("char code {}", code))),
            },
        }
    }

    /// Text this key inserts, if any
    pub fn inserted_char(&self) -> Option<char> {
        match self {
            Key::Char(ch) => Some(*ch),
            Key::Enter => Some(LINE_BREAK),
            Key::Backspace => None,
        }
    }
}

/// Reduce pasted content to the single-run plain text the surface inserts
///
/// Surrounding whitespace is trimmed and line breaks are dropped.
pub fn sanitize_pasted_text(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
