//! Surface configuration
//!
//! Options arrive from JavaScript as a plain object (or as JSON in tests
//! and tools) and are validated before a surface is built from them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};
use crate::text::Annotation;

/// Default delay before reading pasted content back from the staging element
pub const DEFAULT_PASTE_DELAY_MS: u32 = 10;

fn default_paste_delay_ms() -> u32 {
    DEFAULT_PASTE_DELAY_MS
}

/// Options for constructing a surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceOptions {
    /// Initial content
    #[serde(default)]
    pub content: String,

    /// Initial annotations, in insertion order
    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Milliseconds to wait for the browser to fill the paste staging element
    #[serde(default = "default_paste_delay_ms")]
    pub paste_delay_ms: u32,

    /// Render annotation classes before the surface is first focused
    #[serde(default)]
    pub render_annotations_on_load: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            content: String::new(),
            annotations: Vec::new(),
            paste_delay_ms: DEFAULT_PASTE_DELAY_MS,
            render_annotations_on_load: false,
        }
    }
}

impl SurfaceOptions {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Default::default()
        }
    }

    /// Builder-style annotation
    pub fn annotate(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Parse options from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| SurfaceError::InvalidOptions(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Check that every annotation fits inside the content
    pub fn validate(&self) -> Result<()> {
        let len = self.content.chars().count();
        for annotation in &self.annotations {
            if annotation.pos.end() > len {
                return Err(SurfaceError::InvalidOptions(format!(
                    "annotation '{}' at [{}, {}] exceeds content length {}",
                    annotation.kind, annotation.pos.start, annotation.pos.length, len
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_object() {
        let options = SurfaceOptions::from_json("{}").unwrap();
        assert_eq!(options, SurfaceOptions::default());
        assert_eq!(options.paste_delay_ms, 10);
    }

    #[test]
    fn test_camel_case_keys() {
        let options = SurfaceOptions::from_json(
            r#"{"content":"Hello","annotations":[{"type":"bold","pos":[0,5]}],"pasteDelayMs":25,"renderAnnotationsOnLoad":true}"#,
        )
        .unwrap();
        assert_eq!(options.content, "Hello");
        assert_eq!(options.annotations, vec![Annotation::new("bold", 0, 5)]);
        assert_eq!(options.paste_delay_ms, 25);
        assert!(options.render_annotations_on_load);
    }

    #[test]
    fn test_annotation_past_content_is_rejected() {
        let err = SurfaceOptions::from_json(r#"{"content":"Hi","annotations":[{"type":"bold","pos":[1,5]}]}"#)
            .unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidOptions(_)));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            SurfaceOptions::from_json("{\"content\": 3}"),
            Err(SurfaceError::InvalidOptions(_))
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        let options = SurfaceOptions::with_content("héllo").annotate(Annotation::new("em", 0, 5));
        assert!(options.validate().is_ok());
    }
}
