//! Display List for surface rendering
//!
//! The display list is the derived, disposable form of the surface: one
//! element per character of the text buffer, carrying the CSS classes of
//! the annotations covering it. JavaScript rebuilds the DOM from it after
//! every edit; content is never read back out of the DOM.

use serde::{Deserialize, Serialize};

use crate::text::{AnnotationSet, TextBuffer, LINE_BREAK};

/// Whether annotation classes are applied
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RenderMode {
    /// Plain characters (unfocused surface)
    Static,
    /// Characters with annotation classes (focused surface)
    Annotated,
}

/// A single rendered element
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DisplayElement {
    /// One character, rendered as a span
    Char { ch: char, classes: Vec<String> },
    /// A line break, rendered as `<br/>`
    LineBreak { classes: Vec<String> },
}

impl DisplayElement {
    pub fn classes(&self) -> &[String] {
        match self {
            DisplayElement::Char { classes, .. } => classes,
            DisplayElement::LineBreak { classes } => classes,
        }
    }

    /// Text this element stands for in the canonical content
    pub fn content_char(&self) -> char {
        match self {
            DisplayElement::Char { ch, .. } => *ch,
            DisplayElement::LineBreak { .. } => LINE_BREAK,
        }
    }
}

/// Top-level display list
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DisplayList {
    pub mode: RenderMode,
    pub elements: Vec<DisplayElement>,
}

impl DisplayList {
    /// Build the display list from the canonical text and annotations
    pub fn build(buffer: &TextBuffer, annotations: &AnnotationSet, mode: RenderMode) -> Self {
        let elements = buffer
            .chars()
            .enumerate()
            .map(|(index, ch)| {
                let classes = match mode {
                    RenderMode::Static => Vec::new(),
                    RenderMode::Annotated => annotations
                        .types_at(index)
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                };
                if ch == LINE_BREAK {
                    DisplayElement::LineBreak { classes }
                } else {
                    DisplayElement::Char { ch, classes }
                }
            })
            .collect();

        Self { mode, elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Reconstruct the text, mapping line breaks to `"\n"`
    pub fn content(&self) -> String {
        self.elements.iter().map(DisplayElement::content_char).collect()
    }

    /// Render as an HTML fragment for the contenteditable element
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.elements.len() * 14);
        for element in &self.elements {
            match element {
                DisplayElement::Char { ch, classes } => {
                    html.push_str("<span");
                    push_class_attr(&mut html, classes);
                    html.push('>');
                    push_escaped_char(&mut html, *ch);
                    html.push_str("</span>");
                }
                DisplayElement::LineBreak { classes } => {
                    html.push_str("<br");
                    push_class_attr(&mut html, classes);
                    html.push_str("/>");
                }
            }
        }
        html
    }
}

fn push_class_attr(html: &mut String, classes: &[String]) {
    if classes.is_empty() {
        return;
    }
    html.push_str(" class=\"");
    for (i, class) in classes.iter().enumerate() {
        if i > 0 {
            html.push(' ');
        }
        for ch in class.chars() {
            push_escaped_char(html, ch);
        }
    }
    html.push('"');
}

fn push_escaped_char(html: &mut String, ch: char) {
    match ch {
        // Collapsible whitespace would vanish inside a span
        ' ' => html.push_str("&nbsp;"),
        '&' => html.push_str("&amp;"),
        '<' => html.push_str("&lt;"),
        '>' => html.push_str("&gt;"),
        '"' => html.push_str("&quot;"),
        _ => html.push(ch),
    }
}
