//! Text and raw content.

use serde::{Deserialize, Serialize};

use super::content::new_id;

/// Presentation hints for a text block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Render as a header line
    #[serde(default)]
    pub header: bool,
    /// Bold text
    #[serde(default)]
    pub bold: bool,
    /// Italic text
    #[serde(default)]
    pub italic: bool,
}

/// A block of free text.
#[derive(Debug, Clone)]
pub struct TextContent {
    id: String,
    text: String,
    style: TextStyle,
}

impl TextContent {
    /// Create plain text.
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, TextStyle::default())
    }

    /// Create text with a style.
    pub fn styled(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            id: new_id("text"),
            text: text.into(),
            style,
        }
    }

    /// Create a header line.
    pub fn header(text: impl Into<String>) -> Self {
        Self::styled(
            text,
            TextStyle {
                header: true,
                ..Default::default()
            },
        )
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The style.
    pub fn style(&self) -> TextStyle {
        self.style
    }

    /// Replace the text, keeping id and style.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            id: self.id.clone(),
            text: text.into(),
            style: self.style,
        }
    }
}

/// Pre-encoded bytes for one specific format, passed through untouched.
///
/// Encoders of other formats render raw content as nothing.
#[derive(Debug, Clone)]
pub struct RawContent {
    id: String,
    format: String,
    data: Vec<u8>,
}

impl RawContent {
    /// Create raw content for `format`.
    pub fn new(format: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            id: new_id("raw"),
            format: format.into(),
            data: data.into(),
        }
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The format these bytes belong to.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// The raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Check whether the bytes belong to `format` (case-insensitive).
    pub fn matches_format(&self, format: &str) -> bool {
        self.format.eq_ignore_ascii_case(format)
    }
}
