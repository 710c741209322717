//! Status words to emoji.

use std::sync::OnceLock;

use regex::bytes::Regex;

use super::{format_list, ByteTransformer};
use crate::error::Result;

/// Replaces status markers with emoji in human-readable output.
///
/// | Marker       | Replacement |
/// |--------------|-------------|
/// | `Yes`, `OK`  | ✅          |
/// | `No`         | ❌          |
/// | `!!`         | 🚨          |
///
/// Words are matched whole, so `Nothing` and `Okay` are left alone.
#[derive(Debug, Clone)]
pub struct EmojiTransformer {
    priority: i32,
    formats: Vec<String>,
}

impl EmojiTransformer {
    /// Name the transformer registers under.
    pub const NAME: &'static str = "emoji";

    /// Create the transformer for markdown and text output.
    pub fn new() -> Self {
        Self {
            priority: 100,
            formats: format_list(["markdown", "text"]),
        }
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Replace the formats the transformer applies to.
    pub fn with_formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats = format_list(formats);
        self
    }
}

impl Default for EmojiTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"\b(?:Yes|OK)\b", "✅"),
            (r"\bNo\b", "❌"),
            (r"!!", "🚨"),
        ]
        .into_iter()
        .map(|(pattern, emoji)| (Regex::new(pattern).expect("valid emoji pattern"), emoji))
        .collect()
    })
}

impl ByteTransformer for EmojiTransformer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn transform(&self, input: Vec<u8>, _format: &str) -> Result<Vec<u8>> {
        let mut output = input;
        for (pattern, emoji) in rules() {
            if pattern.is_match(&output) {
                output = pattern.replace_all(&output, emoji.as_bytes()).into_owned();
            }
        }
        Ok(output)
    }
}
