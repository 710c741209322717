//! ANSI color stripping.

use std::sync::OnceLock;

use regex::bytes::Regex;

use super::{format_list, ByteTransformer};
use crate::error::Result;

fn ansi_sgr() -> &'static Regex {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI pattern"))
}

/// Removes ANSI SGR escape sequences (colors, bold, reset) from output.
#[derive(Debug, Clone)]
pub struct StripColorsTransformer {
    priority: i32,
    formats: Vec<String>,
}

impl StripColorsTransformer {
    /// Name the transformer registers under.
    pub const NAME: &'static str = "strip-colors";

    /// Create the transformer for every format.
    pub fn new() -> Self {
        Self {
            priority: 200,
            formats: Vec::new(),
        }
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the transformer to the given formats.
    pub fn with_formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats = format_list(formats);
        self
    }
}

impl Default for StripColorsTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteTransformer for StripColorsTransformer {
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
        let re = ansi_sgr();
        if !re.is_match(&input) {
            return Ok(input);
        }
        Ok(re.replace_all(&input, &b""[..]).into_owned())
    }
}
