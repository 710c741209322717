//! Unicode and whitespace normalization of rendered text.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::{format_list, ByteTransformer};
use crate::error::{Error, Result};

/// Normalization preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePreset {
    /// Unicode NFC only
    Minimal,
    /// NFC, ligatures, trailing whitespace, blank-line cap
    #[default]
    Standard,
}

/// Options for [`NormalizeTransformer`].
#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Replace ligature code points (ﬁ, ﬂ, ...) with plain letters
    pub fix_ligatures: bool,

    /// Strip spaces and tabs at the end of each line
    pub trim_trailing_whitespace: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,

    /// Leave a leading YAML front matter block untouched
    pub preserve_frontmatter: bool,
}

impl NormalizeOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        match preset {
            NormalizePreset::Minimal => Self::minimal(),
            NormalizePreset::Standard => Self::standard(),
        }
    }

    /// Minimal options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: false,
            trim_trailing_whitespace: false,
            max_consecutive_newlines: 0,
            preserve_frontmatter: true,
        }
    }

    /// Standard options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            trim_trailing_whitespace: true,
            max_consecutive_newlines: 2,
            preserve_frontmatter: true,
        }
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::standard()
    }
}

const LIGATURES: [(char, &str); 7] = [
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{FB05}', "st"),
    ('\u{FB06}', "st"),
];

/// Cleans up rendered text: Unicode NFC, ligatures, stray whitespace and
/// runs of blank lines.
///
/// Only text formats are touched by default (markdown, text, csv). Output
/// that is not valid UTF-8 fails the render.
#[derive(Debug, Clone)]
pub struct NormalizeTransformer {
    options: NormalizeOptions,
    priority: i32,
    formats: Vec<String>,
    newline_run: Option<Regex>,
}

impl NormalizeTransformer {
    /// Name the transformer registers under.
    pub const NAME: &'static str = "normalize";

    /// Create a transformer with the given options.
    pub fn new(options: NormalizeOptions) -> Self {
        let newline_run = match options.max_consecutive_newlines {
            0 => None,
            max => Regex::new(&format!(r"\n{{{},}}", max as usize + 1)).ok(),
        };
        Self {
            options,
            priority: 300,
            formats: format_list(["markdown", "text", "csv"]),
            newline_run,
        }
    }

    /// Create a transformer from a preset.
    pub fn from_preset(preset: NormalizePreset) -> Self {
        Self::new(NormalizeOptions::from_preset(preset))
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

    /// The active options.
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Normalize a string.
    pub fn process(&self, text: &str) -> String {
        if self.options.preserve_frontmatter {
            if let Some((frontmatter, body)) = split_frontmatter(text) {
                return format!("{}{}", frontmatter, self.process_body(body));
            }
        }
        self.process_body(text)
    }

    fn process_body(&self, text: &str) -> String {
        let mut result: String = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures && result.contains(is_ligature) {
            for (ligature, replacement) in LIGATURES {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.trim_trailing_whitespace {
            let trailing_newline = result.ends_with('\n');
            result = result
                .lines()
                .map(|line| line.trim_end_matches([' ', '\t']))
                .collect::<Vec<_>>()
                .join("\n");
            if trailing_newline {
                result.push('\n');
            }
        }

        if let Some(re) = &self.newline_run {
            let replacement = "\n".repeat(self.options.max_consecutive_newlines as usize);
            result = re.replace_all(&result, replacement.as_str()).into_owned();
        }

        result
    }
}

impl Default for NormalizeTransformer {
    fn default() -> Self {
        Self::new(NormalizeOptions::default())
    }
}

impl ByteTransformer for NormalizeTransformer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn transform(&self, input: Vec<u8>, format: &str) -> Result<Vec<u8>> {
        let text = String::from_utf8(input)
            .map_err(|e| Error::render(format, format!("output is not UTF-8: {}", e)))?;
        Ok(self.process(&text).into_bytes())
    }
}

fn is_ligature(c: char) -> bool {
    ('\u{FB00}'..='\u{FB06}').contains(&c)
}

fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let stripped = text.strip_prefix("---\n")?;
    let end = stripped.find("\n---\n")?;
    Some(text.split_at(4 + end + 5))
}
