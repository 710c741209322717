//! Rendering options and configuration.

/// JSON output layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Options shared by the built-in encoders.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with metadata (markdown)
    pub include_frontmatter: bool,

    /// Escape special Markdown characters in text and cells
    pub escape_special_chars: bool,

    /// Added to every section level before it becomes a heading level
    pub heading_offset: u8,

    /// Maximum heading level (1-6)
    pub max_heading_level: u8,

    /// JSON layout
    pub json_format: JsonFormat,

    /// Field delimiter for CSV output
    pub csv_delimiter: char,

    /// Replaces the encoder's fragment separator (ignored by JSON)
    pub separator: Option<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Set the heading offset.
    pub fn with_heading_offset(mut self, offset: u8) -> Self {
        self.heading_offset = offset;
        self
    }

    /// Set the maximum heading level.
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }

    /// Set the CSV delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Override the separator placed between fragments.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Heading level for a section at `level`, after offset and clamping.
    pub fn heading_level(&self, level: u8) -> u8 {
        level
            .saturating_add(self.heading_offset)
            .clamp(1, self.max_heading_level.clamp(1, 6))
    }

    pub(crate) fn separator_or<'a>(&'a self, default: &'a [u8]) -> &'a [u8] {
        self.separator.as_deref().map_or(default, str::as_bytes)
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            escape_special_chars: true,
            heading_offset: 0,
            max_heading_level: 6,
            json_format: JsonFormat::Pretty,
            csv_delimiter: ',',
            separator: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_frontmatter(true)
            .with_max_heading(9)
            .with_json_format(JsonFormat::Compact)
            .with_csv_delimiter(';');

        assert!(options.include_frontmatter);
        assert_eq!(options.max_heading_level, 6);
        assert_eq!(options.json_format, JsonFormat::Compact);
        assert_eq!(options.csv_delimiter, ';');
    }

    #[test]
    fn test_heading_level() {
        let options = RenderOptions::new().with_heading_offset(1).with_max_heading(3);
        assert_eq!(options.heading_level(1), 2);
        assert_eq!(options.heading_level(5), 3);
    }

    #[test]
    fn test_separator_override() {
        let options = RenderOptions::new();
        assert_eq!(options.separator_or(b"\n\n"), b"\n\n");
        let options = options.with_separator("\n---\n");
        assert_eq!(options.separator_or(b"\n\n"), b"\n---\n");
    }
}
