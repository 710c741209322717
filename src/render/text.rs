//! Plain text encoding.

use crate::error::Result;
use crate::model::{Content, Document, TableContent};

use super::{ContentEncoder, RenderOptions};

/// Plain text encoder: aligned columns for tables, underlined titles for
/// headers and sections.
#[derive(Debug, Clone, Default)]
pub struct TextEncoder {
    options: RenderOptions,
}

impl TextEncoder {
    /// Format identifier.
    pub const FORMAT: &'static str = "text";

    /// Create a text encoder.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn render_content(&self, content: &Content) -> String {
        match content {
            Content::Table(t) => render_table(t),
            Content::Text(t) if t.style().header => underline(t.text(), '='),
            Content::Text(t) => t.text().to_string(),
            Content::Section(s) => {
                let rule = if s.level() <= 1 { '=' } else { '-' };
                self.with_children(underline(s.title(), rule), s.contents())
            }
            Content::Collapsible(s) => {
                let marker = if s.is_expanded() { '▾' } else { '▸' };
                self.with_children(format!("{} {}", marker, s.summary()), s.contents())
            }
            Content::Raw(r) if r.matches_format(Self::FORMAT) => {
                String::from_utf8_lossy(r.data()).into_owned()
            }
            Content::Raw(_) => String::new(),
            other => other.plain_text(),
        }
    }

    fn with_children(&self, head: String, children: &[Content]) -> String {
        let mut parts = vec![head];
        parts.extend(
            children
                .iter()
                .map(|c| self.render_content(c))
                .filter(|s| !s.is_empty()),
        );
        parts.join("\n\n")
    }
}

fn underline(title: &str, rule: char) -> String {
    let width = title.chars().count();
    format!("{}\n{}", title, rule.to_string().repeat(width))
}

fn render_table(table: &TableContent) -> String {
    let keys = table.schema().visible_keys();
    if keys.is_empty() {
        return String::new();
    }

    let rows: Vec<Vec<String>> = table
        .records()
        .iter()
        .map(|r| keys.iter().map(|k| TableContent::cell_text(r, k)).collect())
        .collect();

    let mut widths: Vec<usize> = keys.iter().map(|k| k.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 3);
    if let Some(title) = table.title() {
        lines.push(title.to_string());
    }
    let header: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    lines.push(line(header.as_slice()));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| line(row.as_slice())));
    lines.join("\n")
}

impl ContentEncoder for TextEncoder {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt", "text"]
    }

    fn encode(&self, content: &Content) -> Result<Vec<u8>> {
        Ok(self.render_content(content).into_bytes())
    }

    fn separator(&self) -> &[u8] {
        self.options.separator_or(b"\n\n")
    }

    fn suffix(&self, doc: &Document) -> Result<Vec<u8>> {
        if doc.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(b"\n".to_vec())
        }
    }
}
