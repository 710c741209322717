//! CSV encoding.
//!
//! Only tables have a CSV representation. Tables nested in sections are
//! emitted in document order; every other content kind encodes to nothing.

use crate::error::Result;
use crate::model::{Content, Document, TableContent};

use super::{ContentEncoder, RenderOptions};

/// CSV encoder with RFC 4180 quoting and a configurable delimiter.
#[derive(Debug, Clone, Default)]
pub struct CsvEncoder {
    options: RenderOptions,
}

impl CsvEncoder {
    /// Format identifier.
    pub const FORMAT: &'static str = "csv";

    /// Create a CSV encoder.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn delimiter(&self) -> char {
        self.options.csv_delimiter
    }

    fn collect_tables(&self, content: &Content, out: &mut Vec<String>) {
        match content {
            Content::Table(t) => {
                let encoded = self.render_table(t);
                if !encoded.is_empty() {
                    out.push(encoded);
                }
            }
            Content::Section(s) => s.contents().iter().for_each(|c| self.collect_tables(c, out)),
            Content::Collapsible(s) => {
                s.contents().iter().for_each(|c| self.collect_tables(c, out))
            }
            Content::Raw(r) if r.matches_format(Self::FORMAT) => {
                out.push(String::from_utf8_lossy(r.data()).into_owned())
            }
            _ => {}
        }
    }

    fn render_table(&self, table: &TableContent) -> String {
        let keys = table.schema().visible_keys();
        if keys.is_empty() {
            return String::new();
        }

        let delimiter = self.delimiter().to_string();
        let mut lines = Vec::with_capacity(table.row_count() + 1);
        lines.push(
            keys.iter()
                .map(|k| self.quote(k))
                .collect::<Vec<_>>()
                .join(&delimiter),
        );
        for record in table.records() {
            lines.push(
                keys.iter()
                    .map(|k| self.quote(&TableContent::cell_text(record, k)))
                    .collect::<Vec<_>>()
                    .join(&delimiter),
            );
        }
        lines.join("\n")
    }

    /// Quote a field if it contains the delimiter, a quote or a line break.
    fn quote(&self, field: &str) -> String {
        let needs_quotes = field
            .chars()
            .any(|c| c == self.delimiter() || c == '"' || c == '\n' || c == '\r');
        if needs_quotes {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl ContentEncoder for CsvEncoder {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn file_extensions(&self) -> &[&str] {
        &["csv"]
    }

    fn encode(&self, content: &Content) -> Result<Vec<u8>> {
        let mut tables = Vec::new();
        self.collect_tables(content, &mut tables);
        let separator = String::from_utf8_lossy(self.separator()).into_owned();
        Ok(tables.join(&separator).into_bytes())
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
