//! JSON encoding.

use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::model::{Content, Document, Record, TableContent};

use super::{ContentEncoder, JsonFormat, RenderOptions};

/// JSON encoder.
///
/// Output is one object, `{"metadata": {...}, "contents": [...]}`, with one
/// array element per content item. Output is only valid once complete, so
/// the encoder does not stream.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    options: RenderOptions,
}

impl JsonEncoder {
    /// Format identifier.
    pub const FORMAT: &'static str = "json";

    /// Create a JSON encoder.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn pretty(&self) -> bool {
        self.options.json_format == JsonFormat::Pretty
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        let text = match self.options.json_format {
            JsonFormat::Pretty => serde_json::to_string_pretty(value)?,
            JsonFormat::Compact => serde_json::to_string(value)?,
        };
        Ok(text)
    }
}

/// Structured JSON form of one content item.
///
/// Tables list their visible columns and records restricted to those
/// columns. Raw content has no structured form and maps to `None`.
pub fn content_to_json(content: &Content) -> Option<Value> {
    let value = match content {
        Content::Table(t) => table_to_json(t),
        Content::Text(t) => json!({
            "type": "text",
            "id": t.id(),
            "text": t.text(),
            "style": t.style(),
        }),
        Content::Section(s) => json!({
            "type": "section",
            "id": s.id(),
            "title": s.title(),
            "level": s.level(),
            "contents": children_to_json(s.contents()),
        }),
        Content::Collapsible(s) => json!({
            "type": "collapsible",
            "id": s.id(),
            "summary": s.summary(),
            "expanded": s.is_expanded(),
            "contents": children_to_json(s.contents()),
        }),
        Content::Chart(c) => json!({
            "type": "chart",
            "id": c.id(),
            "title": c.title(),
            "chart_type": c.chart_type(),
            "data": c.data(),
        }),
        Content::Graph(g) => json!({
            "type": "graph",
            "id": g.id(),
            "title": g.title(),
            "nodes": g.nodes(),
            "edges": g.edges(),
        }),
        Content::Diagram(d) => json!({
            "type": "diagram",
            "id": d.id(),
            "title": d.title(),
            "notation": d.notation(),
            "source": d.source(),
        }),
        Content::Raw(_) => return None,
    };
    Some(value)
}

fn children_to_json(children: &[Content]) -> Vec<Value> {
    children.iter().filter_map(content_to_json).collect()
}

fn table_to_json(table: &TableContent) -> Value {
    let keys = table.schema().visible_keys();
    let records: Vec<Value> = table
        .records()
        .iter()
        .map(|r| visible_record(r, &keys))
        .collect();
    json!({
        "type": "table",
        "id": table.id(),
        "title": table.title(),
        "columns": keys,
        "records": records,
    })
}

fn visible_record(record: &Record, keys: &[&str]) -> Value {
    let mut map = Map::new();
    for key in keys {
        if let Some(value) = record.get(*key) {
            map.insert((*key).to_string(), value.clone());
        }
    }
    Value::Object(map)
}

/// Indent every line after the first by `width` spaces.
fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.replace('\n', &format!("\n{}", pad))
}

impl ContentEncoder for JsonEncoder {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn encode(&self, content: &Content) -> Result<Vec<u8>> {
        let text = match content {
            // Pre-encoded JSON is embedded verbatim.
            Content::Raw(r) if r.matches_format(Self::FORMAT) => {
                String::from_utf8_lossy(r.data()).trim().to_string()
            }
            other => match content_to_json(other) {
                Some(value) => self.serialize(&value)?,
                None => String::new(),
            },
        };
        if text.is_empty() {
            return Ok(Vec::new());
        }
        if self.pretty() {
            Ok(format!("    {}", indent(&text, 4)).into_bytes())
        } else {
            Ok(text.into_bytes())
        }
    }

    fn separator(&self) -> &[u8] {
        if self.pretty() {
            b",\n"
        } else {
            b","
        }
    }

    fn prefix(&self, doc: &Document) -> Result<Vec<u8>> {
        let metadata = Value::Object(doc.metadata().into_iter().collect());
        let metadata = self.serialize(&metadata)?;
        let text = if self.pretty() {
            format!(
                "{{\n  \"metadata\": {},\n  \"contents\": [\n",
                indent(&metadata, 2)
            )
        } else {
            format!("{{\"metadata\":{},\"contents\":[", metadata)
        };
        Ok(text.into_bytes())
    }

    fn suffix(&self, _doc: &Document) -> Result<Vec<u8>> {
        if self.pretty() {
            Ok(b"\n  ]\n}\n".to_vec())
        } else {
            Ok(b"]}".to_vec())
        }
    }

    fn supports_streaming(&self) -> bool {
        false
    }
}
