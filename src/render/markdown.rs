//! Markdown encoding.

use crate::error::Result;
use crate::model::{
    ChartContent, CollapsibleSection, Content, Document, GraphContent, SectionContent,
    TableContent, TextContent,
};

use super::{ContentEncoder, RenderOptions};

/// Markdown encoder: pipe tables, ATX headings, fenced diagrams and
/// `<details>` blocks for collapsible sections.
#[derive(Debug, Clone, Default)]
pub struct MarkdownEncoder {
    options: RenderOptions,
}

impl MarkdownEncoder {
    /// Format identifier.
    pub const FORMAT: &'static str = "markdown";

    /// Create a Markdown encoder.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn escape(&self, text: &str) -> String {
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.to_string()
        }
    }

    fn render_content(&self, output: &mut String, content: &Content) {
        match content {
            Content::Table(t) => self.render_table(output, t),
            Content::Text(t) => self.render_text(output, t),
            Content::Section(s) => self.render_section(output, s),
            Content::Collapsible(s) => self.render_collapsible(output, s),
            Content::Chart(c) => self.render_chart(output, c),
            Content::Graph(g) => self.render_graph(output, g),
            Content::Diagram(d) => {
                output.push_str(&format!("**{}**\n\n", self.escape(d.title())));
                output.push_str(&format!("```{}\n{}\n```", d.notation(), d.source().trim_end()));
            }
            Content::Raw(r) => {
                if r.matches_format(Self::FORMAT) {
                    output.push_str(&String::from_utf8_lossy(r.data()));
                }
            }
        }
    }

    fn render_children(&self, output: &mut String, children: &[Content]) {
        for child in children {
            let mut fragment = String::new();
            self.render_content(&mut fragment, child);
            if fragment.is_empty() {
                continue;
            }
            output.push_str("\n\n");
            output.push_str(&fragment);
        }
    }

    fn render_text(&self, output: &mut String, text: &TextContent) {
        let style = text.style();
        let mut result = self.escape(text.text());

        if style.header {
            let level = self.options.heading_level(1);
            output.push_str(&"#".repeat(level as usize));
            output.push(' ');
            output.push_str(&result);
            return;
        }

        // Apply styles (innermost first)
        if style.italic {
            result = format!("*{}*", result);
        }
        if style.bold {
            result = format!("**{}**", result);
        }
        output.push_str(&result);
    }

    fn render_section(&self, output: &mut String, section: &SectionContent) {
        let level = self.options.heading_level(section.level());
        output.push_str(&"#".repeat(level as usize));
        output.push(' ');
        output.push_str(&self.escape(section.title()));
        self.render_children(output, section.contents());
    }

    fn render_collapsible(&self, output: &mut String, section: &CollapsibleSection) {
        if section.is_expanded() {
            output.push_str("<details open>\n");
        } else {
            output.push_str("<details>\n");
        }
        let summary = escape_html(&self.escape(section.summary()));
        output.push_str(&format!("<summary>{}</summary>", summary));
        self.render_children(output, section.contents());
        output.push_str("\n\n</details>");
    }

    fn render_table(&self, output: &mut String, table: &TableContent) {
        let keys = table.schema().visible_keys();
        if keys.is_empty() {
            return;
        }

        if let Some(title) = table.title() {
            output.push_str(&format!("**{}**\n\n", self.escape(title)));
        }

        output.push('|');
        for key in &keys {
            output.push_str(&format!(" {} |", self.cell(key)));
        }
        output.push_str("\n|");
        for _ in &keys {
            output.push_str(" --- |");
        }

        for record in table.records() {
            output.push_str("\n|");
            for key in &keys {
                let text = TableContent::cell_text(record, key);
                output.push_str(&format!(" {} |", self.cell(&text)));
            }
        }
    }

    fn cell(&self, text: &str) -> String {
        let text = text.replace(['\r', '\n'], " ");
        let text = text.trim();
        if self.options.escape_special_chars {
            escape_markdown(text)
        } else {
            text.replace('|', "\\|")
        }
    }

    fn render_chart(&self, output: &mut String, chart: &ChartContent) {
        output.push_str(&format!("**{}**\n\n", self.escape(chart.title())));
        let data = serde_json::to_string_pretty(chart.data()).unwrap_or_default();
        output.push_str(&format!("```json chart={}\n{}\n```", chart.chart_type(), data));
    }

    fn render_graph(&self, output: &mut String, graph: &GraphContent) {
        output.push_str(&format!("**{}**\n\n", self.escape(graph.title())));
        output.push_str("```mermaid\ngraph TD");

        let nodes = graph.nodes();
        let node_id = |name: &str| nodes.iter().position(|n| *n == name).unwrap_or(0);
        for (i, name) in nodes.iter().enumerate() {
            output.push_str(&format!("\n    n{}[\"{}\"]", i, name.replace('"', "#quot;")));
        }
        for edge in graph.edges() {
            let arrow = match &edge.label {
                Some(label) => format!("-->|{}|", label.replace('|', "/")),
                None => "-->".to_string(),
            };
            output.push_str(&format!(
                "\n    n{} {} n{}",
                node_id(edge.from.as_str()),
                arrow,
                node_id(edge.to.as_str())
            ));
        }
        output.push_str("\n```");
    }
}

impl ContentEncoder for MarkdownEncoder {
    fn format(&self) -> &str {
        Self::FORMAT
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn encode(&self, content: &Content) -> Result<Vec<u8>> {
        let mut output = String::new();
        self.render_content(&mut output, content);
        Ok(output.into_bytes())
    }

    fn separator(&self) -> &[u8] {
        self.options.separator_or(b"\n\n")
    }

    fn prefix(&self, doc: &Document) -> Result<Vec<u8>> {
        if self.options.include_frontmatter && !doc.metadata().is_empty() {
            let mut frontmatter = doc.to_yaml_frontmatter();
            frontmatter.push('\n');
            Ok(frontmatter.into_bytes())
        } else {
            Ok(Vec::new())
        }
    }

    fn suffix(&self, doc: &Document) -> Result<Vec<u8>> {
        if doc.is_empty() {
            Ok(Vec::new())
        } else {
            Ok(b"\n".to_vec())
        }
    }
}

/// Escape special Markdown characters.
///
/// Only characters that could be misinterpreted as inline syntax or table
/// structure are escaped, to keep output readable.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '|' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}

/// Escape `&`, `<` and `>` for text inside an HTML element.
fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}
