//! # docform
//!
//! Format-agnostic document rendering for Rust.
//!
//! A [`Document`] is an immutable, ordered list of content items (tables,
//! text, sections, charts, graphs, diagrams, raw pre-encoded payloads).
//! Renderers walk it and encode each item for one output format, running an
//! optional [`TransformPipeline`] of data and byte transformers on the way.
//!
//! ## Quick Start
//!
//! ```
//! use docform::model::record;
//! use docform::Document;
//! use serde_json::json;
//!
//! fn main() -> docform::Result<()> {
//!     let builder = Document::builder();
//!     builder.header("Scores").table(
//!         Some("Top"),
//!         ["name", "score"],
//!         vec![
//!             record([("name", json!("Bob")), ("score", json!(90))]),
//!             record([("name", json!("Alice")), ("score", json!(95))]),
//!         ],
//!     );
//!     let doc = builder.build();
//!
//!     let markdown = docform::to_markdown(&doc)?;
//!     assert!(markdown.starts_with("# Scores"));
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Multiple output formats**: Markdown, plain text, JSON, CSV
//! - **Table operations**: filter, sort, limit, computed columns, group-by
//! - **Transform pipeline**: prioritized data and byte transformers
//! - **Cancellation**: cooperative, checked between items and transformers
//! - **Parallel output**: one document rendered to several formats with Rayon

pub mod cancel;
pub mod error;
pub mod model;
pub mod operation;
pub mod render;
pub mod transform;

// Re-export commonly used types
pub use cancel::Cancellation;
pub use error::{Error, ErrorKind, Result};
pub use model::{
    ChartContent, CollapsibleSection, Content, ContentKind, DiagramContent, Document,
    DocumentBuilder, Field, GraphContent, Metadata, RawContent, Record, Schema, SectionContent,
    TableContent, TextContent, TextStyle,
};
pub use operation::Operation;
pub use render::{
    ContentEncoder, DocumentRenderer, JsonFormat, Output, RenderOptions, RenderState,
    RenderedOutput, Renderer, RendererRegistry,
};
pub use transform::{
    ByteTransformer, DataTransformer, NormalizePreset, TransformPipeline, TransformerAdapter,
};

use render::{CsvEncoder, JsonEncoder, MarkdownEncoder, TextEncoder};

/// Render a document to Markdown with default options.
///
/// # Example
///
/// ```
/// use docform::Document;
///
/// let builder = Document::builder();
/// builder.text("hello");
/// assert_eq!(docform::to_markdown(&builder.build()).unwrap(), "hello\n");
/// ```
pub fn to_markdown(doc: &Document) -> Result<String> {
    to_markdown_with_options(doc, &RenderOptions::default())
}

/// Render a document to Markdown with custom options.
///
/// # Example
///
/// ```
/// use docform::{Document, RenderOptions};
///
/// let builder = Document::builder();
/// builder.set_metadata("title", "Report").text("body");
/// let options = RenderOptions::new().with_frontmatter(true);
/// let markdown = docform::to_markdown_with_options(&builder.build(), &options).unwrap();
/// assert!(markdown.starts_with("---\n"));
/// ```
pub fn to_markdown_with_options(doc: &Document, options: &RenderOptions) -> Result<String> {
    render_string(MarkdownEncoder::new(options.clone()), doc)
}

/// Render a document to plain text.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    render_string(TextEncoder::new(options.clone()), doc)
}

/// Render a document to JSON.
///
/// # Example
///
/// ```
/// use docform::{Document, JsonFormat};
///
/// let json = docform::to_json(&Document::default(), JsonFormat::Compact).unwrap();
/// assert_eq!(json, r#"{"metadata":{},"contents":[]}"#);
/// ```
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let options = RenderOptions::new().with_json_format(format);
    render_string(JsonEncoder::new(options), doc)
}

/// Render the tables of a document to CSV.
pub fn to_csv(doc: &Document, options: &RenderOptions) -> Result<String> {
    render_string(CsvEncoder::new(options.clone()), doc)
}

fn render_string<E: ContentEncoder>(encoder: E, doc: &Document) -> Result<String> {
    let format = encoder.format().to_string();
    let bytes = DocumentRenderer::new(encoder).render(&Cancellation::never(), doc)?;
    String::from_utf8(bytes).map_err(|e| Error::render(format, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text() {
        let builder = Document::builder();
        builder.header("Title").text("body");
        let text = to_text(&builder.build(), &RenderOptions::default()).unwrap();
        assert_eq!(text, "Title\n=====\n\nbody\n");
    }

    #[test]
    fn test_to_csv_ignores_text() {
        let builder = Document::builder();
        builder.text("intro").table(
            None,
            ["a"],
            vec![model::record([("a", serde_json::json!(1))])],
        );
        let csv = to_csv(&builder.build(), &RenderOptions::default()).unwrap();
        assert_eq!(csv, "a\n1\n");
    }
}
