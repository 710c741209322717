//! Rendering module for encoding documents into output formats.
//!
//! A [`Renderer`] turns a [`Document`] into bytes for one format. The
//! built-in renderers are [`DocumentRenderer`]s: the shared walking logic
//! (operations, data transformers, separators, cancellation, byte
//! transformers) wrapped around a format-specific [`ContentEncoder`].
//!
//! # Example
//!
//! ```
//! use docform::render::{DocumentRenderer, MarkdownEncoder, RenderOptions, Renderer};
//! use docform::{Cancellation, Document};
//!
//! let builder = Document::builder();
//! builder.header("Status").text("All systems nominal");
//! let doc = builder.build();
//!
//! let renderer = DocumentRenderer::new(MarkdownEncoder::new(RenderOptions::default()));
//! let bytes = renderer.render(&Cancellation::never(), &doc).unwrap();
//! assert_eq!(String::from_utf8(bytes).unwrap(), "# Status\n\nAll systems nominal\n");
//! ```

mod csv;
mod json;
mod markdown;
mod options;
mod output;
mod registry;
mod renderer;
mod text;

pub use csv::CsvEncoder;
pub use json::{content_to_json, JsonEncoder};
pub use markdown::{escape_markdown, MarkdownEncoder};
pub use options::{JsonFormat, RenderOptions};
pub use output::{Output, RenderedOutput};
pub use registry::RendererRegistry;
pub use renderer::{DocumentRenderer, RenderState};
pub use text::TextEncoder;

use std::io::Write;

use crate::cancel::Cancellation;
use crate::error::Result;
use crate::model::{Content, Document};

/// A per-format document renderer.
///
/// `render` and `render_to` produce byte-identical output for the same
/// document, pipeline and format.
pub trait Renderer: Send + Sync {
    /// Format identifier (e.g. "markdown").
    fn format(&self) -> &str;

    /// File extensions for this format, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Render the whole document into memory.
    fn render(&self, cancel: &Cancellation, doc: &Document) -> Result<Vec<u8>>;

    /// Render the document into `sink`.
    fn render_to(&self, cancel: &Cancellation, doc: &Document, sink: &mut dyn Write)
        -> Result<()>;

    /// Whether `render_to` writes fragments as they are produced.
    fn supports_streaming(&self) -> bool;
}

/// Format-specific encoding of single content items.
///
/// Implementors only produce fragments; ordering, separators, cancellation
/// and transformers are handled by [`DocumentRenderer`].
pub trait ContentEncoder: Send + Sync {
    /// Format identifier.
    fn format(&self) -> &str;

    /// File extensions for this format, without the leading dot.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    /// Encode one (already transformed) content item. An empty fragment
    /// means the item has no representation in this format.
    fn encode(&self, content: &Content) -> Result<Vec<u8>>;

    /// Bytes placed between two non-empty fragments.
    fn separator(&self) -> &[u8] {
        b"\n\n"
    }

    /// Bytes emitted before the first fragment.
    fn prefix(&self, doc: &Document) -> Result<Vec<u8>> {
        let _ = doc;
        Ok(Vec::new())
    }

    /// Bytes emitted after the last fragment.
    fn suffix(&self, doc: &Document) -> Result<Vec<u8>> {
        let _ = doc;
        Ok(Vec::new())
    }

    /// Whether fragments may be written to a sink as soon as they exist.
    fn supports_streaming(&self) -> bool {
        true
    }
}
