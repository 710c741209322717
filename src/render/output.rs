//! Rendering one document to several formats at once.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;

use super::{RenderOptions, Renderer, RendererRegistry};
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::transform::TransformPipeline;

/// Encoded output for one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput {
    /// Format the bytes were rendered in
    pub format: String,

    /// Preferred file extension, without the dot
    pub extension: String,

    /// The rendered bytes
    pub bytes: Vec<u8>,
}

impl RenderedOutput {
    /// Output as UTF-8, if it is valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Output size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the output is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `dir/stem.<extension>`.
    pub fn file_path(&self, dir: &Path, stem: &str) -> PathBuf {
        dir.join(format!("{}.{}", stem, self.extension))
    }
}

/// Renders a document to every configured format.
///
/// Formats render in parallel; they share the document and the pipeline,
/// which are both safe for concurrent use. The first failing format fails
/// the whole call and no outputs are returned.
///
/// ```
/// use docform::render::{Output, RenderOptions};
/// use docform::Document;
///
/// let builder = Document::builder();
/// builder.text("hello");
/// let doc = builder.build();
///
/// let outputs = Output::with_defaults(RenderOptions::default(), None)
///     .formats(["markdown", "text"])
///     .render(&doc)
///     .unwrap();
/// assert_eq!(outputs.len(), 2);
/// assert_eq!(outputs[0].as_str(), Some("hello\n"));
/// ```
pub struct Output {
    registry: RendererRegistry,
    formats: Vec<String>,
    cancel: Cancellation,
}

impl Output {
    /// Create an output over an explicit registry.
    pub fn new(registry: RendererRegistry) -> Self {
        Self {
            registry,
            formats: Vec::new(),
            cancel: Cancellation::never(),
        }
    }

    /// Create an output over the built-in formats.
    pub fn with_defaults(options: RenderOptions, pipeline: Option<Arc<TransformPipeline>>) -> Self {
        Self::new(RendererRegistry::with_defaults(&options, pipeline))
    }

    /// Add a format to render.
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.formats.push(format.into());
        self
    }

    /// Add several formats to render.
    pub fn formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats.extend(formats.into_iter().map(Into::into));
        self
    }

    /// Use a cancellation signal for every render.
    pub fn with_cancellation(mut self, cancel: Cancellation) -> Self {
        self.cancel = cancel;
        self
    }

    /// The underlying registry.
    pub fn registry(&self) -> &RendererRegistry {
        &self.registry
    }

    /// Render `doc` to every configured format, in configuration order.
    ///
    /// Unknown formats are reported before anything is rendered.
    pub fn render(&self, doc: &Document) -> Result<Vec<RenderedOutput>> {
        let renderers = self
            .formats
            .iter()
            .map(|f| self.registry.resolve(f))
            .collect::<Result<Vec<_>>>()?;

        if renderers.is_empty() {
            return Err(Error::Other("no output format configured".into()));
        }

        renderers
            .par_iter()
            .map(|renderer| render_one(renderer.as_ref(), &self.cancel, doc))
            .collect()
    }

    /// Render `doc` to a single format.
    pub fn render_format(&self, format: &str, doc: &Document) -> Result<RenderedOutput> {
        let renderer = self.registry.resolve(format)?;
        render_one(renderer.as_ref(), &self.cancel, doc)
    }
}

fn render_one(
    renderer: &dyn Renderer,
    cancel: &Cancellation,
    doc: &Document,
) -> Result<RenderedOutput> {
    let bytes = renderer.render(cancel, doc)?;
    let extension = renderer
        .file_extensions()
        .first()
        .map_or_else(|| renderer.format().to_string(), |e| e.to_string());
    Ok(RenderedOutput {
        format: renderer.format().to_string(),
        extension,
        bytes,
    })
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("registry", &self.registry)
            .field("formats", &self.formats)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}
