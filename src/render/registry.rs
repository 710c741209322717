//! Explicitly constructed set of renderers.
//!
//! There is no process-wide registry: callers build the set of formats they
//! need and pass it where it is used.
//!
//! # Example
//!
//! ```
//! use docform::render::{RenderOptions, RendererRegistry};
//!
//! let registry = RendererRegistry::with_defaults(&RenderOptions::default(), None);
//! assert!(registry.supports("Markdown"));
//! assert_eq!(registry.get_by_extension("md").unwrap().format(), "markdown");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use super::{
    ContentEncoder, CsvEncoder, DocumentRenderer, JsonEncoder, MarkdownEncoder, RenderOptions,
    Renderer, TextEncoder,
};
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::model::Document;
use crate::transform::TransformPipeline;

/// Renderers keyed by format name and by file extension.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn Renderer>>,
    by_extension: HashMap<String, Arc<dyn Renderer>>,
}

impl RendererRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in formats (markdown, text, json, csv),
    /// all sharing `pipeline` when given.
    pub fn with_defaults(options: &RenderOptions, pipeline: Option<Arc<TransformPipeline>>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(attach(
            DocumentRenderer::new(MarkdownEncoder::new(options.clone())),
            &pipeline,
        )));
        registry.register(Arc::new(attach(
            DocumentRenderer::new(TextEncoder::new(options.clone())),
            &pipeline,
        )));
        registry.register(Arc::new(attach(
            DocumentRenderer::new(JsonEncoder::new(options.clone())),
            &pipeline,
        )));
        registry.register(Arc::new(attach(
            DocumentRenderer::new(CsvEncoder::new(options.clone())),
            &pipeline,
        )));
        registry
    }

    /// Register a renderer under its format name and all its extensions,
    /// replacing any previous renderer for them.
    pub fn register(&mut self, renderer: Arc<dyn Renderer>) {
        for ext in renderer.file_extensions() {
            self.by_extension
                .insert(ext.to_lowercase(), renderer.clone());
        }
        log::debug!("registered renderer '{}'", renderer.format());
        self.renderers
            .insert(renderer.format().to_lowercase(), renderer);
    }

    /// Get a renderer by format name.
    pub fn get(&self, format: &str) -> Option<Arc<dyn Renderer>> {
        self.renderers.get(&format.to_lowercase()).cloned()
    }

    /// Get a renderer by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn Renderer>> {
        let ext = ext.trim_start_matches('.');
        self.by_extension.get(&ext.to_lowercase()).cloned()
    }

    /// Get a renderer by format name or file extension.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Renderer>> {
        self.get(name)
            .or_else(|| self.get_by_extension(name))
            .ok_or_else(|| Error::UnknownFormat(name.to_string()))
    }

    /// Check if a format is registered.
    pub fn supports(&self, format: &str) -> bool {
        self.renderers.contains_key(&format.to_lowercase())
    }

    /// Registered format names, sorted.
    pub fn formats(&self) -> Vec<&str> {
        let mut formats: Vec<&str> = self.renderers.keys().map(|s| s.as_str()).collect();
        formats.sort_unstable();
        formats
    }

    /// Number of registered formats.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Check if no format is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render `doc` with the renderer registered for `format`.
    pub fn render(&self, format: &str, cancel: &Cancellation, doc: &Document) -> Result<Vec<u8>> {
        self.resolve(format)?.render(cancel, doc)
    }

    /// Render `doc` into `sink` with the renderer registered for `format`.
    pub fn render_to(
        &self,
        format: &str,
        cancel: &Cancellation,
        doc: &Document,
        sink: &mut dyn Write,
    ) -> Result<()> {
        self.resolve(format)?.render_to(cancel, doc, sink)
    }
}

fn attach<E: ContentEncoder>(
    renderer: DocumentRenderer<E>,
    pipeline: &Option<Arc<TransformPipeline>>,
) -> DocumentRenderer<E> {
    match pipeline {
        Some(pipeline) => renderer.with_pipeline(Arc::clone(pipeline)),
        None => renderer,
    }
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererRegistry")
            .field("formats", &self.formats())
            .finish()
    }
}
