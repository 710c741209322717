//! Shared document-walking logic.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use super::{ContentEncoder, Renderer};
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::model::{Content, Document};
use crate::transform::TransformPipeline;

/// Lifecycle of one render call.
///
/// `Idle -> Running -> {Completed, Failed, Cancelled}`; terminal states are
/// final, a new call starts from `Idle` again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Not started
    Idle,
    /// Walking the document
    Running,
    /// Output produced
    Completed,
    /// Aborted by an error
    Failed,
    /// Aborted by the cancellation signal
    Cancelled,
}

impl RenderState {
    /// Terminal state for the outcome of a render call.
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => RenderState::Completed,
            Err(Error::Cancelled) => RenderState::Cancelled,
            Err(_) => RenderState::Failed,
        }
    }

    /// Check if the state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RenderState::Completed | RenderState::Failed | RenderState::Cancelled
        )
    }
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderState::Idle => "idle",
            RenderState::Running => "running",
            RenderState::Completed => "completed",
            RenderState::Failed => "failed",
            RenderState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// A [`Renderer`] built from a [`ContentEncoder`] and an optional
/// [`TransformPipeline`].
///
/// For every content item, in document order: check cancellation, run the
/// table operations, run the data transformers for this format. Once every
/// item is prepared, each is encoded in turn. Non-empty fragments are joined with the encoder's separator, wrapped in
/// its prefix and suffix, and the result goes through the byte transformers.
///
/// The source document is never modified; operations and transformers work
/// on copies.
pub struct DocumentRenderer<E> {
    encoder: E,
    pipeline: Option<Arc<TransformPipeline>>,
}

impl<E: ContentEncoder> DocumentRenderer<E> {
    /// Create a renderer without transformers.
    pub fn new(encoder: E) -> Self {
        Self {
            encoder,
            pipeline: None,
        }
    }

    /// Attach a transformer pipeline. The pipeline may be shared between
    /// renderers and changed while they run.
    pub fn with_pipeline(mut self, pipeline: Arc<TransformPipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// The wrapped encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The attached pipeline, if any.
    pub fn pipeline(&self) -> Option<&Arc<TransformPipeline>> {
        self.pipeline.as_ref()
    }

    fn prepare(&self, cancel: &Cancellation, content: &Content) -> Result<Content> {
        let prepared = content.apply_operations()?;
        match &self.pipeline {
            Some(pipeline) => pipeline.transform_content(cancel, prepared, self.encoder.format()),
            None => Ok(prepared),
        }
    }

    /// Prepare every item, then encode and emit them in order.
    ///
    /// Operations and data transformers run for the whole document before
    /// the first byte is emitted, so a failure or cancellation during
    /// preparation never leaves partial output in a streaming sink.
    fn walk<F>(&self, cancel: &Cancellation, doc: &Document, mut emit: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        cancel.check()?;

        let mut prepared = Vec::with_capacity(doc.len());
        for (index, content) in doc.iter().enumerate() {
            cancel.check()?;
            log::trace!(
                "{}: item {} ({} {})",
                self.encoder.format(),
                index,
                content.kind(),
                content.id()
            );
            prepared.push(self.prepare(cancel, content)?);
        }

        let prefix = self.encoder.prefix(doc)?;
        if !prefix.is_empty() {
            emit(&prefix)?;
        }

        let mut emitted = 0usize;
        for content in &prepared {
            let fragment = self.encoder.encode(content)?;
            if fragment.is_empty() {
                continue;
            }
            if emitted > 0 {
                emit(self.encoder.separator())?;
            }
            emit(&fragment)?;
            emitted += 1;
        }

        let suffix = self.encoder.suffix(doc)?;
        if !suffix.is_empty() {
            emit(&suffix)?;
        }
        Ok(())
    }

    fn render_buffered(&self, cancel: &Cancellation, doc: &Document) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.walk(cancel, doc, |bytes| {
            buffer.extend_from_slice(bytes);
            Ok(())
        })?;
        match &self.pipeline {
            Some(pipeline) => pipeline.transform_bytes(cancel, buffer, self.encoder.format()),
            None => Ok(buffer),
        }
    }

    fn needs_buffering(&self) -> bool {
        !self.encoder.supports_streaming()
            || self
                .pipeline
                .as_ref()
                .is_some_and(|p| p.has_byte_transformers(self.encoder.format()))
    }

    fn finish<T>(&self, result: Result<T>) -> Result<T> {
        let state = RenderState::of(&result);
        match &result {
            Err(err) if state == RenderState::Failed => {
                log::debug!("{} render {}: {}", self.encoder.format(), state, err)
            }
            _ => log::debug!("{} render {}", self.encoder.format(), state),
        }
        result
    }
}

impl<E: ContentEncoder> Renderer for DocumentRenderer<E> {
    fn format(&self) -> &str {
        self.encoder.format()
    }

    fn file_extensions(&self) -> &[&str] {
        self.encoder.file_extensions()
    }

    fn render(&self, cancel: &Cancellation, doc: &Document) -> Result<Vec<u8>> {
        log::debug!(
            "{} render {} ({} items)",
            self.encoder.format(),
            RenderState::Running,
            doc.len()
        );
        let result = self.render_buffered(cancel, doc);
        self.finish(result)
    }

    fn render_to(
        &self,
        cancel: &Cancellation,
        doc: &Document,
        sink: &mut dyn Write,
    ) -> Result<()> {
        log::debug!(
            "{} render_to {} ({} items)",
            self.encoder.format(),
            RenderState::Running,
            doc.len()
        );
        let written = if self.needs_buffering() {
            self.render_buffered(cancel, doc)
                .and_then(|bytes| sink.write_all(&bytes).map_err(Error::from))
        } else {
            self.walk(cancel, doc, |bytes| sink.write_all(bytes).map_err(Error::from))
        };
        let result = written.and_then(|()| sink.flush().map_err(Error::from));
        self.finish(result)
    }

    fn supports_streaming(&self) -> bool {
        self.encoder.supports_streaming()
    }
}

impl<E: ContentEncoder + fmt::Debug> fmt::Debug for DocumentRenderer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentRenderer")
            .field("encoder", &self.encoder)
            .field("pipeline", &self.pipeline.as_ref().map(|p| p.names()))
            .finish()
    }
}
