//! Priority-ordered transformer registry and executor.

use std::sync::{PoisonError, RwLock};

use super::{ByteTransformer, DataTransformer, TransformerAdapter};
use crate::cancel::Cancellation;
use crate::error::{Error, Result};
use crate::model::Content;

#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    adapter: TransformerAdapter,
}

#[derive(Debug, Default)]
struct Registry {
    entries: Vec<Entry>,
    next_seq: u64,
}

/// An ordered set of transformers, keyed by name.
///
/// Entries are kept sorted by `(priority ascending, registration order)`.
/// Registering a name that already exists replaces the old entry; the
/// replacement counts as a new registration for tie-breaking.
///
/// The registry can be changed while renders are running: every
/// `transform_*` call works on a snapshot taken when it starts.
#[derive(Debug, Default)]
pub struct TransformPipeline {
    registry: RwLock<Registry>,
}

impl TransformPipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transformer and return the pipeline for chaining.
    pub fn with_transformer(self, adapter: impl Into<TransformerAdapter>) -> Self {
        self.add(adapter);
        self
    }

    /// Register a transformer, replacing any transformer with the same name.
    pub fn add(&self, adapter: impl Into<TransformerAdapter>) -> &Self {
        let adapter = adapter.into();
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(pos) = registry
            .entries
            .iter()
            .position(|e| e.adapter.name() == adapter.name())
        {
            log::warn!("replacing transformer '{}'", adapter.name());
            registry.entries.remove(pos);
        }

        let seq = registry.next_seq;
        registry.next_seq += 1;
        log::debug!(
            "registering transformer '{}' (priority {}, seq {})",
            adapter.name(),
            adapter.priority(),
            seq
        );
        registry.entries.push(Entry { seq, adapter });
        registry
            .entries
            .sort_by_key(|e| (e.adapter.priority(), e.seq));
        self
    }

    /// Register a data transformer.
    pub fn add_data<T: DataTransformer + 'static>(&self, transformer: T) -> &Self {
        self.add(TransformerAdapter::data(transformer))
    }

    /// Register a byte transformer.
    pub fn add_byte<T: ByteTransformer + 'static>(&self, transformer: T) -> &Self {
        self.add(TransformerAdapter::byte(transformer))
    }

    /// Remove a transformer by name. Returns whether one was removed.
    pub fn remove(&self, name: &str) -> bool {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        let before = registry.entries.len();
        registry.entries.retain(|e| e.adapter.name() != name);
        registry.entries.len() != before
    }

    /// Remove every transformer.
    pub fn clear(&self) {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.entries.clear();
    }

    /// Look up a transformer by name.
    pub fn get(&self, name: &str) -> Option<TransformerAdapter> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry
            .entries
            .iter()
            .find(|e| e.adapter.name() == name)
            .map(|e| e.adapter.clone())
    }

    /// Check whether a transformer is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of registered transformers.
    pub fn len(&self) -> usize {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.entries.len()
    }

    /// Check if no transformer is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Transformer names in execution order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    /// Copy of the adapters in execution order.
    pub fn snapshot(&self) -> Vec<TransformerAdapter> {
        let registry = self.registry.read().unwrap_or_else(PoisonError::into_inner);
        registry.entries.iter().map(|e| e.adapter.clone()).collect()
    }

    /// Check whether any byte transformer would run for `format`.
    pub fn has_byte_transformers(&self, format: &str) -> bool {
        self.snapshot().iter().any(|a| a.applies_to_bytes(format))
    }

    /// Run every applicable data transformer over `content`, in order.
    ///
    /// Cancellation is checked before each transformer. The first error
    /// aborts the remaining transformers and is returned wrapped in
    /// [`Error::TransformFailed`].
    pub fn transform_content(
        &self,
        cancel: &Cancellation,
        content: Content,
        format: &str,
    ) -> Result<Content> {
        let mut current = content;
        for adapter in self.snapshot() {
            let Some(transformer) = adapter.as_data_transformer() else {
                continue;
            };
            if !transformer.can_transform(&current, format) {
                continue;
            }

            cancel.check()?;

            log::debug!(
                "data transformer '{}' on {} {} ({})",
                transformer.name(),
                current.kind(),
                current.id(),
                format
            );
            let target = format!("{} content {}", current.kind(), current.id());
            current = transformer
                .transform(current, format)
                .map_err(|source| Error::TransformFailed {
                    transformer: transformer.name().to_string(),
                    format: format.to_string(),
                    target,
                    source: Box::new(source),
                })?;
        }
        Ok(current)
    }

    /// Run every applicable byte transformer over `bytes`, in order.
    ///
    /// Same ordering, cancellation and error rules as
    /// [`TransformPipeline::transform_content`].
    pub fn transform_bytes(
        &self,
        cancel: &Cancellation,
        bytes: Vec<u8>,
        format: &str,
    ) -> Result<Vec<u8>> {
        let mut current = bytes;
        for adapter in self.snapshot() {
            let Some(transformer) = adapter.as_byte_transformer() else {
                continue;
            };
            if !transformer.can_transform(format) {
                continue;
            }

            cancel.check()?;

            log::debug!(
                "byte transformer '{}' on {} bytes ({})",
                transformer.name(),
                current.len(),
                format
            );
            let target = format!("{} bytes", current.len());
            current = transformer
                .transform(current, format)
                .map_err(|source| Error::TransformFailed {
                    transformer: transformer.name().to_string(),
                    format: format.to_string(),
                    target,
                    source: Box::new(source),
                })?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextContent;
    use crate::transform::{FnByteTransformer, FnDataTransformer};
    use std::sync::{Arc, Mutex};

    fn recording(
        name: &'static str,
        priority: i32,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> FnByteTransformer {
        let log = Arc::clone(log);
        FnByteTransformer::new(name, move |bytes, _| {
            log.lock().unwrap().push(name);
            Ok(bytes)
        })
        .with_priority(priority)
    }

    #[test]
    fn test_priority_then_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = TransformPipeline::new();
        pipeline
            .add(recording("late", 50, &log))
            .add(recording("tie-a", 10, &log))
            .add(recording("early", 1, &log))
            .add(recording("tie-b", 10, &log));

        assert_eq!(pipeline.names(), vec!["early", "tie-a", "tie-b", "late"]);

        pipeline
            .transform_bytes(&Cancellation::never(), vec![], "text")
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["early", "tie-a", "tie-b", "late"]);
    }

    #[test]
    fn test_duplicate_name_replaces() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = TransformPipeline::new();
        pipeline
            .add(recording("a", 10, &log))
            .add(recording("b", 10, &log))
            .add(recording("a", 10, &log));

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.names(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_and_clear() {
        let pipeline = TransformPipeline::new()
            .with_transformer(FnByteTransformer::new("x", |b, _| Ok(b)))
            .with_transformer(FnByteTransformer::new("y", |b, _| Ok(b)));

        assert!(pipeline.remove("x"));
        assert!(!pipeline.remove("x"));
        assert!(pipeline.contains("y"));
        pipeline.clear();
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_byte_failure_names_transformer_and_stops() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = TransformPipeline::new();
        pipeline
            .add(recording("a", 1, &log))
            .add(FnByteTransformer::new("b", |_, _| Err(Error::Other("nope".into()))).with_priority(2))
            .add(recording("c", 3, &log));

        let err = pipeline
            .transform_bytes(&Cancellation::never(), b"abc".to_vec(), "text")
            .unwrap_err();
        match err {
            Error::TransformFailed {
                transformer,
                format,
                target,
                ..
            } => {
                assert_eq!(transformer, "b");
                assert_eq!(format, "text");
                assert_eq!(target, "3 bytes");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn test_cancelled_before_first_transformer() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let pipeline = TransformPipeline::new();
        pipeline.add(recording("a", 1, &log));

        let cancel = Cancellation::new();
        cancel.cancel();
        let err = pipeline
            .transform_bytes(&cancel, vec![], "text")
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_content_stage_skips_other_formats_and_kinds() {
        let pipeline = TransformPipeline::new();
        pipeline
            .add(
                FnDataTransformer::new("json-only", |_, _| Err(Error::Other("ran".into())))
                    .with_formats(["json"]),
            )
            .add(FnByteTransformer::new("bytes", |_, _| Err(Error::Other("ran".into()))));

        let content = Content::from(TextContent::new("x"));
        let out = pipeline
            .transform_content(&Cancellation::never(), content, "html")
            .unwrap();
        assert_eq!(out.plain_text(), "x");
    }

    #[test]
    fn test_content_stage_chains_results() {
        let pipeline = TransformPipeline::new();
        pipeline
            .add(
                FnDataTransformer::new("second", |c, _| match c {
                    Content::Text(t) => Ok(t.with_text(format!("{}!", t.text())).into()),
                    other => Ok(other),
                })
                .with_priority(20),
            )
            .add(
                FnDataTransformer::new("first", |c, _| match c {
                    Content::Text(t) => Ok(t.with_text(t.text().to_uppercase()).into()),
                    other => Ok(other),
                })
                .with_priority(10),
            );

        let out = pipeline
            .transform_content(
                &Cancellation::never(),
                TextContent::new("hi").into(),
                "text",
            )
            .unwrap();
        assert_eq!(out.plain_text(), "HI!");
    }
}
