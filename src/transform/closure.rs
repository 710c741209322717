//! Transformers built from closures.

use std::fmt;
use std::sync::Arc;

use super::{format_list, format_matches, ByteTransformer, DataTransformer, DEFAULT_PRIORITY};
use crate::error::Result;
use crate::model::{Content, Record};
use crate::operation::Predicate;

type DataFn = Arc<dyn Fn(Content, &str) -> Result<Content> + Send + Sync>;
type ByteFn = Arc<dyn Fn(Vec<u8>, &str) -> Result<Vec<u8>> + Send + Sync>;

/// Per-record rewrite used by [`RecordFilterTransformer`].
pub type RecordMapper = Arc<dyn Fn(Record) -> Record + Send + Sync>;

/// A [`DataTransformer`] backed by a closure.
#[derive(Clone)]
pub struct FnDataTransformer {
    name: String,
    priority: i32,
    formats: Vec<String>,
    func: DataFn,
}

impl FnDataTransformer {
    /// Create a transformer that applies to every format at the default priority.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Content, &str) -> Result<Content> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            formats: Vec::new(),
            func: Arc::new(func),
        }
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the transformer to the given formats.
    pub fn with_formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats = format_list(formats);
        self
    }
}

impl DataTransformer for FnDataTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn transform(&self, content: Content, format: &str) -> Result<Content> {
        (self.func)(content, format)
    }
}

impl fmt::Debug for FnDataTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnDataTransformer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("formats", &self.formats)
            .finish_non_exhaustive()
    }
}

/// A [`ByteTransformer`] backed by a closure.
#[derive(Clone)]
pub struct FnByteTransformer {
    name: String,
    priority: i32,
    formats: Vec<String>,
    func: ByteFn,
}

impl FnByteTransformer {
    /// Create a transformer that applies to every format at the default priority.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Vec<u8>, &str) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            formats: Vec::new(),
            func: Arc::new(func),
        }
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the transformer to the given formats.
    pub fn with_formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats = format_list(formats);
        self
    }
}

impl ByteTransformer for FnByteTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn transform(&self, input: Vec<u8>, format: &str) -> Result<Vec<u8>> {
        (self.func)(input, format)
    }
}

impl fmt::Debug for FnByteTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnByteTransformer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("formats", &self.formats)
            .finish_non_exhaustive()
    }
}

/// Keeps only the table records matching a predicate, optionally rewriting
/// the survivors.
///
/// Applies to tables and to sections holding tables; every other content
/// kind is skipped. Ids, schemas and pending operations are preserved.
///
/// ```
/// use docform::model::{record, Content, TableContent};
/// use docform::transform::{DataTransformer, RecordFilterTransformer};
/// use serde_json::json;
///
/// let filter = RecordFilterTransformer::new("active-only", |r| r["active"] == json!(true))
///     .with_formats(["html"]);
///
/// let table = TableContent::from_keys(
///     ["name", "active"],
///     vec![
///         record([("name", json!("Alice")), ("active", json!(true))]),
///         record([("name", json!("Bob")), ("active", json!(false))]),
///     ],
/// )
/// .unwrap();
///
/// let content = Content::from(table);
/// assert!(filter.can_transform(&content, "html"));
/// assert!(!filter.can_transform(&content, "json"));
/// ```
#[derive(Clone)]
pub struct RecordFilterTransformer {
    name: String,
    priority: i32,
    formats: Vec<String>,
    predicate: Predicate,
    mapper: Option<RecordMapper>,
}

impl RecordFilterTransformer {
    /// Create a filter keeping the records for which `predicate` is true.
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            priority: DEFAULT_PRIORITY,
            formats: Vec::new(),
            predicate: Arc::new(predicate),
            mapper: None,
        }
    }

    /// Rewrite each kept record.
    pub fn with_mapper<F>(mut self, mapper: F) -> Self
    where
        F: Fn(Record) -> Record + Send + Sync + 'static,
    {
        self.mapper = Some(Arc::new(mapper));
        self
    }

    /// Set the priority (lower runs earlier).
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Restrict the transformer to the given formats.
    pub fn with_formats<S: Into<String>>(mut self, formats: impl IntoIterator<Item = S>) -> Self {
        self.formats = format_list(formats);
        self
    }
}

impl DataTransformer for RecordFilterTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn formats(&self) -> &[String] {
        &self.formats
    }

    fn can_transform(&self, content: &Content, format: &str) -> bool {
        content.is_transformable() && format_matches(&self.formats, format)
    }

    fn transform(&self, content: Content, _format: &str) -> Result<Content> {
        content.map_tables(&mut |table| {
            let records = table
                .records()
                .iter()
                .filter(|r| (self.predicate)(*r))
                .cloned()
                .map(|r| match &self.mapper {
                    Some(map) => map(r),
                    None => r,
                })
                .collect();
            table.with_records(records)
        })
    }
}

impl fmt::Debug for RecordFilterTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordFilterTransformer")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("formats", &self.formats)
            .field("mapper", &self.mapper.is_some())
            .finish_non_exhaustive()
    }
}
