//! Document-level types.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::{Content, Record, SectionContent, TableContent, TextContent};
use crate::error::{Error, Result};

/// Document metadata: arbitrary key/value pairs.
pub type Metadata = BTreeMap<String, Value>;

/// An ordered collection of content plus metadata.
///
/// A document is produced once by a [`DocumentBuilder`] and is read-only
/// afterwards. The owned-copy accessors ([`Document::contents`],
/// [`Document::metadata`]) return independent copies.
#[derive(Debug, Clone, Default)]
pub struct Document {
    contents: Vec<Content>,
    metadata: Metadata,
}

impl Document {
    /// Start building a document.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }

    /// Copy of the content sequence.
    pub fn contents(&self) -> Vec<Content> {
        self.contents.clone()
    }

    /// Copy of the metadata.
    pub fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }

    /// Iterate over the content in order without copying.
    pub fn iter(&self) -> std::slice::Iter<'_, Content> {
        self.contents.iter()
    }

    /// Look up a metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// Number of top-level content items.
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the document has no content.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Plain text of the whole document, items separated by blank lines.
    pub fn plain_text(&self) -> String {
        self.contents
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Metadata as YAML front matter (`---` delimited, keys sorted).
    pub fn to_yaml_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];
        for (key, value) in &self.metadata {
            let rendered = match value {
                Value::String(s) => format!("\"{}\"", escape_yaml(s)),
                Value::Null => "null".to_string(),
                other => other.to_string(),
            };
            lines.push(format!("{}: {}", key, rendered));
        }
        lines.push("---".to_string());
        lines.push(String::new());
        lines.join("\n")
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Content;
    type IntoIter = std::slice::Iter<'a, Content>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Escape special characters for YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

#[derive(Debug, Default)]
struct BuilderState {
    contents: Vec<Content>,
    metadata: Metadata,
    errors: Vec<Error>,
}

/// One-shot builder for a [`Document`].
///
/// The builder is cheap to clone; clones share state, so several threads can
/// add content before [`DocumentBuilder::build`] is called. `build` consumes
/// the accumulated state: afterwards every mutator is silently ignored (a
/// warning is logged) and a second `build` returns an empty document.
///
/// ```
/// use docform::model::{record, Document};
/// use serde_json::json;
///
/// let builder = Document::builder();
/// builder
///     .header("Report")
///     .table(Some("Users"), ["name"], vec![record([("name", json!("Alice"))])])
///     .set_metadata("author", json!("ops"));
/// let doc = builder.build();
/// assert_eq!(doc.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    state: Arc<RwLock<Option<BuilderState>>>,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(BuilderState::default()))),
        }
    }

    fn with_state<F: FnOnce(&mut BuilderState)>(&self, action: &str, f: F) -> &Self {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(state) => f(state),
            None => log::warn!("DocumentBuilder::{} called after build(); ignored", action),
        }
        self
    }

    /// Append a content item.
    pub fn add_content(&self, content: impl Into<Content>) -> &Self {
        let content = content.into();
        self.with_state("add_content", |state| state.contents.push(content))
    }

    /// Set a metadata value, replacing any previous value for `key`.
    pub fn set_metadata(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        let key = key.into();
        let value = value.into();
        self.with_state("set_metadata", |state| {
            state.metadata.insert(key, value);
        })
    }

    /// Append a text block.
    pub fn text(&self, text: impl Into<String>) -> &Self {
        self.add_content(TextContent::new(text))
    }

    /// Append a header line.
    pub fn header(&self, text: impl Into<String>) -> &Self {
        self.add_content(TextContent::header(text))
    }

    /// Append a table. An invalid table is not added; the error is kept and
    /// reported by [`DocumentBuilder::errors`].
    pub fn table<S: Into<String>>(
        &self,
        title: Option<&str>,
        keys: impl IntoIterator<Item = S>,
        records: Vec<Record>,
    ) -> &Self {
        match TableContent::from_keys(keys, records) {
            Ok(table) => {
                let table = match title {
                    Some(title) => table.with_title(title),
                    None => table,
                };
                self.add_content(table)
            }
            Err(err) => self.with_state("table", |state| state.errors.push(err)),
        }
    }

    /// Append a section whose children are built by `f` on a fresh builder.
    pub fn section<F>(&self, title: impl Into<String>, level: u8, f: F) -> &Self
    where
        F: FnOnce(&DocumentBuilder),
    {
        let child = DocumentBuilder::new();
        f(&child);
        let errors = child.take_errors();
        let contents = child.build().contents;
        self.with_state("section", |state| state.errors.extend(errors));
        self.add_content(SectionContent::new(title, level, contents))
    }

    /// Check whether any convenience method recorded an error.
    pub fn has_errors(&self) -> bool {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().is_some_and(|s| !s.errors.is_empty())
    }

    /// Messages of the recorded errors.
    pub fn errors(&self) -> Vec<String> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .map(|s| s.errors.iter().map(|e| e.to_string()).collect())
            .unwrap_or_default()
    }

    fn take_errors(&self) -> Vec<Error> {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_mut()
            .map(|s| std::mem::take(&mut s.errors))
            .unwrap_or_default()
    }

    /// Number of content items added so far.
    pub fn len(&self) -> usize {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().map_or(0, |s| s.contents.len())
    }

    /// Check if no content has been added (or the builder was consumed).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether `build` has already been called.
    pub fn is_built(&self) -> bool {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard.is_none()
    }

    /// Freeze the accumulated content into a [`Document`].
    pub fn build(&self) -> Document {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        match guard.take() {
            Some(state) => Document {
                contents: state.contents,
                metadata: state.metadata,
            },
            None => {
                log::warn!("DocumentBuilder::build called twice; returning an empty document");
                Document::default()
            }
        }
    }

    /// Like [`DocumentBuilder::build`], but fails with the first recorded error.
    pub fn try_build(&self) -> Result<Document> {
        let mut errors = self.take_errors();
        let doc = self.build();
        if errors.is_empty() {
            Ok(doc)
        } else {
            Err(errors.remove(0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record;
    use serde_json::json;

    #[test]
    fn test_builder_preserves_order() {
        let builder = DocumentBuilder::new();
        builder.text("one").text("two").header("three");
        let doc = builder.build();
        let texts: Vec<String> = doc.iter().map(|c| c.plain_text()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_mutation_after_build_is_ignored() {
        let builder = DocumentBuilder::new();
        builder.text("before");
        let doc = builder.build();
        assert!(builder.is_built());

        builder.text("after").set_metadata("k", "v");
        assert_eq!(doc.len(), 1);
        assert!(doc.metadata().is_empty());
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_accessors_return_copies() {
        let builder = DocumentBuilder::new();
        builder.text("a").set_metadata("title", "T");
        let doc = builder.build();

        let mut contents = doc.contents();
        contents.clear();
        let mut metadata = doc.metadata();
        metadata.insert("title".into(), json!("changed"));

        assert_eq!(doc.contents().len(), 1);
        assert_eq!(doc.metadata()["title"], json!("T"));
    }

    #[test]
    fn test_invalid_table_is_recorded() {
        let builder = DocumentBuilder::new();
        builder.table(None, ["a"], vec![record([("b", json!(1))])]);
        assert!(builder.has_errors());
        assert_eq!(builder.errors().len(), 1);
        assert!(builder.try_build().is_err());
    }

    #[test]
    fn test_section_builder() {
        let builder = DocumentBuilder::new();
        builder.section("Intro", 1, |s| {
            s.text("nested");
        });
        let doc = builder.build();
        match &doc.contents()[0] {
            Content::Section(s) => {
                assert_eq!(s.title(), "Intro");
                assert_eq!(s.contents().len(), 1);
            }
            other => panic!("expected section, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_frontmatter() {
        let builder = DocumentBuilder::new();
        builder
            .set_metadata("title", "Quarterly \"Report\"")
            .set_metadata("pages", 3);
        let yaml = builder.build().to_yaml_frontmatter();
        assert!(yaml.starts_with("---\n"));
        assert!(yaml.contains("pages: 3"));
        assert!(yaml.contains("title: \"Quarterly \\\"Report\\\"\""));
    }

    #[test]
    fn test_concurrent_builder_writes() {
        let builder = DocumentBuilder::new();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let b = builder.clone();
                scope.spawn(move || {
                    b.text(format!("item {}", i));
                });
            }
        });
        assert_eq!(builder.build().len(), 4);
    }
}
