//! Sections: content grouped under a title.

use super::content::{new_id, Content};

/// A titled group of nested content.
#[derive(Debug, Clone)]
pub struct SectionContent {
    id: String,
    title: String,
    level: u8,
    contents: Vec<Content>,
}

impl SectionContent {
    /// Create a section at `level` (1 = top level).
    pub fn new(title: impl Into<String>, level: u8, contents: Vec<Content>) -> Self {
        Self {
            id: new_id("section"),
            title: title.into(),
            level: level.max(1),
            contents,
        }
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Section title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Nesting level, starting at 1.
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Child content in order.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    pub(crate) fn with_contents(&self, contents: Vec<Content>) -> Self {
        Self {
            id: self.id.clone(),
            title: self.title.clone(),
            level: self.level,
            contents,
        }
    }
}

/// A section whose body can be folded away by formats that support it.
#[derive(Debug, Clone)]
pub struct CollapsibleSection {
    id: String,
    summary: String,
    contents: Vec<Content>,
    expanded: bool,
}

impl CollapsibleSection {
    /// Create a collapsed section.
    pub fn new(summary: impl Into<String>, contents: Vec<Content>) -> Self {
        Self {
            id: new_id("collapsible"),
            summary: summary.into(),
            contents,
            expanded: false,
        }
    }

    /// Start expanded.
    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Summary line shown when collapsed.
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Child content in order.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Whether the section starts expanded.
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub(crate) fn with_contents(&self, contents: Vec<Content>) -> Self {
        Self {
            id: self.id.clone(),
            summary: self.summary.clone(),
            contents,
            expanded: self.expanded,
        }
    }
}
