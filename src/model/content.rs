//! The closed set of content variants.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    ChartContent, CollapsibleSection, DiagramContent, GraphContent, RawContent, SectionContent,
    TableContent, TextContent,
};
use crate::error::Result;

/// Generate a content identifier such as `table-1b4e28ba2fa1...`.
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Discriminant of a [`Content`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Tabular data
    Table,
    /// Free text
    Text,
    /// Titled section
    Section,
    /// Foldable section
    Collapsible,
    /// Chart
    Chart,
    /// Node/edge graph
    Graph,
    /// Pre-encoded bytes
    Raw,
    /// Diagram source
    Diagram,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::Table => "table",
            ContentKind::Text => "text",
            ContentKind::Section => "section",
            ContentKind::Collapsible => "collapsible",
            ContentKind::Chart => "chart",
            ContentKind::Graph => "graph",
            ContentKind::Raw => "raw",
            ContentKind::Diagram => "diagram",
        };
        f.write_str(name)
    }
}

/// One unit of document data.
#[derive(Debug, Clone)]
pub enum Content {
    /// Tabular data with a schema
    Table(TableContent),
    /// Free text
    Text(TextContent),
    /// Titled section with children
    Section(SectionContent),
    /// Foldable section with children
    Collapsible(CollapsibleSection),
    /// Chart
    Chart(ChartContent),
    /// Node/edge graph
    Graph(GraphContent),
    /// Pre-encoded bytes for one format
    Raw(RawContent),
    /// Diagram source
    Diagram(DiagramContent),
}

impl Content {
    /// Stable identifier of this content.
    pub fn id(&self) -> &str {
        match self {
            Content::Table(c) => c.id(),
            Content::Text(c) => c.id(),
            Content::Section(c) => c.id(),
            Content::Collapsible(c) => c.id(),
            Content::Chart(c) => c.id(),
            Content::Graph(c) => c.id(),
            Content::Raw(c) => c.id(),
            Content::Diagram(c) => c.id(),
        }
    }

    /// Variant discriminant.
    pub fn kind(&self) -> ContentKind {
        match self {
            Content::Table(_) => ContentKind::Table,
            Content::Text(_) => ContentKind::Text,
            Content::Section(_) => ContentKind::Section,
            Content::Collapsible(_) => ContentKind::Collapsible,
            Content::Chart(_) => ContentKind::Chart,
            Content::Graph(_) => ContentKind::Graph,
            Content::Raw(_) => ContentKind::Raw,
            Content::Diagram(_) => ContentKind::Diagram,
        }
    }

    /// Whether this content accepts structural transforms (tables, and
    /// sections that may contain tables).
    pub fn is_transformable(&self) -> bool {
        matches!(
            self,
            Content::Table(_) | Content::Section(_) | Content::Collapsible(_)
        )
    }

    /// Format-neutral byte representation of the content.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.plain_text().into_bytes()
    }

    /// Format-neutral text representation of the content.
    pub fn plain_text(&self) -> String {
        match self {
            Content::Table(t) => match t.title() {
                Some(title) => format!("{}\n{}", title, t.plain_text()),
                None => t.plain_text(),
            },
            Content::Text(t) => t.text().to_string(),
            Content::Section(s) => join_children(s.title(), s.contents()),
            Content::Collapsible(s) => join_children(s.summary(), s.contents()),
            Content::Chart(c) => format!("{}\n{}", c.title(), c.data()),
            Content::Graph(g) => {
                let mut lines = vec![g.title().to_string()];
                lines.extend(g.edges().iter().map(|e| format!("{} -> {}", e.from, e.to)));
                lines.join("\n")
            }
            Content::Raw(r) => String::from_utf8_lossy(r.data()).into_owned(),
            Content::Diagram(d) => format!("{}\n{}", d.title(), d.source()),
        }
    }

    /// Run every table's attached operations, recursing into sections.
    ///
    /// Returns a transformed copy; `self` is left untouched.
    pub fn apply_operations(&self) -> Result<Content> {
        self.map_tables(&mut |table| table.apply_operations())
    }

    /// Rebuild this content with `f` applied to every table it holds,
    /// recursing into sections. Non-table leaves are cloned unchanged.
    pub fn map_tables<F>(&self, f: &mut F) -> Result<Content>
    where
        F: FnMut(&TableContent) -> Result<TableContent>,
    {
        match self {
            Content::Table(t) => Ok(Content::Table(f(t)?)),
            Content::Section(s) => {
                let children = map_children(s.contents(), f)?;
                Ok(Content::Section(s.with_contents(children)))
            }
            Content::Collapsible(s) => {
                let children = map_children(s.contents(), f)?;
                Ok(Content::Collapsible(s.with_contents(children)))
            }
            other => Ok(other.clone()),
        }
    }

    /// Iterate over this content and all nested content, depth-first.
    pub fn walk(&self) -> Vec<&Content> {
        let mut out = vec![self];
        match self {
            Content::Section(s) => out.extend(s.contents().iter().flat_map(|c| c.walk())),
            Content::Collapsible(s) => out.extend(s.contents().iter().flat_map(|c| c.walk())),
            _ => {}
        }
        out
    }
}

fn map_children<F>(children: &[Content], f: &mut F) -> Result<Vec<Content>>
where
    F: FnMut(&TableContent) -> Result<TableContent>,
{
    children.iter().map(|c| c.map_tables(f)).collect()
}

fn join_children(title: &str, children: &[Content]) -> String {
    let mut parts = vec![title.to_string()];
    parts.extend(children.iter().map(|c| c.plain_text()));
    parts.join("\n")
}

macro_rules! impl_from_variant {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Content {
                fn from(content: $ty) -> Self {
                    Content::$variant(content)
                }
            }
        )*
    };
}

impl_from_variant! {
    Table => TableContent,
    Text => TextContent,
    Section => SectionContent,
    Collapsible => CollapsibleSection,
    Chart => ChartContent,
    Graph => GraphContent,
    Raw => RawContent,
    Diagram => DiagramContent,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record;
    use crate::operation::LimitOp;
    use serde_json::json;

    fn table() -> TableContent {
        TableContent::from_keys(
            ["n"],
            vec![record([("n", json!(1))]), record([("n", json!(2))])],
        )
        .unwrap()
        .with_operation(LimitOp::new(1))
    }

    #[test]
    fn test_ids_are_unique_and_prefixed() {
        let a = Content::from(TextContent::new("a"));
        let b = Content::from(TextContent::new("a"));
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("text-"));
    }

    #[test]
    fn test_kind_and_transformable() {
        let text = Content::from(TextContent::new("x"));
        assert_eq!(text.kind(), ContentKind::Text);
        assert!(!text.is_transformable());
        assert!(Content::from(table()).is_transformable());
        assert_eq!(ContentKind::Collapsible.to_string(), "collapsible");
    }

    #[test]
    fn test_operations_apply_inside_sections() {
        let section = Content::from(SectionContent::new(
            "Numbers",
            1,
            vec![Content::from(table())],
        ));

        let applied = section.apply_operations().unwrap();
        match &applied {
            Content::Section(s) => match &s.contents()[0] {
                Content::Table(t) => assert_eq!(t.row_count(), 1),
                other => panic!("expected table, got {:?}", other.kind()),
            },
            other => panic!("expected section, got {:?}", other.kind()),
        }
        assert_eq!(applied.id(), section.id());

        // Source still holds both rows.
        if let Content::Section(s) = &section {
            if let Content::Table(t) = &s.contents()[0] {
                assert_eq!(t.row_count(), 2);
            }
        }
    }

    #[test]
    fn test_to_bytes() {
        let content = Content::from(TextContent::new("hello"));
        assert_eq!(content.to_bytes(), b"hello".to_vec());
    }

    #[test]
    fn test_walk_visits_nested() {
        let inner = SectionContent::new("inner", 2, vec![TextContent::new("leaf").into()]);
        let outer = Content::from(SectionContent::new("outer", 1, vec![inner.into()]));
        assert_eq!(outer.walk().len(), 3);
    }
}
