//! Charts, graphs and diagrams.
//!
//! These carry data for visual formats. Text-oriented encoders render them as
//! fenced source or a plain listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::new_id;

/// A chart with free-form data (e.g. gantt tasks, pie slices).
#[derive(Debug, Clone)]
pub struct ChartContent {
    id: String,
    title: String,
    chart_type: String,
    data: Value,
}

impl ChartContent {
    /// Create a chart of `chart_type` ("gantt", "pie", ...).
    pub fn new(title: impl Into<String>, chart_type: impl Into<String>, data: Value) -> Self {
        Self {
            id: new_id("chart"),
            title: title.into(),
            chart_type: chart_type.into(),
            data,
        }
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chart title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Chart type name.
    pub fn chart_type(&self) -> &str {
        &self.chart_type
    }

    /// Chart data.
    pub fn data(&self) -> &Value {
        &self.data
    }
}

/// A directed edge in a [`GraphContent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Source node
    pub from: String,
    /// Target node
    pub to: String,
    /// Optional edge label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    /// Create an unlabeled edge.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: None,
        }
    }

    /// Attach a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A node/edge graph.
#[derive(Debug, Clone)]
pub struct GraphContent {
    id: String,
    title: String,
    edges: Vec<Edge>,
}

impl GraphContent {
    /// Create a graph from edges.
    pub fn new(title: impl Into<String>, edges: Vec<Edge>) -> Self {
        Self {
            id: new_id("graph"),
            title: title.into(),
            edges,
        }
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Graph title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Distinct node names in first-seen order.
    pub fn nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = Vec::new();
        for edge in &self.edges {
            for node in [edge.from.as_str(), edge.to.as_str()] {
                if !nodes.contains(&node) {
                    nodes.push(node);
                }
            }
        }
        nodes
    }
}

/// A diagram kept as source text in some notation (mermaid, dot, drawio csv).
#[derive(Debug, Clone)]
pub struct DiagramContent {
    id: String,
    title: String,
    notation: String,
    source: String,
}

impl DiagramContent {
    /// Create a diagram.
    pub fn new(
        title: impl Into<String>,
        notation: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id("diagram"),
            title: title.into(),
            notation: notation.into(),
            source: source.into(),
        }
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Diagram title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Notation of the source (e.g. "mermaid").
    pub fn notation(&self) -> &str {
        &self.notation
    }

    /// Diagram source.
    pub fn source(&self) -> &str {
        &self.source
    }
}
