//! JSON document descriptions read by the `render` command.
//!
//! ```json
//! {
//!   "metadata": { "title": "Scores" },
//!   "contents": [
//!     { "type": "header", "text": "Scores" },
//!     { "type": "table", "title": "Top", "columns": ["name", "score"],
//!       "records": [{ "name": "Alice", "score": 95 }],
//!       "operations": [{ "op": "sort", "column": "score", "direction": "desc" }] }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use docform::model::{Edge, Metadata, Record};
use docform::operation::{Aggregate, AggregateFn, FilterOp, GroupByOp, LimitOp, SortOp};
use docform::{
    ChartContent, CollapsibleSection, Content, DiagramContent, Document, GraphContent, Operation,
    RawContent, SectionContent, TableContent, TextContent, TextStyle,
};

/// Top-level document description.
#[derive(Debug, Deserialize)]
pub struct DocumentDesc {
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub contents: Vec<ContentDesc>,
}

/// One content item.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentDesc {
    Header {
        text: String,
    },
    Text {
        text: String,
        #[serde(flatten)]
        style: TextStyle,
    },
    Table {
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        columns: Vec<String>,
        #[serde(default)]
        records: Vec<Record>,
        #[serde(default)]
        operations: Vec<OperationDesc>,
    },
    Section {
        title: String,
        #[serde(default = "default_level")]
        level: u8,
        #[serde(default)]
        contents: Vec<ContentDesc>,
    },
    Collapsible {
        summary: String,
        #[serde(default)]
        expanded: bool,
        #[serde(default)]
        contents: Vec<ContentDesc>,
    },
    Chart {
        title: String,
        chart_type: String,
        #[serde(default)]
        data: Value,
    },
    Graph {
        title: String,
        #[serde(default)]
        edges: Vec<Edge>,
    },
    Diagram {
        title: String,
        notation: String,
        source: String,
    },
    Raw {
        format: String,
        data: String,
    },
}

fn default_level() -> u8 {
    1
}

/// One table operation.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OperationDesc {
    Filter {
        column: String,
        #[serde(default)]
        equals: Option<Value>,
        #[serde(default)]
        not_equals: Option<Value>,
    },
    Sort {
        column: String,
        #[serde(default = "default_direction")]
        direction: String,
    },
    Limit {
        count: i64,
    },
    GroupBy {
        columns: Vec<String>,
        #[serde(default)]
        aggregates: Vec<AggregateDesc>,
    },
}

fn default_direction() -> String {
    "asc".to_string()
}

/// One aggregate of a group-by.
#[derive(Debug, Deserialize)]
pub struct AggregateDesc {
    #[serde(default)]
    pub column: String,
    pub function: String,
    #[serde(default)]
    pub alias: Option<String>,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Read and build a document from a JSON description file.
pub fn load(path: &Path) -> CliResult<Document> {
    let text = fs::read_to_string(path)?;
    let desc: DocumentDesc = serde_json::from_str(&text)?;
    desc.into_document()
}

impl DocumentDesc {
    /// Build the described document.
    pub fn into_document(self) -> CliResult<Document> {
        let builder = Document::builder();
        for (key, value) in self.metadata {
            builder.set_metadata(key, value);
        }
        for item in self.contents {
            builder.add_content(item.into_content()?);
        }
        Ok(builder.try_build()?)
    }
}

impl ContentDesc {
    fn into_content(self) -> CliResult<Content> {
        let content: Content = match self {
            ContentDesc::Header { text } => TextContent::header(text).into(),
            ContentDesc::Text { text, style } => TextContent::styled(text, style).into(),
            ContentDesc::Table {
                title,
                columns,
                records,
                operations,
            } => {
                let columns = if columns.is_empty() {
                    infer_columns(&records)
                } else {
                    columns
                };
                let mut table = TableContent::from_keys(columns, records)?;
                if let Some(title) = title {
                    table = table.with_title(title);
                }
                for op in operations {
                    table = table.with_operation(op.into_operation()?);
                }
                table.into()
            }
            ContentDesc::Section {
                title,
                level,
                contents,
            } => SectionContent::new(title, level, children(contents)?).into(),
            ContentDesc::Collapsible {
                summary,
                expanded,
                contents,
            } => CollapsibleSection::new(summary, children(contents)?)
                .expanded(expanded)
                .into(),
            ContentDesc::Chart {
                title,
                chart_type,
                data,
            } => ChartContent::new(title, chart_type, data).into(),
            ContentDesc::Graph { title, edges } => GraphContent::new(title, edges).into(),
            ContentDesc::Diagram {
                title,
                notation,
                source,
            } => DiagramContent::new(title, notation, source).into(),
            ContentDesc::Raw { format, data } => RawContent::new(format, data).into(),
        };
        Ok(content)
    }
}

fn children(descs: Vec<ContentDesc>) -> CliResult<Vec<Content>> {
    descs.into_iter().map(ContentDesc::into_content).collect()
}

/// Column order of first appearance across records.
fn infer_columns(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

impl OperationDesc {
    fn into_operation(self) -> CliResult<Operation> {
        let op: Operation = match self {
            OperationDesc::Filter {
                column,
                equals,
                not_equals,
            } => match (equals, not_equals) {
                (Some(expected), None) => {
                    FilterOp::new(move |r| r.get(&column) == Some(&expected)).into()
                }
                (None, Some(rejected)) => {
                    FilterOp::new(move |r| r.get(&column) != Some(&rejected)).into()
                }
                _ => {
                    return Err(format!(
                        "filter on '{}' needs exactly one of 'equals' or 'not_equals'",
                        column
                    )
                    .into())
                }
            },
            OperationDesc::Sort { column, direction } => SortOp::parse(column, &direction)?.into(),
            OperationDesc::Limit { count } => LimitOp::new(count).into(),
            OperationDesc::GroupBy {
                columns,
                aggregates,
            } => {
                let aggregates = aggregates
                    .into_iter()
                    .map(AggregateDesc::into_aggregate)
                    .collect::<CliResult<Vec<_>>>()?;
                GroupByOp::new(columns, aggregates).into()
            }
        };
        Ok(op)
    }
}

impl AggregateDesc {
    fn into_aggregate(self) -> CliResult<Aggregate> {
        let function = match self.function.to_ascii_lowercase().as_str() {
            "count" => AggregateFn::Count,
            "sum" => AggregateFn::Sum,
            "avg" | "average" => AggregateFn::Average,
            "min" => AggregateFn::Min,
            "max" => AggregateFn::Max,
            other => return Err(format!("unknown aggregate function '{}'", other).into()),
        };
        let aggregate = Aggregate::new(self.column, function);
        Ok(match self.alias {
            Some(alias) => aggregate.with_alias(alias),
            None => aggregate,
        })
    }
}
