//! Structural operations over table records.
//!
//! Operations are attached to a [`TableContent`](crate::model::TableContent)
//! and run at render time against a copy of its records, in attachment order.
//! Each operation is validated before any record is touched.
//!
//! ```
//! use docform::operation::{FilterOp, LimitOp, SortDirection, SortOp};
//! use docform::model::{record, TableContent};
//! use serde_json::json;
//!
//! let table = TableContent::from_keys(
//!     ["name", "score"],
//!     vec![
//!         record([("name", json!("Charlie")), ("score", json!(85))]),
//!         record([("name", json!("Alice")), ("score", json!(95))]),
//!     ],
//! )
//! .unwrap()
//! .with_operation(FilterOp::new(|r| r["score"].as_i64() > Some(80)))
//! .with_operation(SortOp::new("score", SortDirection::Descending))
//! .with_operation(LimitOp::new(1));
//!
//! let top = table.apply_operations().unwrap();
//! assert_eq!(top.records()[0]["name"], json!("Alice"));
//! ```

mod column;
mod filter;
mod group;
mod limit;
mod sort;

pub use column::{AddColumnOp, ComputeFn};
pub use filter::{FilterOp, Predicate};
pub use group::{Aggregate, AggregateFn, GroupByOp};
pub use limit::LimitOp;
pub use sort::{compare_values, SortDirection, SortOp};

use crate::error::Result;
use crate::model::{Record, Schema};

/// A structural transform over an ordered sequence of records.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Keep records matching a predicate
    Filter(FilterOp),
    /// Stable sort by one column
    Sort(SortOp),
    /// Keep at most N records
    Limit(LimitOp),
    /// Append a computed column
    AddColumn(AddColumnOp),
    /// Group records and aggregate
    GroupBy(GroupByOp),
}

impl Operation {
    /// Short operation name, used in errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Filter(_) => "filter",
            Operation::Sort(_) => "sort",
            Operation::Limit(_) => "limit",
            Operation::AddColumn(_) => "add_column",
            Operation::GroupBy(_) => "group_by",
        }
    }

    /// Check the operation's parameters without touching any data.
    pub fn validate(&self) -> Result<()> {
        match self {
            Operation::Filter(op) => op.validate(),
            Operation::Sort(op) => op.validate(),
            Operation::Limit(op) => op.validate(),
            Operation::AddColumn(op) => op.validate(),
            Operation::GroupBy(op) => op.validate(),
        }
    }

    /// Run the operation. The input is consumed; callers pass a copy.
    pub fn apply(&self, records: Vec<Record>, schema: &Schema) -> Result<Vec<Record>> {
        match self {
            Operation::Filter(op) => op.apply(records, schema),
            Operation::Sort(op) => op.apply(records, schema),
            Operation::Limit(op) => op.apply(records, schema),
            Operation::AddColumn(op) => op.apply(records, schema),
            Operation::GroupBy(op) => op.apply(records, schema),
        }
    }

    /// Schema of the records this operation produces.
    pub fn transform_schema(&self, schema: &Schema) -> Schema {
        match self {
            Operation::AddColumn(op) => op.transform_schema(schema),
            Operation::GroupBy(op) => op.transform_schema(schema),
            Operation::Filter(_) | Operation::Sort(_) | Operation::Limit(_) => schema.clone(),
        }
    }
}

impl From<FilterOp> for Operation {
    fn from(op: FilterOp) -> Self {
        Operation::Filter(op)
    }
}

impl From<SortOp> for Operation {
    fn from(op: SortOp) -> Self {
        Operation::Sort(op)
    }
}

impl From<LimitOp> for Operation {
    fn from(op: LimitOp) -> Self {
        Operation::Limit(op)
    }
}

impl From<AddColumnOp> for Operation {
    fn from(op: AddColumnOp) -> Self {
        Operation::AddColumn(op)
    }
}

impl From<GroupByOp> for Operation {
    fn from(op: GroupByOp) -> Self {
        Operation::GroupBy(op)
    }
}

/// Validate then apply a chain of operations, failing on the first error.
pub fn apply_all(
    operations: &[Operation],
    records: Vec<Record>,
    schema: &Schema,
) -> Result<(Vec<Record>, Schema)> {
    for op in operations {
        op.validate()?;
    }

    let mut schema = schema.clone();
    let mut records = records;
    for op in operations {
        log::trace!("applying {}", op.name());
        records = op.apply(records, &schema)?;
        schema = op.transform_schema(&schema);
    }
    Ok((records, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::record;
    use serde_json::json;

    fn scores() -> Vec<Record> {
        vec![
            record([("name", json!("Charlie")), ("score", json!(85))]),
            record([("name", json!("Alice")), ("score", json!(95))]),
            record([("name", json!("Bob")), ("score", json!(90))]),
        ]
    }

    #[test]
    fn test_sort_then_limit() {
        let schema = Schema::from_keys(["name", "score"]);
        let ops: Vec<Operation> = vec![
            SortOp::new("score", SortDirection::Descending).into(),
            LimitOp::new(2).into(),
        ];

        let (records, _) = apply_all(&ops, scores(), &schema).unwrap();
        let names: Vec<_> = records.iter().map(|r| r["name"].clone()).collect();
        assert_eq!(names, vec![json!("Alice"), json!("Bob")]);
    }

    #[test]
    fn test_validation_runs_before_any_apply() {
        let schema = Schema::from_keys(["name", "score"]);
        let ops: Vec<Operation> = vec![
            SortOp::new("nonexistent", SortDirection::Ascending).into(),
            LimitOp::new(-1).into(),
        ];

        // The invalid limit is reported even though the sort would fail first at apply time.
        let err = apply_all(&ops, scores(), &schema).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidParameter {
                operation: "limit",
                ..
            }
        ));
    }

    #[test]
    fn test_first_execution_failure_aborts_chain() {
        let schema = Schema::from_keys(["name", "score"]);
        let ops: Vec<Operation> = vec![
            SortOp::new("nonexistent", SortDirection::Ascending).into(),
            LimitOp::new(1).into(),
        ];

        let err = apply_all(&ops, scores(), &schema).unwrap_err();
        assert!(matches!(err, Error::ExecutionFailed { operation: "sort", .. }));
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::from(LimitOp::new(1)).name(), "limit");
        assert_eq!(Operation::from(FilterOp::new(|_| true)).name(), "filter");
    }
}
