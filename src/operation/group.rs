//! Grouping with aggregates.

use serde_json::{Number, Value};

use super::sort::compare_values;
use crate::error::{Error, Result};
use crate::model::{display_value, Field, Record, Schema};

/// Aggregate function applied to one column of each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    /// Number of records in the group
    Count,
    /// Sum of numeric values
    Sum,
    /// Mean of numeric values
    Average,
    /// Smallest value
    Min,
    /// Largest value
    Max,
}

impl AggregateFn {
    fn label(&self) -> &'static str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Average => "avg",
            AggregateFn::Min => "min",
            AggregateFn::Max => "max",
        }
    }
}

/// One aggregate output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    /// Source column (ignored for `Count`)
    pub column: String,
    /// Function to apply
    pub function: AggregateFn,
    /// Output column name
    pub alias: String,
}

impl Aggregate {
    /// Aggregate `column` with `function`, named e.g. `sum_score`.
    pub fn new(column: impl Into<String>, function: AggregateFn) -> Self {
        let column = column.into();
        let alias = match function {
            AggregateFn::Count => "count".to_string(),
            _ => format!("{}_{}", function.label(), column),
        };
        Self {
            column,
            function,
            alias,
        }
    }

    /// Record count of each group.
    pub fn count() -> Self {
        Self::new("", AggregateFn::Count)
    }

    /// Override the output column name.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    fn compute(&self, group: &[Record]) -> Value {
        if self.function == AggregateFn::Count {
            return Value::from(group.len() as u64);
        }

        let values: Vec<&Value> = group
            .iter()
            .filter_map(|r| r.get(&self.column))
            .filter(|v| !v.is_null())
            .collect();

        match self.function {
            AggregateFn::Count => Value::from(group.len() as u64),
            AggregateFn::Sum => number(values.iter().filter_map(|v| v.as_f64()).sum()),
            AggregateFn::Average => {
                let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_f64()).collect();
                if numbers.is_empty() {
                    Value::Null
                } else {
                    number(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            AggregateFn::Min => values
                .into_iter()
                .min_by(|a, b| compare_values(a, b))
                .cloned()
                .unwrap_or(Value::Null),
            AggregateFn::Max => values
                .into_iter()
                .max_by(|a, b| compare_values(a, b))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }
}

fn number(n: f64) -> Value {
    Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
}

/// Groups records by one or more columns, in first-seen group order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupByOp {
    columns: Vec<String>,
    aggregates: Vec<Aggregate>,
}

impl GroupByOp {
    /// Group by `columns` and compute `aggregates` per group.
    pub fn new<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        aggregates: Vec<Aggregate>,
    ) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            aggregates,
        }
    }

    /// Check that at least one group column is named.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(Error::invalid_parameter(
                "group_by",
                "at least one group column is required",
            ));
        }
        if self.columns.iter().any(|c| c.trim().is_empty()) {
            return Err(Error::invalid_parameter(
                "group_by",
                "group column names must not be empty",
            ));
        }
        Ok(())
    }

    /// Produce one record per group.
    pub fn apply(&self, records: Vec<Record>, schema: &Schema) -> Result<Vec<Record>> {
        if let Some(missing) = self.columns.iter().find(|c| !schema.contains(c)) {
            return Err(Error::execution_failed(
                "group_by",
                format!("column '{}' not found in schema", missing),
            ));
        }

        let mut groups: Vec<(Vec<String>, Vec<Record>)> = Vec::new();
        for record in records {
            let key: Vec<String> = self
                .columns
                .iter()
                .map(|c| record.get(c).map(display_value).unwrap_or_default())
                .collect();
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, members)) => members.push(record),
                None => groups.push((key, vec![record])),
            }
        }

        Ok(groups
            .into_iter()
            .map(|(_, members)| {
                let mut out = Record::new();
                for column in &self.columns {
                    let value = members[0].get(column).cloned().unwrap_or(Value::Null);
                    out.insert(column.clone(), value);
                }
                for aggregate in &self.aggregates {
                    out.insert(aggregate.alias.clone(), aggregate.compute(&members));
                }
                out
            })
            .collect())
    }

    /// Group columns followed by aggregate columns.
    pub fn transform_schema(&self, _schema: &Schema) -> Schema {
        let mut fields: Vec<Field> = self.columns.iter().map(Field::new).collect();
        fields.extend(self.aggregates.iter().map(|a| Field::new(a.alias.clone())));
        Schema::new(fields)
    }
}
