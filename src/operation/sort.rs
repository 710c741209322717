//! Stable single-column sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::error::{Error, Result};
use crate::model::{display_value, Record, Schema};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

impl FromStr for SortDirection {
    type Err = Error;

    /// Parse "asc"/"ascending" or "desc"/"descending" (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(Error::invalid_parameter(
                "sort",
                format!("unrecognized sort direction '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

/// Sorts records by one column. Equal keys keep their input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOp {
    column: String,
    direction: SortDirection,
}

impl SortOp {
    /// Create a sort on `column`.
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }

    /// Create a sort from a textual direction such as "asc" or "desc".
    pub fn parse(column: impl Into<String>, direction: &str) -> Result<Self> {
        Ok(Self::new(column, direction.parse()?))
    }

    /// Sort column.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Sort direction.
    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Check that a column is named.
    pub fn validate(&self) -> Result<()> {
        if self.column.trim().is_empty() {
            return Err(Error::invalid_parameter("sort", "column name is required"));
        }
        Ok(())
    }

    /// Sort the records. The column must exist in the schema.
    pub fn apply(&self, mut records: Vec<Record>, schema: &Schema) -> Result<Vec<Record>> {
        if !schema.contains(&self.column) {
            return Err(Error::execution_failed(
                "sort",
                format!("column '{}' not found in schema", self.column),
            ));
        }

        let null = Value::Null;
        records.sort_by(|a, b| {
            let left = a.get(&self.column).unwrap_or(&null);
            let right = b.get(&self.column).unwrap_or(&null);
            let ordering = compare_values(left, right);
            match self.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        Ok(records)
    }
}

/// Compare two cell values.
///
/// Values are ranked by type first: null, then numbers (compared
/// numerically), then everything else (compared by text form). A number is
/// never compared to a string as text, so the order is total for any mix
/// of cell types.
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(l), Value::Number(r)) => compare_numbers(l, r),
        (Value::Number(_), _) => Ordering::Less,
        (_, Value::Number(_)) => Ordering::Greater,
        _ => display_value(left).cmp(&display_value(right)),
    }
}

fn compare_numbers(left: &Number, right: &Number) -> Ordering {
    let as_f64 = |n: &Number| n.as_f64().unwrap_or(f64::NAN);
    as_f64(left).total_cmp(&as_f64(right))
}
