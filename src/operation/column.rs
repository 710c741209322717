//! Computed columns.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::model::{Field, Record, Schema};

/// Function computing a new cell from the rest of the record.
pub type ComputeFn = Arc<dyn Fn(&Record) -> Value + Send + Sync>;

/// Appends a computed column to the schema and to every record.
#[derive(Clone)]
pub struct AddColumnOp {
    name: String,
    compute: Option<ComputeFn>,
}

impl AddColumnOp {
    /// Create a computed column.
    pub fn new<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Record) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            compute: Some(Arc::new(compute)),
        }
    }

    /// Create a computed column from an optional shared function.
    pub fn from_fn(name: impl Into<String>, compute: Option<ComputeFn>) -> Self {
        Self {
            name: name.into(),
            compute,
        }
    }

    /// Name of the new column.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check that the column is named and has a function.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_parameter(
                "add_column",
                "column name is required",
            ));
        }
        if self.compute.is_none() {
            return Err(Error::invalid_parameter(
                "add_column",
                "compute function is required",
            ));
        }
        Ok(())
    }

    /// Compute the column for every record.
    pub fn apply(&self, records: Vec<Record>, schema: &Schema) -> Result<Vec<Record>> {
        let compute = self.compute.as_ref().ok_or_else(|| {
            Error::invalid_parameter("add_column", "compute function is required")
        })?;

        if schema.contains(&self.name) {
            return Err(Error::execution_failed(
                "add_column",
                format!("column '{}' already exists", self.name),
            ));
        }

        Ok(records
            .into_iter()
            .map(|mut record| {
                let value = compute(&record);
                record.insert(self.name.clone(), value);
                record
            })
            .collect())
    }

    /// The input schema with the new column appended.
    pub fn transform_schema(&self, schema: &Schema) -> Schema {
        let mut schema = schema.clone();
        if !schema.contains(&self.name) {
            schema.push(Field::new(self.name.clone()));
        }
        schema
    }
}

impl fmt::Debug for AddColumnOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddColumnOp")
            .field("name", &self.name)
            .field("compute", &self.compute.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
