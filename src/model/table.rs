//! Table content, schema and records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::content::new_id;
use crate::error::{Error, Result};
use crate::operation::{self, Operation};

/// One row of a table: field name to value.
///
/// Iteration order of a record is alphabetical and carries no meaning; the
/// column order is defined by the table's [`Schema`].
pub type Record = BTreeMap<String, Value>;

/// Descriptor of a single table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name, the key used in records
    pub name: String,

    /// Hidden fields stay in the data but are not rendered
    #[serde(default)]
    pub hidden: bool,
}

impl Field {
    /// Create a visible field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: false,
        }
    }

    /// Create a hidden field.
    pub fn hidden(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hidden: true,
        }
    }
}

/// Ordered list of fields. The order is the authoritative column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Create a schema from field descriptors.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Create a schema of visible fields in the given key order.
    pub fn from_keys<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self::new(keys.into_iter().map(Field::new).collect())
    }

    /// All fields in column order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Field names in column order.
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Names of the fields that should be rendered, in column order.
    pub fn visible_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.hidden)
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Check whether a field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Append a field at the end of the column order.
    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Tabular content: a schema, its records and the operations to run on them.
#[derive(Debug, Clone)]
pub struct TableContent {
    id: String,
    title: Option<String>,
    schema: Schema,
    records: Vec<Record>,
    operations: Vec<Operation>,
}

impl TableContent {
    /// Create a table, checking that every record only uses schema fields.
    pub fn new(title: Option<String>, schema: Schema, records: Vec<Record>) -> Result<Self> {
        for (index, record) in records.iter().enumerate() {
            if let Some(key) = record.keys().find(|k| !schema.contains(k)) {
                return Err(Error::invalid_parameter(
                    "table",
                    format!("record {} has field '{}' not in schema", index, key),
                ));
            }
        }

        Ok(Self {
            id: new_id("table"),
            title,
            schema,
            records,
            operations: Vec::new(),
        })
    }

    /// Create an untitled table from key order and records.
    pub fn from_keys<S: Into<String>>(
        keys: impl IntoIterator<Item = S>,
        records: Vec<Record>,
    ) -> Result<Self> {
        Self::new(None, Schema::from_keys(keys), records)
    }

    /// Set the table title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Attach an operation. Operations run in attachment order at render time.
    pub fn with_operation(mut self, operation: impl Into<Operation>) -> Self {
        self.operations.push(operation.into());
        self
    }

    /// Content identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Table title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Column schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Records in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Attached operations in attachment order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Check if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Run the attached operations against a copy of the records.
    ///
    /// Returns a new table holding the result and no pending operations. The
    /// first failing operation aborts the chain; `self` is never modified.
    pub fn apply_operations(&self) -> Result<TableContent> {
        if self.operations.is_empty() {
            return Ok(self.clone());
        }

        log::trace!("table {}: applying {} operations", self.id, self.operations.len());
        let (records, schema) =
            operation::apply_all(&self.operations, self.records.clone(), &self.schema)?;

        Ok(TableContent {
            id: self.id.clone(),
            title: self.title.clone(),
            schema,
            records,
            operations: Vec::new(),
        })
    }

    /// Replace the records, keeping id, title, schema and operations.
    ///
    /// Fails if a new record carries a field the schema does not know.
    pub fn with_records(&self, records: Vec<Record>) -> Result<TableContent> {
        let mut table = TableContent::new(self.title.clone(), self.schema.clone(), records)?;
        table.id = self.id.clone();
        table.operations = self.operations.clone();
        Ok(table)
    }

    /// Value of a cell rendered as plain text ("" for missing or null).
    pub fn cell_text(record: &Record, key: &str) -> String {
        record.get(key).map(display_value).unwrap_or_default()
    }

    /// Tab-separated plain text: a header line then one line per record.
    pub fn plain_text(&self) -> String {
        let keys = self.schema.visible_keys();
        let mut lines = vec![keys.join("\t")];
        for record in &self.records {
            let cells: Vec<String> = keys.iter().map(|k| Self::cell_text(record, k)).collect();
            lines.push(cells.join("\t"));
        }
        lines.join("\n")
    }
}

/// Render a JSON value as plain text: strings unquoted, null as empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build a record from key/value pairs.
///
/// ```
/// use docform::model::record;
/// use serde_json::json;
///
/// let r = record([("name", json!("Alice")), ("age", json!(25))]);
/// assert_eq!(r["age"], json!(25));
/// ```
pub fn record<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Record {
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}
