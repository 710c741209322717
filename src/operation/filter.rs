//! Record filtering.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::model::{Record, Schema};

/// Record predicate shared between clones of an operation.
pub type Predicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Keeps only the records for which the predicate returns `true`.
#[derive(Clone, Default)]
pub struct FilterOp {
    predicate: Option<Predicate>,
}

impl FilterOp {
    /// Create a filter from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Some(Arc::new(predicate)),
        }
    }

    /// Create a filter from an optional shared predicate.
    ///
    /// A filter without a predicate fails validation.
    pub fn from_predicate(predicate: Option<Predicate>) -> Self {
        Self { predicate }
    }

    /// Check that a predicate is present.
    pub fn validate(&self) -> Result<()> {
        if self.predicate.is_none() {
            return Err(Error::invalid_parameter("filter", "predicate is required"));
        }
        Ok(())
    }

    /// Keep the matching records, preserving their order.
    pub fn apply(&self, records: Vec<Record>, _schema: &Schema) -> Result<Vec<Record>> {
        let predicate = self
            .predicate
            .as_ref()
            .ok_or_else(|| Error::invalid_parameter("filter", "predicate is required"))?;

        Ok(records.into_iter().filter(|r| predicate(r)).collect())
    }
}

impl fmt::Debug for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterOp")
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
