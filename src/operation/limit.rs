//! Record count limiting.

use crate::error::{Error, Result};
use crate::model::{Record, Schema};

/// Truncates the records to at most `count` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOp {
    count: i64,
}

impl LimitOp {
    /// Create a limit. Negative counts are rejected by [`LimitOp::validate`].
    pub fn new(count: i64) -> Self {
        Self { count }
    }

    /// The configured count.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Check that the count is not negative.
    pub fn validate(&self) -> Result<()> {
        if self.count < 0 {
            return Err(Error::invalid_parameter(
                "limit",
                format!("count must be >= 0, got {}", self.count),
            ));
        }
        Ok(())
    }

    /// Keep the first `count` records.
    pub fn apply(&self, mut records: Vec<Record>, _schema: &Schema) -> Result<Vec<Record>> {
        self.validate()?;
        let count = usize::try_from(self.count).unwrap_or(usize::MAX);
        records.truncate(count);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record;
    use serde_json::json;

    fn numbered(n: i64) -> Vec<Record> {
        (0..n).map(|i| record([("n", json!(i))])).collect()
    }

    #[test]
    fn test_limit_truncates() {
        let out = LimitOp::new(2).apply(numbered(5), &Schema::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1]["n"], json!(1));
    }

    #[test]
    fn test_limit_larger_than_input_keeps_all() {
        let out = LimitOp::new(10).apply(numbered(3), &Schema::default()).unwrap();
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_limit_zero() {
        let out = LimitOp::new(0).apply(numbered(3), &Schema::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_negative_limit_is_invalid() {
        let op = LimitOp::new(-1);
        assert!(matches!(
            op.validate(),
            Err(Error::InvalidParameter { operation: "limit", .. })
        ));
    }
}
