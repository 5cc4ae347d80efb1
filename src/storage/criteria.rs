//! Attribute-equality filters for query-capable stores
//!
//! Criteria are matched against the serialized JSON form of a record, so any
//! top-level field of a storable shape can be filtered on without the store
//! knowing the shape.

use serde::Serialize;
use serde_json::Value;

use crate::error::WalletResult;

/// A conjunction of `field == value` filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    filters: Vec<(String, Value)>,
}

impl Criteria {
    /// Criteria that match every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality filter
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Check a serialized record against every filter
    pub fn matches_value(&self, record: &Value) -> bool {
        self.filters
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }

    /// Serialize a record and check it against every filter
    pub fn matches<D: Serialize>(&self, record: &D) -> WalletResult<bool> {
        if self.is_empty() {
            return Ok(true);
        }
        let value = serde_json::to_value(record)?;
        Ok(self.matches_value(&value))
    }
}
