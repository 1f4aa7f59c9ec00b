//! # Typed Audit Metadata
//!
//! The free-form part of an audit entry. Values are limited to a small set
//! of shapes that always canonicalize: null, booleans, 64-bit integers,
//! text, and lists of text. Floats and nested objects are not representable,
//! so hashing metadata (chain hashes include the whole entry) can never fail
//! or drift between implementations.
//!
//! Keys are kept in a `BTreeMap`, so iteration and serialization order are
//! deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
    /// Signed integer. Quantities with fractions must be sent as text.
    Integer(i64),
    /// UTF-8 text.
    Text(String),
    /// List of text values (e.g. artifact ids, tags).
    TextList(Vec<String>),
}

impl From<bool> for MetadataValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for MetadataValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for MetadataValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(v: Vec<String>) -> Self {
        Self::TextList(v)
    }
}

/// Ordered key-value metadata attached to an audit entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuditMetadata(BTreeMap<String, MetadataValue>);

impl AuditMetadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
    ) -> Option<MetadataValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &MetadataValue)> {
        self.0.iter()
    }
}

impl FromIterator<(String, MetadataValue)> for AuditMetadata {
    fn from_iter<I: IntoIterator<Item = (String, MetadataValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
