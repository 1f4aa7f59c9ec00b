//! # Canonical JSON
//!
//! Every hash in evtrail is taken over [`CanonicalBytes`]: the RFC 8785
//! (JCS) rendering of a value, produced by `serde_jcs`. Keys are sorted,
//! separators are compact and the output is UTF-8, so the same record
//! always hashes the same in any process.
//!
//! Floats are refused before rendering. Audit and evidence records carry
//! integers and strings only, and a float reaching a hash input means a
//! caller put a measured quantity where text was expected.

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// JCS-rendered bytes of a float-free value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Render `value` canonically.
    ///
    /// # Errors
    ///
    /// `FloatRejected` for any fractional number, at any depth.
    /// `SerializationFailed` if serde cannot represent the value as JSON.
    pub fn new(value: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let tree = serde_json::to_value(value)?;
        ensure_no_floats(&tree)?;
        Ok(Self(serde_jcs::to_vec(&tree)?))
    }

    /// The rendered bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a rendered value; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

fn ensure_no_floats(value: &Value) -> Result<(), CanonicalizationError> {
    let mut pending = vec![value];
    while let Some(v) = pending.pop() {
        match v {
            Value::Number(n) if !(n.is_i64() || n.is_u64()) => {
                return Err(CanonicalizationError::FloatRejected(
                    n.as_f64().unwrap_or(f64::NAN),
                ));
            }
            Value::Array(items) => pending.extend(items),
            Value::Object(fields) => pending.extend(fields.values()),
            _ => {}
        }
    }
    Ok(())
}
