//! # Error Types
//!
//! Shared error types for the evtrail crates, built with `thiserror`.
//! Subsystem crates define their own enums and wrap these where a core
//! primitive can fail underneath them.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug)]
pub enum EvtrailError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A domain primitive was rejected at construction.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations; use string or integer: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Rejection of a domain primitive at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was empty or whitespace only.
    #[error("{kind} must not be blank")]
    BlankIdentifier {
        /// Which identifier was blank (e.g. "orgId").
        kind: &'static str,
    },

    /// A timestamp string could not be accepted.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_identifier_display() {
        let err = ValidationError::BlankIdentifier { kind: "orgId" };
        assert_eq!(err.to_string(), "orgId must not be blank");
    }

    #[test]
    fn test_invalid_timestamp_display_carries_input() {
        let err = ValidationError::InvalidTimestamp {
            value: "yesterday".to_string(),
            reason: "not RFC 3339".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("yesterday"));
        assert!(msg.contains("not RFC 3339"));
    }

    #[test]
    fn test_validation_error_converts_to_top_level() {
        let err: EvtrailError = ValidationError::BlankIdentifier { kind: "actorId" }.into();
        assert!(matches!(err, EvtrailError::Validation(_)));
    }
}
