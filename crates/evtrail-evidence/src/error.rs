//! # Evidence Errors

use thiserror::Error;

/// Errors raised while classifying, validating or sealing a pack.
#[derive(Error, Debug)]
pub enum EvidenceError {
    /// Strict policy resolution found no entry for the entity type.
    #[error("no control policy for entity type \"{entity_type}\"")]
    UnknownEntityType {
        /// The unrecognized entity type.
        entity_type: String,
    },

    /// The pack violates one or more structural rules.
    #[error("evidence pack is invalid: {}", violations.join("; "))]
    ValidationFailure {
        /// Every violation found, in check order.
        violations: Vec<String>,
    },

    /// The seal envelope was rejected or could not be obtained.
    #[error("seal error: {0}")]
    Seal(#[from] SealError),
}

impl EvidenceError {
    /// Violations carried by a `ValidationFailure`, empty otherwise.
    pub fn violations(&self) -> &[String] {
        match self {
            Self::ValidationFailure { violations } => violations,
            _ => &[],
        }
    }
}

/// Errors at the boundary with the external sealing service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SealError {
    /// The envelope lacks a required field.
    #[error("seal envelope field {field} is empty")]
    MissingField {
        /// camelCase name of the empty field.
        field: &'static str,
    },

    /// The envelope claims a seal time earlier than the pack itself.
    #[error("seal time {sealed_at} precedes pack creation {created_at}")]
    SealedBeforeCreation {
        /// Seal time reported by the service.
        sealed_at: String,
        /// Pack creation time.
        created_at: String,
    },

    /// The sealing service refused the index.
    #[error("sealing service rejected pack {pack_id}: {reason}")]
    Rejected {
        /// Pack that was offered.
        pack_id: String,
        /// Reason reported by the service.
        reason: String,
    },

    /// The sealing service could not be reached or failed internally.
    #[error("sealing service unavailable: {0}")]
    Unavailable(String),
}

impl SealError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// Invalid evidence configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Pack prefix must be non-empty uppercase ASCII letters or digits.
    #[error("invalid pack prefix {value:?}: expected uppercase letters and digits")]
    InvalidPrefix {
        /// The rejected value.
        value: String,
    },

    /// A boolean variable held something other than true/false/1/0.
    #[error("invalid boolean for {var}: {value:?}")]
    InvalidBool {
        /// Variable name.
        var: String,
        /// The rejected value.
        value: String,
    },

    /// Unknown pack-id scheme.
    #[error("invalid pack id scheme {value:?}: expected \"counter\" or \"random\"")]
    InvalidScheme {
        /// The rejected value.
        value: String,
    },
}
