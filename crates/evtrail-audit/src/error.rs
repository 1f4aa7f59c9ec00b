//! # Audit Errors

use thiserror::Error;

use evtrail_core::CanonicalizationError;

/// Errors raised while building or chaining audit entries.
#[derive(Error, Debug)]
pub enum AuditError {
    /// A required input field was missing or blank. Indicates a caller bug;
    /// retrying with the same input fails the same way.
    #[error("cannot build audit entry: {field} is required")]
    Construction {
        /// camelCase name of the offending field.
        field: &'static str,
    },

    /// An entry was offered to the chain of a different organization.
    #[error("audit entry {entry_id} belongs to org {entry_org}, not to chain org {chain_org}")]
    CrossTenant {
        /// The rejected entry.
        entry_id: String,
        /// Org of the entry.
        entry_org: String,
        /// Org that owns the chain.
        chain_org: String,
    },

    /// Canonicalization failed while hashing.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// A broken audit chain, as reported by verification.
///
/// Every variant names the first position where verification failed.
#[derive(Error, Debug)]
pub enum ChainError {
    /// Entry and chain-hash lists differ in length.
    #[error("chain has {entries} entries but {hashes} chain hashes")]
    LengthMismatch {
        /// Number of entries.
        entries: usize,
        /// Number of stored chain hashes.
        hashes: usize,
    },

    /// The chain mixes entries from several organizations.
    #[error("entry {index} ({entry_id}) belongs to org {actual}, chain belongs to {expected}")]
    MixedOrgs {
        /// Position of the foreign entry.
        index: usize,
        /// The foreign entry.
        entry_id: String,
        /// Org of the first entry.
        expected: String,
        /// Org of the foreign entry.
        actual: String,
    },

    /// An entry's hashed fields no longer match its stored hash.
    #[error("entry {index} ({entry_id}) hash does not match its contents")]
    EntryHashMismatch {
        /// Position of the entry.
        index: usize,
        /// The altered entry.
        entry_id: String,
    },

    /// Recomputing the link does not reproduce the stored chain hash.
    #[error("chain link {index} ({entry_id}) mismatch: stored {stored}, recomputed {recomputed}")]
    LinkMismatch {
        /// Position of the link.
        index: usize,
        /// Entry at that position.
        entry_id: String,
        /// Chain hash as stored.
        stored: String,
        /// Chain hash as recomputed.
        recomputed: String,
    },

    /// Canonicalization failed while recomputing.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

impl ChainError {
    /// Position of the first failure, when the error has one.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::MixedOrgs { index, .. }
            | Self::EntryHashMismatch { index, .. }
            | Self::LinkMismatch { index, .. } => Some(*index),
            Self::LengthMismatch { .. } | Self::Canonicalization(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_display() {
        let err = AuditError::Construction { field: "orgId" };
        assert_eq!(err.to_string(), "cannot build audit entry: orgId is required");
    }

    #[test]
    fn test_cross_tenant_display() {
        let err = AuditError::CrossTenant {
            entry_id: "aud-1".to_string(),
            entry_org: "org-b".to_string(),
            chain_org: "org-a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("org-b"));
        assert!(msg.contains("org-a"));
    }

    #[test]
    fn test_link_mismatch_reports_index() {
        let err = ChainError::LinkMismatch {
            index: 3,
            entry_id: "aud-4".to_string(),
            stored: "aa".to_string(),
            recomputed: "bb".to_string(),
        };
        assert_eq!(err.index(), Some(3));
        assert!(err.to_string().contains("aud-4"));
    }

    #[test]
    fn test_length_mismatch_has_no_index() {
        let err = ChainError::LengthMismatch { entries: 2, hashes: 1 };
        assert_eq!(err.index(), None);
    }
}
