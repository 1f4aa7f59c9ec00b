//! # evtrail-audit: Hash-Chained Audit Trail
//!
//! Builds one immutable [`AuditEntry`] per committed action and links
//! entries of the same organization into a tamper-evident chain.
//!
//! - **Entry builder** (`entry.rs`): validates input, stamps the time and
//!   hashes a fixed set of identifying fields.
//! - **Chain** (`chain.rs`): per-org single-writer appender and a verifier
//!   that replays stored links.
//!
//! Building entries is pure and may happen on any thread. Only appending
//! to a chain needs ordering, and only within one organization.

pub mod chain;
pub mod entry;
pub mod error;

pub use chain::{verify_chain, verify_chained, AuditChain, ChainLink, ChainedEntry};
pub use entry::{
    build_action_audit_entry, build_action_audit_entry_at, hash_audit_entry, ActionAuditInput,
    AuditEntry,
};
pub use error::{AuditError, ChainError};
