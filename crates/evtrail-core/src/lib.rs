//! # evtrail-core: Foundational Types
//!
//! The leaf of the evtrail crate DAG. Defines the primitives every other
//! crate builds on: canonical bytes for hashing, SHA-256 digests, UTC-only
//! timestamps, tenant/actor identifiers and the typed metadata bag carried
//! by audit entries.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` is the only hashing input.** Audit entry hashes,
//!    chain hashes and any future digest go through `CanonicalBytes::new()`
//!    (RFC 8785 JSON with floats rejected). No raw `serde_json::to_vec()`
//!    for digests.
//!
//! 2. **Newtypes for tenant scoping.** `OrgId` and `ActorId` are distinct
//!    types so an actor cannot be passed where an organization is expected.
//!
//! 3. **UTC-only timestamps.** `Timestamp` renders `YYYY-MM-DDTHH:MM:SSZ`,
//!    so the same instant always canonicalizes to the same bytes.
//!
//! 4. **Bounded metadata shapes.** `MetadataValue` admits only null, bool,
//!    integer, text and text lists, so metadata always canonicalizes.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `evtrail-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use digest::{is_sha256_hex, sha256_digest, sha256_hex, Sha256Digest};
pub use error::{CanonicalizationError, EvtrailError, ValidationError};
pub use identity::{ActorId, OrgId};
pub use metadata::{AuditMetadata, MetadataValue};
pub use temporal::Timestamp;
