//! # evtrail-evidence: Evidence Packs
//!
//! Bundles content-addressed artifacts and audit entries about one entity
//! into a classified pack, validates its structure, and hands a stripped
//! index to an external sealing service.
//!
//! ## Components
//!
//! - **Artifacts** (`artifact.rs`): normalization of caller descriptors.
//! - **Pack ids** (`pack_id.rs`): `{PREFIX}-{ENTITYTYPE}-{YYYYMMDD}-{suffix}`
//!   behind the [`PackIdStrategy`] trait.
//! - **Policy** (`policy.rs`): entity type → control family, retention,
//!   covered controls.
//! - **Builder** (`pack.rs`): assembly and the sealable projection.
//! - **Validation** (`validation.rs`): batched structural checks, also over
//!   unchecked documents read from files.
//! - **Seal** (`seal.rs`): the sealing-service contract.
//! - **Config** (`config.rs`): prefix, policy strictness, id scheme.
//!
//! Everything except pack-id generation is a pure function of its inputs.

pub mod artifact;
pub mod config;
pub mod error;
pub mod pack;
pub mod pack_id;
pub mod policy;
pub mod seal;
pub mod validation;

pub use artifact::{build_artifact, Artifact, ArtifactDescriptor};
pub use config::{EvidenceConfig, PackIdScheme};
pub use error::{ConfigError, EvidenceError, SealError};
pub use pack::{
    build_evidence_pack, generate_pack_id, reset_pack_counter, to_sealable_index,
    EvidencePackBuilder, EvidencePackMeta, PackContext, SealableArtifact, SealableIndex,
};
pub use pack_id::{CounterPackIds, PackIdStrategy, RandomPackIds};
pub use policy::{ControlFamily, ControlPolicy, PolicyTable, RetentionClass};
pub use seal::{seal_pack, EvidencePack, SealEnvelope, SealService, SealedPackRecord};
pub use validation::{
    ensure_valid, validate_document, validate_pack, ArtifactDocument, PackDocument,
};
