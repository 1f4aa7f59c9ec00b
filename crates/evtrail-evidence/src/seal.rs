//! # Sealing Boundary
//!
//! The sealing service computes a Merkle root over the artifact hashes of a
//! [`SealableIndex`] and signs it. That algorithm lives outside this crate;
//! only the contract is modeled here:
//!
//! ```text
//! EvidencePackMeta --to_sealable_index--> SealableIndex --SealService--> SealEnvelope
//! (EvidencePackMeta, SealEnvelope) --EvidencePack::seal--> EvidencePack
//! ```

use serde::{Deserialize, Serialize};

use evtrail_core::Timestamp;

use crate::error::{EvidenceError, SealError};
use crate::pack::{to_sealable_index, EvidencePackMeta, SealableIndex};
use crate::validation::ensure_valid;

/// Attestation returned by the sealing service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealEnvelope {
    /// Signature algorithm, e.g. `ed25519`.
    pub algorithm: String,
    /// Hex Merkle root over the sealed artifact hashes.
    pub merkle_root: String,
    /// Signature over the root.
    pub signature: String,
    /// When the seal was produced.
    pub sealed_at: Timestamp,
}

impl SealEnvelope {
    fn check(&self) -> Result<(), SealError> {
        let fields = [
            ("algorithm", &self.algorithm),
            ("merkleRoot", &self.merkle_root),
            ("signature", &self.signature),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(SealError::MissingField { field });
            }
        }
        Ok(())
    }
}

/// A sealed, immutable evidence pack.
///
/// Deserialization goes through [`EvidencePack::seal`], so a stored pack
/// that is invalid or sealed before its creation time does not load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SealedPackRecord")]
pub struct EvidencePack {
    meta: EvidencePackMeta,
    seal: SealEnvelope,
}

/// Stored form of an [`EvidencePack`], before its checks are re-run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedPackRecord {
    pub meta: EvidencePackMeta,
    pub seal: SealEnvelope,
}

impl TryFrom<SealedPackRecord> for EvidencePack {
    type Error = EvidenceError;

    fn try_from(record: SealedPackRecord) -> Result<Self, Self::Error> {
        Self::seal(record.meta, record.seal)
    }
}

impl EvidencePack {
    /// Bind a seal to a pack.
    ///
    /// # Errors
    ///
    /// - `ValidationFailure` if the pack is structurally invalid.
    /// - `Seal` if the envelope has empty fields or predates the pack.
    pub fn seal(meta: EvidencePackMeta, seal: SealEnvelope) -> Result<Self, EvidenceError> {
        ensure_valid(&meta)?;
        seal.check()?;
        if seal.sealed_at < meta.created_at {
            return Err(SealError::SealedBeforeCreation {
                sealed_at: seal.sealed_at.to_string(),
                created_at: meta.created_at.to_string(),
            }
            .into());
        }
        tracing::info!(
            pack_id = %meta.pack_id,
            org_id = %meta.org_id,
            algorithm = %seal.algorithm,
            "evidence pack sealed"
        );
        Ok(Self { meta, seal })
    }

    /// The sealed pack contents.
    pub fn meta(&self) -> &EvidencePackMeta {
        &self.meta
    }

    /// The attestation.
    pub fn envelope(&self) -> &SealEnvelope {
        &self.seal
    }

    /// The index that was sealed.
    pub fn sealable_index(&self) -> SealableIndex {
        to_sealable_index(&self.meta)
    }
}

/// External sealing service.
pub trait SealService: Send + Sync {
    /// Seal an index.
    fn seal(&self, index: &SealableIndex) -> Result<SealEnvelope, SealError>;
}

/// Validate, project, seal and bind in one step.
pub fn seal_pack(
    meta: EvidencePackMeta,
    service: &dyn SealService,
) -> Result<EvidencePack, EvidenceError> {
    ensure_valid(&meta)?;
    let index = to_sealable_index(&meta);
    let envelope = service.seal(&index)?;
    EvidencePack::seal(meta, envelope)
}
