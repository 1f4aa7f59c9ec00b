//! # Artifacts
//!
//! An artifact is a content-addressed reference to a file stored elsewhere
//! (inspection photo, signed delivery note, PDF invoice). The pack carries
//! only its SHA-256 and descriptive fields; the bytes never pass through
//! this crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use evtrail_core::AuditMetadata;

/// Caller-supplied description of an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactDescriptor {
    /// Artifact id. A UUID v4 is generated when absent.
    pub artifact_id: Option<String>,
    /// Original file name.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Free-text description. Defaults to `"{evidenceType} artifact"`.
    pub description: Option<String>,
    /// Free-form metadata, never sealed.
    pub metadata: AuditMetadata,
}

/// A normalized artifact reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Artifact id.
    pub artifact_id: String,
    /// Kind of evidence (e.g. `inspection_photo`).
    pub evidence_type: String,
    /// Original file name.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Lowercase hex SHA-256 of the file contents.
    pub sha256: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Free-text description.
    pub description: String,
    /// Free-form metadata.
    #[serde(default, skip_serializing_if = "AuditMetadata::is_empty")]
    pub metadata: AuditMetadata,
}

/// Normalize a caller descriptor into an [`Artifact`].
///
/// Trims and lowercases the digest, fills in the id and description. Does
/// not reject anything: an empty digest or zero size is reported later by
/// [`validate_pack`](crate::validate_pack).
pub fn build_artifact(evidence_type: &str, descriptor: ArtifactDescriptor) -> Artifact {
    let artifact_id = descriptor
        .artifact_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let description = descriptor
        .description
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| format!("{evidence_type} artifact"));

    Artifact {
        artifact_id,
        evidence_type: evidence_type.to_string(),
        filename: descriptor.filename,
        content_type: descriptor.content_type,
        sha256: descriptor.sha256.trim().to_ascii_lowercase(),
        size_bytes: descriptor.size_bytes,
        description,
        metadata: descriptor.metadata,
    }
}
