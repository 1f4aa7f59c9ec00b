//! # Pack Validation
//!
//! Structural checks run before a pack is sealed. All checks run on every
//! call and every violation is reported, so a caller fixes a pack in one
//! round trip.
//!
//! Packs read from files or storage go through [`PackDocument`] first.
//! Every field there is optional, so a missing key or a negative size shows
//! up in the violation list instead of aborting the parse.

use serde::Deserialize;

use evtrail_audit::AuditEntry;
use evtrail_core::{is_sha256_hex, AuditMetadata, Timestamp};

use crate::artifact::Artifact;
use crate::error::EvidenceError;
use crate::pack::EvidencePackMeta;
use crate::policy::{ControlFamily, RetentionClass};

/// An unchecked pack as found in a file or store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackDocument {
    pub pack_id: Option<String>,
    pub org_id: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub control_family: Option<ControlFamily>,
    pub event_type: Option<String>,
    pub event_id: Option<String>,
    pub summary: Option<String>,
    pub retention_class: Option<RetentionClass>,
    pub controls_covered: Vec<String>,
    pub created_by: Option<String>,
    pub artifacts: Vec<ArtifactDocument>,
    pub audit_trail_entries: Vec<AuditEntry>,
    pub created_at: Option<Timestamp>,
}

/// An unchecked artifact inside a [`PackDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArtifactDocument {
    pub artifact_id: Option<String>,
    pub evidence_type: Option<String>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub sha256: Option<String>,
    pub size_bytes: Option<i64>,
    pub description: Option<String>,
    pub metadata: AuditMetadata,
}

impl PackDocument {
    /// Check the document and convert it into a typed pack.
    ///
    /// # Errors
    ///
    /// `ValidationFailure` carrying every violation [`validate_document`]
    /// finds.
    pub fn into_meta(self) -> Result<EvidencePackMeta, EvidenceError> {
        let violations = validate_document(&self);
        match (self.control_family, self.retention_class, self.created_at) {
            (Some(control_family), Some(retention_class), Some(created_at))
                if violations.is_empty() =>
            {
                Ok(EvidencePackMeta {
                    pack_id: self.pack_id.unwrap_or_default(),
                    org_id: self.org_id.unwrap_or_default(),
                    entity_type: self.entity_type.unwrap_or_default(),
                    entity_id: self.entity_id.unwrap_or_default(),
                    control_family,
                    event_type: self.event_type.unwrap_or_default(),
                    event_id: self.event_id,
                    summary: self.summary.unwrap_or_default(),
                    retention_class,
                    controls_covered: self.controls_covered,
                    created_by: self.created_by.unwrap_or_default(),
                    artifacts: self
                        .artifacts
                        .into_iter()
                        .map(ArtifactDocument::into_artifact)
                        .collect(),
                    audit_trail_entries: self.audit_trail_entries,
                    created_at,
                })
            }
            _ => Err(EvidenceError::ValidationFailure { violations }),
        }
    }
}

impl ArtifactDocument {
    fn into_artifact(self) -> Artifact {
        Artifact {
            artifact_id: self.artifact_id.unwrap_or_default(),
            evidence_type: self.evidence_type.unwrap_or_default(),
            filename: self.filename.unwrap_or_default(),
            content_type: self.content_type.unwrap_or_default(),
            sha256: self.sha256.unwrap_or_default(),
            size_bytes: self
                .size_bytes
                .and_then(|n| u64::try_from(n).ok())
                .unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            metadata: self.metadata,
        }
    }
}

struct ArtifactFields<'a> {
    artifact_id: Option<&'a str>,
    sha256: Option<&'a str>,
    size_bytes: Option<i64>,
}

struct PackFields<'a> {
    pack_id: &'a str,
    org_id: &'a str,
    required: Vec<(&'static str, bool)>,
    artifacts: Vec<ArtifactFields<'a>>,
    entries: &'a [AuditEntry],
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

fn check(fields: &PackFields<'_>) -> Vec<String> {
    let mut violations: Vec<String> = fields
        .required
        .iter()
        .filter(|(_, ok)| !ok)
        .map(|(field, _)| format!("{field} is required"))
        .collect();

    if fields.artifacts.is_empty() {
        violations.push("pack must contain at least one artifact".to_string());
    }
    for (i, artifact) in fields.artifacts.iter().enumerate() {
        let label = match artifact.artifact_id {
            Some(id) => format!("artifact {i} ({id})"),
            None => format!("artifact {i}"),
        };
        match artifact.sha256 {
            Some(sha) if !sha.trim().is_empty() => {
                if !is_sha256_hex(sha) {
                    violations.push(format!("{label}: sha256 must be 64 hex characters"));
                }
            }
            _ => violations.push(format!("{label}: sha256 is required")),
        }
        if !artifact.size_bytes.is_some_and(|n| n > 0) {
            violations.push(format!("{label}: sizeBytes must be positive"));
        }
    }

    for entry in fields.entries {
        if entry.org_id().as_str() != fields.org_id {
            violations.push(format!(
                "audit entry {}: orgId {} does not match pack orgId {}",
                entry.id(),
                entry.org_id(),
                fields.org_id
            ));
        }
    }

    if !violations.is_empty() {
        tracing::debug!(
            pack_id = %fields.pack_id,
            violations = violations.len(),
            "evidence pack failed validation"
        );
    }
    violations
}

/// Every structural violation of `pack`, in check order. Empty means valid.
///
/// Checks:
/// - `packId`, `orgId`, `entityType`, `entityId`, `createdBy` are non-blank
/// - at least one artifact
/// - every artifact has a 64-character hex `sha256` and `sizeBytes > 0`
/// - every audit entry belongs to the pack's organization
pub fn validate_pack(pack: &EvidencePackMeta) -> Vec<String> {
    check(&PackFields {
        pack_id: &pack.pack_id,
        org_id: &pack.org_id,
        required: vec![
            ("packId", present(Some(pack.pack_id.as_str()))),
            ("orgId", present(Some(pack.org_id.as_str()))),
            ("entityType", present(Some(pack.entity_type.as_str()))),
            ("entityId", present(Some(pack.entity_id.as_str()))),
            ("createdBy", present(Some(pack.created_by.as_str()))),
        ],
        artifacts: pack
            .artifacts
            .iter()
            .map(|a| ArtifactFields {
                artifact_id: Some(a.artifact_id.as_str()),
                sha256: Some(a.sha256.as_str()),
                size_bytes: Some(i64::try_from(a.size_bytes).unwrap_or(i64::MAX)),
            })
            .collect(),
        entries: &pack.audit_trail_entries,
    })
}

/// [`validate_pack`] over an unchecked document.
///
/// Absent identity fields are reported like blank ones. The classification
/// fields (`controlFamily`, `eventType`, `retentionClass`, `createdAt`)
/// are also required here since a typed pack always carries them.
pub fn validate_document(doc: &PackDocument) -> Vec<String> {
    let org_id = doc.org_id.as_deref().unwrap_or_default();
    check(&PackFields {
        pack_id: doc.pack_id.as_deref().unwrap_or_default(),
        org_id,
        required: vec![
            ("packId", present(doc.pack_id.as_deref())),
            ("orgId", present(doc.org_id.as_deref())),
            ("entityType", present(doc.entity_type.as_deref())),
            ("entityId", present(doc.entity_id.as_deref())),
            ("createdBy", present(doc.created_by.as_deref())),
            ("controlFamily", doc.control_family.is_some()),
            ("eventType", present(doc.event_type.as_deref())),
            ("retentionClass", doc.retention_class.is_some()),
            ("createdAt", doc.created_at.is_some()),
        ],
        artifacts: doc
            .artifacts
            .iter()
            .map(|a| ArtifactFields {
                artifact_id: a.artifact_id.as_deref(),
                sha256: a.sha256.as_deref(),
                size_bytes: a.size_bytes,
            })
            .collect(),
        entries: &doc.audit_trail_entries,
    })
}

/// [`validate_pack`] as a `Result`.
pub fn ensure_valid(pack: &EvidencePackMeta) -> Result<(), EvidenceError> {
    let violations = validate_pack(pack);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(EvidenceError::ValidationFailure { violations })
    }
}
