//! # Evidence Pack Builder
//!
//! Aggregates artifacts and audit entries about one entity into a
//! classified [`EvidencePackMeta`], and projects it into the
//! [`SealableIndex`] consumed by the sealing service.
//!
//! Assembly is pure: inputs are borrowed and cloned, nothing is written
//! anywhere. The only shared state is the pack-id strategy.
//!
//! Assembly does not validate. A pack with a foreign-org audit entry or an
//! empty artifact list still builds; [`validate_pack`](crate::validate_pack)
//! reports every problem at once.

use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use evtrail_audit::AuditEntry;
use evtrail_core::Timestamp;

use crate::artifact::Artifact;
use crate::config::{EvidenceConfig, PackIdScheme};
use crate::error::EvidenceError;
use crate::pack_id::{CounterPackIds, PackIdStrategy, RandomPackIds};
use crate::policy::{ControlFamily, ControlPolicy, PolicyTable, RetentionClass};

/// What a pack is about and who assembles it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackContext {
    /// Owning organization.
    pub org_id: String,
    /// Entity type documented by the pack.
    pub entity_type: String,
    /// Entity documented by the pack.
    pub entity_id: String,
    /// Actor assembling the pack.
    pub created_by: String,
    /// Business event the pack evidences (e.g. the transition's audit id).
    pub event_id: Option<String>,
    /// Human summary. Defaults to `"{entityType} {entityId} evidence"`.
    pub summary: Option<String>,
    /// Use this pack id instead of generating one (idempotent retries).
    pub pack_id: Option<String>,
    /// Creation time. Defaults to now.
    pub created_at: Option<Timestamp>,
}

/// A classified, unsealed evidence pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidencePackMeta {
    pub pack_id: String,
    pub org_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub control_family: ControlFamily,
    pub event_type: String,
    #[serde(default)]
    pub event_id: Option<String>,
    pub summary: String,
    pub retention_class: RetentionClass,
    pub controls_covered: Vec<String>,
    pub created_by: String,
    pub artifacts: Vec<Artifact>,
    pub audit_trail_entries: Vec<AuditEntry>,
    pub created_at: Timestamp,
}

/// Artifact fields that are sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealableArtifact {
    pub artifact_id: String,
    pub filename: String,
    pub content_type: String,
    pub sha256: String,
}

/// The projection of a pack handed to the sealing service: identity,
/// classification and artifact hashes. Descriptions, sizes, evidence types,
/// summaries, metadata and audit entries are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealableIndex {
    pub pack_id: String,
    pub org_id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub control_family: ControlFamily,
    pub event_type: String,
    pub event_id: Option<String>,
    pub retention_class: RetentionClass,
    pub controls_covered: Vec<String>,
    pub created_at: Timestamp,
    pub artifacts: Vec<SealableArtifact>,
}

/// Project a pack into the shape the sealing service consumes.
pub fn to_sealable_index(pack: &EvidencePackMeta) -> SealableIndex {
    SealableIndex {
        pack_id: pack.pack_id.clone(),
        org_id: pack.org_id.clone(),
        entity_type: pack.entity_type.clone(),
        entity_id: pack.entity_id.clone(),
        control_family: pack.control_family,
        event_type: pack.event_type.clone(),
        event_id: pack.event_id.clone(),
        retention_class: pack.retention_class,
        controls_covered: pack.controls_covered.clone(),
        created_at: pack.created_at,
        artifacts: pack
            .artifacts
            .iter()
            .map(|a| SealableArtifact {
                artifact_id: a.artifact_id.clone(),
                filename: a.filename.clone(),
                content_type: a.content_type.clone(),
                sha256: a.sha256.clone(),
            })
            .collect(),
    }
}

/// Builds packs with an injected policy table and pack-id strategy.
#[derive(Debug, Clone)]
pub struct EvidencePackBuilder {
    config: EvidenceConfig,
    policies: Arc<PolicyTable>,
    pack_ids: Arc<dyn PackIdStrategy>,
}

static DEFAULT_BUILDER: OnceLock<EvidencePackBuilder> = OnceLock::new();
static DEFAULT_COUNTER: OnceLock<Arc<CounterPackIds>> = OnceLock::new();

impl EvidencePackBuilder {
    /// A builder with the standard policy table and the id strategy named
    /// by `config`.
    pub fn new(config: EvidenceConfig) -> Self {
        let pack_ids: Arc<dyn PackIdStrategy> = match config.pack_id_scheme {
            PackIdScheme::Counter => Arc::new(CounterPackIds::new()),
            PackIdScheme::Random => Arc::new(RandomPackIds),
        };
        Self {
            config,
            policies: Arc::new(PolicyTable::standard()),
            pack_ids,
        }
    }

    /// Replace the policy table.
    pub fn with_policies(mut self, policies: PolicyTable) -> Self {
        self.policies = Arc::new(policies);
        self
    }

    /// Replace the pack-id strategy.
    pub fn with_pack_ids(mut self, pack_ids: Arc<dyn PackIdStrategy>) -> Self {
        self.pack_ids = pack_ids;
        self
    }

    /// The process-wide builder behind the free functions: commerce
    /// preset, standard table, shared counter.
    pub fn shared() -> &'static EvidencePackBuilder {
        DEFAULT_BUILDER.get_or_init(|| {
            let counter: Arc<dyn PackIdStrategy> = shared_counter().clone();
            Self::new(EvidenceConfig::commerce()).with_pack_ids(counter)
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &EvidenceConfig {
        &self.config
    }

    /// Active policy table.
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Generate a pack id with this builder's prefix and strategy.
    pub fn generate_pack_id(&self, entity_type: &str, entity_id: &str, at: Timestamp) -> String {
        self.pack_ids
            .next_id(&self.config.pack_prefix, entity_type, entity_id, at)
    }

    /// Resolve the policy for an entity type, honoring `strict_policy`.
    pub fn policy_for(&self, entity_type: &str) -> Result<&ControlPolicy, EvidenceError> {
        if self.config.strict_policy {
            self.policies.resolve_strict(entity_type)
        } else {
            Ok(self.policies.resolve(entity_type))
        }
    }

    /// Assemble a pack.
    ///
    /// # Errors
    ///
    /// `UnknownEntityType` only when `strict_policy` is set.
    pub fn build(
        &self,
        ctx: &PackContext,
        artifacts: &[Artifact],
        audit_entries: &[AuditEntry],
    ) -> Result<EvidencePackMeta, EvidenceError> {
        let policy = self.policy_for(&ctx.entity_type)?;
        Ok(self.assemble(ctx, artifacts, audit_entries, policy))
    }

    fn assemble(
        &self,
        ctx: &PackContext,
        artifacts: &[Artifact],
        audit_entries: &[AuditEntry],
        policy: &ControlPolicy,
    ) -> EvidencePackMeta {
        let created_at = ctx.created_at.unwrap_or_else(Timestamp::now);
        let pack_id = match &ctx.pack_id {
            Some(id) => id.clone(),
            None => self.generate_pack_id(&ctx.entity_type, &ctx.entity_id, created_at),
        };
        let summary = ctx
            .summary
            .clone()
            .unwrap_or_else(|| format!("{} {} evidence", ctx.entity_type, ctx.entity_id));

        tracing::debug!(
            pack_id = %pack_id,
            org_id = %ctx.org_id,
            entity_type = %ctx.entity_type,
            artifacts = artifacts.len(),
            audit_entries = audit_entries.len(),
            control_family = %policy.control_family,
            "evidence pack assembled"
        );

        EvidencePackMeta {
            pack_id,
            org_id: ctx.org_id.clone(),
            entity_type: ctx.entity_type.clone(),
            entity_id: ctx.entity_id.clone(),
            control_family: policy.control_family,
            event_type: policy.event_type.clone(),
            event_id: ctx.event_id.clone(),
            summary,
            retention_class: policy.retention_class,
            controls_covered: policy.controls_covered.clone(),
            created_by: ctx.created_by.clone(),
            artifacts: artifacts.to_vec(),
            audit_trail_entries: audit_entries.to_vec(),
            created_at,
        }
    }
}

fn shared_counter() -> &'static Arc<CounterPackIds> {
    DEFAULT_COUNTER.get_or_init(|| Arc::new(CounterPackIds::new()))
}

/// Generate a pack id from the shared counter with the `COM` prefix.
pub fn generate_pack_id(entity_type: &str, entity_id: &str, at: Timestamp) -> String {
    EvidencePackBuilder::shared().generate_pack_id(entity_type, entity_id, at)
}

/// Restart the shared counter at `0001`.
pub fn reset_pack_counter() {
    shared_counter().reset();
}

/// Assemble a pack with the shared builder. Unknown entity types fall back
/// to the default classification.
pub fn build_evidence_pack(
    ctx: &PackContext,
    artifacts: &[Artifact],
    audit_entries: &[AuditEntry],
) -> EvidencePackMeta {
    let builder = EvidencePackBuilder::shared();
    let policy = builder.policies.resolve(&ctx.entity_type);
    builder.assemble(ctx, artifacts, audit_entries, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{build_artifact, ArtifactDescriptor};

    fn jan15() -> Timestamp {
        Timestamp::parse("2026-01-15T10:00:00Z").unwrap()
    }

    fn ctx(entity_type: &str) -> PackContext {
        PackContext {
            org_id: "org-acme".to_string(),
            entity_type: entity_type.to_string(),
            entity_id: "q-100".to_string(),
            created_by: "user-7".to_string(),
            created_at: Some(jan15()),
            ..Default::default()
        }
    }

    fn artifact() -> Artifact {
        build_artifact(
            "signed_quote",
            ArtifactDescriptor {
                artifact_id: Some("art-1".to_string()),
                filename: "quote.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                sha256: "a".repeat(64),
                size_bytes: 1024,
                description: Some("Countersigned quote".to_string()),
                metadata: evtrail_core::AuditMetadata::new().with("pages", 3i64),
            },
        )
    }

    #[test]
    fn test_classifies_from_policy() {
        let b = EvidencePackBuilder::new(EvidenceConfig::commerce());
        let pack = b.build(&ctx("quote"), &[artifact()], &[]).unwrap();
        assert_eq!(pack.control_family, ControlFamily::ChangeManagement);
        assert_eq!(pack.retention_class, RetentionClass::SevenYears);
        assert_eq!(pack.pack_id, "COM-QUOTE-20260115-0001");
        assert_eq!(pack.summary, "quote q-100 evidence");
        assert_eq!(pack.created_at, jan15());
    }

    #[test]
    fn test_pack_id_override() {
        let b = EvidencePackBuilder::new(EvidenceConfig::commerce());
        let mut c = ctx("quote");
        c.pack_id = Some("COM-QUOTE-20260115-0042".to_string());
        let pack = b.build(&c, &[artifact()], &[]).unwrap();
        assert_eq!(pack.pack_id, "COM-QUOTE-20260115-0042");
        assert_eq!(b.generate_pack_id("quote", "q-1", jan15()), "COM-QUOTE-20260115-0001");
    }

    #[test]
    fn test_unknown_entity_type_fallback_and_strict() {
        let lenient = EvidencePackBuilder::new(EvidenceConfig::commerce());
        let pack = lenient.build(&ctx("pallet"), &[artifact()], &[]).unwrap();
        assert_eq!(pack.control_family, ControlFamily::Integrity);
        assert!(pack.controls_covered.is_empty());

        let strict = EvidencePackBuilder::new(EvidenceConfig {
            strict_policy: true,
            ..EvidenceConfig::commerce()
        });
        assert!(matches!(
            strict.build(&ctx("pallet"), &[artifact()], &[]),
            Err(EvidenceError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn test_inputs_untouched() {
        let artifacts = vec![artifact()];
        let before = artifacts.clone();
        let pack = build_evidence_pack(&ctx("invoice"), &artifacts, &[]);
        assert_eq!(artifacts, before);
        assert_eq!(pack.artifacts, before);
    }

    #[test]
    fn test_agri_prefix() {
        let b = EvidencePackBuilder::new(EvidenceConfig::agri());
        let mut c = ctx("lot");
        c.entity_id = "lot-42".to_string();
        let pack = b.build(&c, &[artifact()], &[]).unwrap();
        assert!(pack.pack_id.starts_with("AGRI-LOT-20260115-"));
        assert_eq!(pack.retention_class, RetentionClass::TenYears);
    }

    #[test]
    fn test_sealable_index_strips_descriptive_fields() {
        let b = EvidencePackBuilder::new(EvidenceConfig::commerce());
        let pack = b.build(&ctx("quote"), &[artifact()], &[]).unwrap();
        let json = serde_json::to_value(to_sealable_index(&pack)).unwrap();
        let text = json.to_string();
        for banned in ["evidenceType", "sizeBytes", "description", "metadata", "summary", "auditTrailEntries"] {
            assert!(!text.contains(banned), "{banned} leaked into sealable index");
        }
        assert_eq!(json["artifacts"][0]["sha256"], "a".repeat(64));
        assert_eq!(json["controlFamily"], "change-mgmt");
        assert_eq!(json["retentionClass"], "7_YEARS");
    }

    #[test]
    fn test_meta_wire_shape() {
        let b = EvidencePackBuilder::new(EvidenceConfig::commerce());
        let pack = b.build(&ctx("quote"), &[artifact()], &[]).unwrap();
        let json = serde_json::to_value(&pack).unwrap();
        for key in [
            "packId",
            "orgId",
            "entityType",
            "entityId",
            "controlFamily",
            "eventType",
            "eventId",
            "summary",
            "retentionClass",
            "controlsCovered",
            "createdBy",
            "artifacts",
            "auditTrailEntries",
            "createdAt",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        let back: EvidencePackMeta = serde_json::from_value(json).unwrap();
        assert_eq!(back, pack);
    }
}
