//! # Audit Entry Builder
//!
//! Builds the immutable record written once per committed action.
//!
//! ## Hash
//!
//! ```text
//! hash = SHA-256(JCS({id, orgId, actorId, action, targetEntityId, timestamp}))
//! ```
//!
//! Only those six fields are hashed. `role`, `entityType`, `label` and
//! `metadata` are excluded, so the cost of hashing an entry does not grow
//! with its payload. Metadata is still covered by the chain hash, which
//! digests the whole entry.
//!
//! ## Chain Link
//!
//! ```text
//! chain = SHA-256(JCS({entry, previousHash}))
//! ```
//!
//! `previousHash` is `null` for the first entry of an organization.
//! Building an entry never touches the chain: entries may be built
//! concurrently, and the persistence layer assigns chain order.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use evtrail_core::{
    sha256_hex, ActorId, AuditMetadata, CanonicalBytes, CanonicalizationError, OrgId, Timestamp,
};

use crate::error::AuditError;

/// Caller-supplied description of a committed action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionAuditInput {
    /// Entry id. A UUID v4 is generated when absent.
    pub id: Option<String>,
    /// Owning organization.
    pub org_id: String,
    /// Acting user or service.
    pub actor_id: String,
    /// Role the actor acted in (e.g. `inspector`).
    pub role: String,
    /// Entity type acted upon (e.g. `lot`).
    pub entity_type: String,
    /// Identifier of the entity acted upon.
    pub target_entity_id: String,
    /// Machine-readable action (e.g. `lot.certify`).
    pub action: String,
    /// Human-readable label. Defaults to the action.
    pub label: Option<String>,
    /// Free-form, typed metadata.
    pub metadata: AuditMetadata,
}

/// An immutable, hashed audit record.
///
/// Fields are private and only readable; the record is created by
/// [`build_action_audit_entry`] or deserialized from storage. A stored
/// record whose hashed fields were altered fails [`AuditEntry::verify_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    id: String,
    org_id: OrgId,
    actor_id: ActorId,
    role: String,
    entity_type: String,
    target_entity_id: String,
    action: String,
    label: String,
    metadata: AuditMetadata,
    hash: String,
    timestamp: Timestamp,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashedFields<'a> {
    id: &'a str,
    org_id: &'a OrgId,
    actor_id: &'a ActorId,
    action: &'a str,
    target_entity_id: &'a str,
    timestamp: &'a Timestamp,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChainPayload<'a> {
    entry: &'a AuditEntry,
    previous_hash: Option<&'a str>,
}

impl AuditEntry {
    /// Entry id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Owning organization.
    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Acting user or service.
    pub fn actor_id(&self) -> &ActorId {
        &self.actor_id
    }

    /// Role the actor acted in.
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Entity type acted upon.
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Identifier of the entity acted upon.
    pub fn target_entity_id(&self) -> &str {
        &self.target_entity_id
    }

    /// Machine-readable action.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Human-readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Typed metadata.
    pub fn metadata(&self) -> &AuditMetadata {
        &self.metadata
    }

    /// Stored entry hash (lowercase hex).
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// When the action was recorded.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Recompute the entry hash from the hashed fields.
    pub fn compute_hash(&self) -> Result<String, CanonicalizationError> {
        entry_hash(
            &self.id,
            &self.org_id,
            &self.actor_id,
            &self.action,
            &self.target_entity_id,
            &self.timestamp,
        )
    }

    /// Whether the stored hash still matches the hashed fields.
    pub fn verify_hash(&self) -> Result<bool, CanonicalizationError> {
        Ok(self.compute_hash()? == self.hash)
    }
}

/// Build an audit entry stamped with the current time.
///
/// # Errors
///
/// `AuditError::Construction` if a required field is blank.
pub fn build_action_audit_entry(input: ActionAuditInput) -> Result<AuditEntry, AuditError> {
    build_action_audit_entry_at(input, Timestamp::now())
}

/// Build an audit entry with an explicit timestamp.
///
/// Identical input and timestamp always yield an identical hash.
pub fn build_action_audit_entry_at(
    input: ActionAuditInput,
    timestamp: Timestamp,
) -> Result<AuditEntry, AuditError> {
    let id = match input.id {
        Some(id) => required(id, "id")?,
        None => Uuid::new_v4().to_string(),
    };
    let org_id = OrgId::new(input.org_id).map_err(|_| AuditError::Construction { field: "orgId" })?;
    let actor_id =
        ActorId::new(input.actor_id).map_err(|_| AuditError::Construction { field: "actorId" })?;
    let role = required(input.role, "role")?;
    let entity_type = required(input.entity_type, "entityType")?;
    let target_entity_id = required(input.target_entity_id, "targetEntityId")?;
    let action = required(input.action, "action")?;
    let label = match input.label {
        Some(label) if !label.trim().is_empty() => label,
        _ => action.clone(),
    };

    let hash = entry_hash(&id, &org_id, &actor_id, &action, &target_entity_id, &timestamp)?;

    tracing::debug!(
        entry_id = %id,
        org_id = %org_id,
        entity_type = %entity_type,
        action = %action,
        "audit entry built"
    );

    Ok(AuditEntry {
        id,
        org_id,
        actor_id,
        role,
        entity_type,
        target_entity_id,
        action,
        label,
        metadata: input.metadata,
        hash,
        timestamp,
    })
}

/// Compute the chain hash linking `entry` to its predecessor.
///
/// Pass `None` for the first entry of an organization.
pub fn hash_audit_entry(
    entry: &AuditEntry,
    previous_hash: Option<&str>,
) -> Result<String, CanonicalizationError> {
    let payload = ChainPayload {
        entry,
        previous_hash,
    };
    Ok(sha256_hex(&CanonicalBytes::new(&payload)?))
}

fn entry_hash(
    id: &str,
    org_id: &OrgId,
    actor_id: &ActorId,
    action: &str,
    target_entity_id: &str,
    timestamp: &Timestamp,
) -> Result<String, CanonicalizationError> {
    let fields = HashedFields {
        id,
        org_id,
        actor_id,
        action,
        target_entity_id,
        timestamp,
    };
    Ok(sha256_hex(&CanonicalBytes::new(&fields)?))
}

fn required(value: String, field: &'static str) -> Result<String, AuditError> {
    if value.trim().is_empty() {
        return Err(AuditError::Construction { field });
    }
    Ok(value)
}
