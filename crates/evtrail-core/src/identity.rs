//! # Tenant and Actor Identifiers
//!
//! Newtype wrappers for the identifiers that scope every record: the
//! organization (tenant) and the acting user or service. Keeping them as
//! distinct types means an actor id cannot be compared against an org id
//! by accident when enforcing tenant isolation.
//!
//! Both serialize as plain strings so the JSON wire shape stays
//! `"orgId": "org-123"`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of the organization (tenant) that owns a record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(String);

/// Identifier of the user or service that performed an action.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl OrgId {
    /// Create an org id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        non_blank(id.into(), "orgId").map(Self)
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank. Only reachable through deserialization.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl ActorId {
    /// Create an actor id, rejecting blank input.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        non_blank(id.into(), "actorId").map(Self)
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank. Only reachable through deserialization.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

fn non_blank(id: String, kind: &'static str) -> Result<String, ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::BlankIdentifier { kind });
    }
    Ok(id)
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_org_id_rejects_blank() {
        assert_eq!(
            OrgId::new("  ").unwrap_err(),
            ValidationError::BlankIdentifier { kind: "orgId" }
        );
        assert!(OrgId::new("").is_err());
    }

    #[test]
    fn test_actor_id_rejects_blank() {
        assert_eq!(
            ActorId::new("").unwrap_err(),
            ValidationError::BlankIdentifier { kind: "actorId" }
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let org = OrgId::new("org-42").unwrap();
        assert_eq!(serde_json::to_string(&org).unwrap(), "\"org-42\"");
        let parsed: OrgId = serde_json::from_str("\"org-42\"").unwrap();
        assert_eq!(parsed, org);
    }

    #[test]
    fn test_deserialized_blank_is_detectable() {
        let parsed: OrgId = serde_json::from_str("\"\"").unwrap();
        assert!(parsed.is_blank());
    }

    #[test]
    fn test_display() {
        assert_eq!(ActorId::new("user-7").unwrap().to_string(), "user-7");
    }
}
