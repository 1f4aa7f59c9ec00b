//! # Audit Chain
//!
//! Append-only, per-organization sequence of audit entries. Each link
//! digests the full entry together with the previous link:
//!
//! ```text
//! chain[0] = hash_audit_entry(entry[0], null)
//! chain[i] = hash_audit_entry(entry[i], chain[i-1])
//! ```
//!
//! [`AuditChain`] is the single writer for one organization. Holding it by
//! `&mut` is what serializes chain order; persistence layers keep one
//! chain per org behind their own lock or queue.
//!
//! [`verify_chain`] replays a stored chain and reports the first position
//! where a stored value can no longer be reproduced.

use serde::{Deserialize, Serialize};

use evtrail_core::OrgId;

use crate::entry::{hash_audit_entry, AuditEntry};
use crate::error::{AuditError, ChainError};

/// Result of appending one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainLink {
    /// Zero-based position in the org's chain.
    pub sequence: u64,
    /// The appended entry.
    pub entry_id: String,
    /// Head before the append; `None` for the first entry.
    pub previous_hash: Option<String>,
    /// New head.
    pub chain_hash: String,
}

/// An entry paired with its stored chain hash, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainedEntry {
    /// The audit entry.
    pub entry: AuditEntry,
    /// Chain hash stored alongside it.
    pub chain_hash: String,
}

/// Single-writer chain appender for one organization.
#[derive(Debug, Clone)]
pub struct AuditChain {
    org_id: OrgId,
    head: Option<String>,
    len: u64,
}

impl AuditChain {
    /// An empty chain for `org_id`.
    pub fn new(org_id: OrgId) -> Self {
        Self {
            org_id,
            head: None,
            len: 0,
        }
    }

    /// Continue a chain whose last stored hash is `head` and which holds
    /// `len` entries.
    pub fn resume(org_id: OrgId, head: impl Into<String>, len: u64) -> Self {
        Self {
            org_id,
            head: Some(head.into()),
            len,
        }
    }

    /// Link `entry` onto the head.
    ///
    /// # Errors
    ///
    /// `CrossTenant` if the entry belongs to another organization; the
    /// chain is left unchanged.
    pub fn append(&mut self, entry: &AuditEntry) -> Result<ChainLink, AuditError> {
        if entry.org_id() != &self.org_id {
            return Err(AuditError::CrossTenant {
                entry_id: entry.id().to_string(),
                entry_org: entry.org_id().to_string(),
                chain_org: self.org_id.to_string(),
            });
        }

        let chain_hash = hash_audit_entry(entry, self.head.as_deref())?;
        let link = ChainLink {
            sequence: self.len,
            entry_id: entry.id().to_string(),
            previous_hash: self.head.replace(chain_hash.clone()),
            chain_hash,
        };
        self.len += 1;

        tracing::debug!(
            org_id = %self.org_id,
            entry_id = %link.entry_id,
            sequence = link.sequence,
            "audit entry chained"
        );
        Ok(link)
    }

    /// Current head hash, `None` while empty.
    pub fn head(&self) -> Option<&str> {
        self.head.as_deref()
    }

    /// Number of entries linked so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Owning organization.
    pub fn org_id(&self) -> &OrgId {
        &self.org_id
    }
}

/// Verify a stored chain.
///
/// `entries[i]` must be paired with `chain_hashes[i]`. Checks, in order:
/// equal lengths, then per position a single org, the entry's own hash and
/// the recomputed link. Stops at the first failure.
pub fn verify_chain(entries: &[AuditEntry], chain_hashes: &[String]) -> Result<(), ChainError> {
    if entries.len() != chain_hashes.len() {
        let err = ChainError::LengthMismatch {
            entries: entries.len(),
            hashes: chain_hashes.len(),
        };
        tracing::warn!(error = %err, "audit chain broken");
        return Err(err);
    }

    let result = replay(entries.iter().zip(chain_hashes.iter().map(String::as_str)));
    if let Err(ref err) = result {
        tracing::warn!(error = %err, index = ?err.index(), "audit chain broken");
    }
    result
}

/// Verify a chain stored as entry/hash pairs.
pub fn verify_chained(chain: &[ChainedEntry]) -> Result<(), ChainError> {
    let result = replay(chain.iter().map(|c| (&c.entry, c.chain_hash.as_str())));
    if let Err(ref err) = result {
        tracing::warn!(error = %err, index = ?err.index(), "audit chain broken");
    }
    result
}

fn replay<'a>(links: impl Iterator<Item = (&'a AuditEntry, &'a str)>) -> Result<(), ChainError> {
    let mut org: Option<&OrgId> = None;
    let mut previous: Option<&str> = None;

    for (index, (entry, stored)) in links.enumerate() {
        match org {
            None => org = Some(entry.org_id()),
            Some(expected) if expected != entry.org_id() => {
                return Err(ChainError::MixedOrgs {
                    index,
                    entry_id: entry.id().to_string(),
                    expected: expected.to_string(),
                    actual: entry.org_id().to_string(),
                });
            }
            Some(_) => {}
        }

        if !entry.verify_hash()? {
            return Err(ChainError::EntryHashMismatch {
                index,
                entry_id: entry.id().to_string(),
            });
        }

        let recomputed = hash_audit_entry(entry, previous)?;
        if recomputed != stored {
            return Err(ChainError::LinkMismatch {
                index,
                entry_id: entry.id().to_string(),
                stored: stored.to_string(),
                recomputed,
            });
        }
        previous = Some(stored);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{build_action_audit_entry_at, ActionAuditInput};
    use evtrail_core::Timestamp;

    fn entry(org: &str, n: u32) -> AuditEntry {
        let input = ActionAuditInput {
            id: Some(format!("aud-{n:04}")),
            org_id: org.to_string(),
            actor_id: "user-1".to_string(),
            role: "clerk".to_string(),
            entity_type: "order".to_string(),
            target_entity_id: "ord-9".to_string(),
            action: "order.confirm".to_string(),
            ..Default::default()
        };
        let ts = Timestamp::parse("2026-03-01T08:00:00Z").unwrap();
        build_action_audit_entry_at(input, ts).unwrap()
    }

    fn build(org: &str, n: u32) -> (Vec<AuditEntry>, Vec<String>) {
        let mut chain = AuditChain::new(OrgId::new(org).unwrap());
        let entries: Vec<_> = (0..n).map(|i| entry(org, i)).collect();
        let hashes = entries
            .iter()
            .map(|e| chain.append(e).unwrap().chain_hash)
            .collect();
        (entries, hashes)
    }

    #[test]
    fn test_first_link_has_no_previous() {
        let mut chain = AuditChain::new(OrgId::new("org-a").unwrap());
        assert!(chain.is_empty());
        let e = entry("org-a", 0);
        let link = chain.append(&e).unwrap();
        assert_eq!(link.sequence, 0);
        assert_eq!(link.previous_hash, None);
        assert_eq!(link.chain_hash, hash_audit_entry(&e, None).unwrap());
        assert_eq!(chain.head(), Some(link.chain_hash.as_str()));
    }

    #[test]
    fn test_links_reference_previous_head() {
        let mut chain = AuditChain::new(OrgId::new("org-a").unwrap());
        let first = chain.append(&entry("org-a", 0)).unwrap();
        let second = chain.append(&entry("org-a", 1)).unwrap();
        assert_eq!(second.sequence, 1);
        assert_eq!(second.previous_hash.as_deref(), Some(first.chain_hash.as_str()));
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_cross_tenant_rejected_and_head_unchanged() {
        let mut chain = AuditChain::new(OrgId::new("org-a").unwrap());
        chain.append(&entry("org-a", 0)).unwrap();
        let head = chain.head().map(str::to_string);
        let err = chain.append(&entry("org-b", 1)).unwrap_err();
        assert!(matches!(err, AuditError::CrossTenant { .. }));
        assert_eq!(chain.head().map(str::to_string), head);
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_resume_continues_chain() {
        let (entries, hashes) = build("org-a", 3);
        let mut resumed = AuditChain::resume(OrgId::new("org-a").unwrap(), hashes[1].clone(), 2);
        let link = resumed.append(&entries[2]).unwrap();
        assert_eq!(link.chain_hash, hashes[2]);
        assert_eq!(link.sequence, 2);
    }

    #[test]
    fn test_verify_intact_chain() {
        let (entries, hashes) = build("org-a", 5);
        assert!(verify_chain(&entries, &hashes).is_ok());
        assert!(verify_chain(&[], &[]).is_ok());
    }

    #[test]
    fn test_verify_length_mismatch() {
        let (entries, mut hashes) = build("org-a", 3);
        hashes.pop();
        assert!(matches!(
            verify_chain(&entries, &hashes),
            Err(ChainError::LengthMismatch { entries: 3, hashes: 2 })
        ));
    }

    #[test]
    fn test_verify_detects_reorder() {
        let (mut entries, hashes) = build("org-a", 4);
        entries.swap(1, 2);
        let err = verify_chain(&entries, &hashes).unwrap_err();
        assert_eq!(err.index(), Some(1));
    }

    #[test]
    fn test_verify_detects_mixed_orgs() {
        let (mut entries, hashes) = build("org-a", 3);
        entries[2] = entry("org-b", 2);
        let err = verify_chain(&entries, &hashes).unwrap_err();
        assert!(matches!(err, ChainError::MixedOrgs { index: 2, .. }));
    }

    #[test]
    fn test_verify_chained_pairs() {
        let (entries, hashes) = build("org-a", 3);
        let chained: Vec<_> = entries
            .into_iter()
            .zip(hashes)
            .map(|(entry, chain_hash)| ChainedEntry { entry, chain_hash })
            .collect();
        assert!(verify_chained(&chained).is_ok());
    }
}
