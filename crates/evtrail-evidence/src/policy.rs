//! # Control Policy Table
//!
//! Classifies a pack by the entity type it documents: which control family
//! it evidences, how long it must be retained, which controls it covers
//! and what event type it records.
//!
//! | entity type   | family        | retention  |
//! |---------------|---------------|------------|
//! | `quote`       | `change-mgmt` | `7_YEARS`  |
//! | `order`       | `change-mgmt` | `7_YEARS`  |
//! | `invoice`     | `integrity`   | `7_YEARS`  |
//! | `fulfillment` | `integrity`   | `3_YEARS`  |
//! | `lot`         | `integrity`   | `10_YEARS` |
//! | `shipment`    | `integrity`   | `7_YEARS`  |
//!
//! Anything else resolves to `integrity` / `7_YEARS` with no controls,
//! unless resolved strictly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EvidenceError;

/// Family of controls a pack provides evidence for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlFamily {
    /// Changes to commercial commitments.
    #[serde(rename = "change-mgmt")]
    ChangeManagement,
    /// Accuracy and completeness of processed records.
    #[serde(rename = "integrity")]
    Integrity,
}

impl ControlFamily {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChangeManagement => "change-mgmt",
            Self::Integrity => "integrity",
        }
    }
}

impl std::fmt::Display for ControlFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum retention period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RetentionClass {
    /// Three years.
    #[serde(rename = "3_YEARS")]
    ThreeYears,
    /// Seven years.
    #[serde(rename = "7_YEARS")]
    SevenYears,
    /// Ten years.
    #[serde(rename = "10_YEARS")]
    TenYears,
}

impl RetentionClass {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ThreeYears => "3_YEARS",
            Self::SevenYears => "7_YEARS",
            Self::TenYears => "10_YEARS",
        }
    }

    /// Length of the period in years.
    pub fn years(&self) -> u32 {
        match self {
            Self::ThreeYears => 3,
            Self::SevenYears => 7,
            Self::TenYears => 10,
        }
    }
}

impl std::fmt::Display for RetentionClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification applied to every pack of one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlPolicy {
    /// Control family.
    pub control_family: ControlFamily,
    /// Event type recorded in the pack.
    pub event_type: String,
    /// Retention period.
    pub retention_class: RetentionClass,
    /// Control identifiers evidenced.
    pub controls_covered: Vec<String>,
}

impl ControlPolicy {
    /// A policy with no controls.
    pub fn new(
        control_family: ControlFamily,
        event_type: impl Into<String>,
        retention_class: RetentionClass,
    ) -> Self {
        Self {
            control_family,
            event_type: event_type.into(),
            retention_class,
            controls_covered: Vec::new(),
        }
    }

    /// Add covered controls.
    pub fn covering<I, S>(mut self, controls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.controls_covered
            .extend(controls.into_iter().map(Into::into));
        self
    }

    /// Policy used for unrecognized entity types.
    pub fn fallback() -> Self {
        Self::new(
            ControlFamily::Integrity,
            "evidence.recorded",
            RetentionClass::SevenYears,
        )
    }
}

/// Entity type → control policy.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<String, ControlPolicy>,
    fallback: ControlPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl PolicyTable {
    /// A table with no entries; everything resolves to the fallback.
    pub fn empty() -> Self {
        Self {
            policies: HashMap::new(),
            fallback: ControlPolicy::fallback(),
        }
    }

    /// The reference table for commerce and agri entity types.
    pub fn standard() -> Self {
        use ControlFamily::*;
        use RetentionClass::*;

        Self::empty()
            .with_policy(
                "quote",
                ControlPolicy::new(ChangeManagement, "quote.converted", SevenYears)
                    .covering(["CC8.1"]),
            )
            .with_policy(
                "order",
                ControlPolicy::new(ChangeManagement, "order.closed", SevenYears)
                    .covering(["CC8.1", "PI1.3"]),
            )
            .with_policy(
                "invoice",
                ControlPolicy::new(Integrity, "invoice.paid", SevenYears)
                    .covering(["PI1.4", "PI1.5"]),
            )
            .with_policy(
                "fulfillment",
                ControlPolicy::new(Integrity, "fulfillment.completed", ThreeYears)
                    .covering(["PI1.3"]),
            )
            .with_policy(
                "lot",
                ControlPolicy::new(Integrity, "lot.certified", TenYears)
                    .covering(["PI1.2", "PI1.4"]),
            )
            .with_policy(
                "shipment",
                ControlPolicy::new(Integrity, "shipment.closed", SevenYears)
                    .covering(["PI1.3", "PI1.5"]),
            )
    }

    /// Add or replace the policy for an entity type.
    pub fn with_policy(mut self, entity_type: impl Into<String>, policy: ControlPolicy) -> Self {
        self.policies.insert(entity_type.into(), policy);
        self
    }

    /// Replace the fallback policy.
    pub fn with_fallback(mut self, policy: ControlPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// Policy for `entity_type`, or the fallback.
    pub fn resolve(&self, entity_type: &str) -> &ControlPolicy {
        match self.policies.get(entity_type) {
            Some(policy) => policy,
            None => {
                tracing::warn!(
                    entity_type,
                    control_family = %self.fallback.control_family,
                    retention_class = %self.fallback.retention_class,
                    "no control policy for entity type, using fallback"
                );
                &self.fallback
            }
        }
    }

    /// Policy for `entity_type`; unknown types are an error.
    pub fn resolve_strict(&self, entity_type: &str) -> Result<&ControlPolicy, EvidenceError> {
        self.policies
            .get(entity_type)
            .ok_or_else(|| EvidenceError::UnknownEntityType {
                entity_type: entity_type.to_string(),
            })
    }

    /// Whether the table has an explicit entry.
    pub fn contains(&self, entity_type: &str) -> bool {
        self.policies.contains_key(entity_type)
    }

    /// Entity types with an explicit entry, sorted.
    pub fn entity_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.policies.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_classifications() {
        let t = PolicyTable::standard();
        let quote = t.resolve("quote");
        assert_eq!(quote.control_family, ControlFamily::ChangeManagement);
        assert_eq!(quote.retention_class, RetentionClass::SevenYears);

        let invoice = t.resolve("invoice");
        assert_eq!(invoice.control_family, ControlFamily::Integrity);
        assert_eq!(invoice.retention_class, RetentionClass::SevenYears);

        let fulfillment = t.resolve("fulfillment");
        assert_eq!(fulfillment.control_family, ControlFamily::Integrity);
        assert_eq!(fulfillment.retention_class, RetentionClass::ThreeYears);
    }

    #[test]
    fn test_unknown_falls_back() {
        let t = PolicyTable::standard();
        let p = t.resolve("pallet");
        assert_eq!(p.control_family, ControlFamily::Integrity);
        assert_eq!(p.retention_class, RetentionClass::SevenYears);
        assert!(p.controls_covered.is_empty());
    }

    #[test]
    fn test_strict_rejects_unknown() {
        let t = PolicyTable::standard();
        assert!(t.resolve_strict("quote").is_ok());
        assert!(matches!(
            t.resolve_strict("pallet"),
            Err(EvidenceError::UnknownEntityType { entity_type }) if entity_type == "pallet"
        ));
    }

    #[test]
    fn test_with_policy_overrides() {
        let t = PolicyTable::standard().with_policy(
            "quote",
            ControlPolicy::new(ControlFamily::Integrity, "quote.sent", RetentionClass::ThreeYears),
        );
        assert_eq!(t.resolve("quote").retention_class, RetentionClass::ThreeYears);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(
            serde_json::to_string(&ControlFamily::ChangeManagement).unwrap(),
            "\"change-mgmt\""
        );
        assert_eq!(
            serde_json::to_string(&RetentionClass::TenYears).unwrap(),
            "\"10_YEARS\""
        );
        let back: RetentionClass = serde_json::from_str("\"3_YEARS\"").unwrap();
        assert_eq!(back.years(), 3);
    }

    #[test]
    fn test_standard_entity_types() {
        assert_eq!(
            PolicyTable::standard().entity_types(),
            vec!["fulfillment", "invoice", "lot", "order", "quote", "shipment"]
        );
    }
}
