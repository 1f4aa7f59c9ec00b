//! # Pack Identifiers
//!
//! ```text
//! {PREFIX}-{ENTITYTYPE}-{YYYYMMDD}-{suffix}
//! COM-QUOTE-20260115-0001
//! ```
//!
//! The suffix comes from an injected [`PackIdStrategy`]:
//!
//! - [`CounterPackIds`]: one atomic counter shared by every entity type,
//!   zero-padded to four digits. Ids sort by creation order within a
//!   process and a day, but repeat across processes and restarts.
//! - [`RandomPackIds`]: eight hex characters from a UUID v4. Unique across
//!   processes; no ordering within a day.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use evtrail_core::Timestamp;

/// Source of pack-id suffixes.
pub trait PackIdStrategy: Send + Sync + std::fmt::Debug {
    /// Produce the next id for a pack about `entity_type`/`entity_id`.
    fn next_id(&self, prefix: &str, entity_type: &str, entity_id: &str, at: Timestamp) -> String;
}

/// Process-local monotonic counter.
#[derive(Debug, Default)]
pub struct CounterPackIds {
    counter: AtomicU64,
}

impl CounterPackIds {
    /// A counter whose next id ends in `0001`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart numbering at `0001`.
    pub fn reset(&self) {
        self.counter.store(0, Ordering::SeqCst);
    }
}

impl PackIdStrategy for CounterPackIds {
    fn next_id(&self, prefix: &str, entity_type: &str, _entity_id: &str, at: Timestamp) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        format_id(prefix, entity_type, at, &format!("{n:04}"))
    }
}

/// Collision-resistant random suffixes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPackIds;

impl PackIdStrategy for RandomPackIds {
    fn next_id(&self, prefix: &str, entity_type: &str, _entity_id: &str, at: Timestamp) -> String {
        let uuid = Uuid::new_v4().simple().to_string();
        format_id(prefix, entity_type, at, &uuid[..8])
    }
}

fn format_id(prefix: &str, entity_type: &str, at: Timestamp, suffix: &str) -> String {
    format!(
        "{prefix}-{}-{}-{suffix}",
        entity_type.to_ascii_uppercase(),
        at.compact_date()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn jan15() -> Timestamp {
        Timestamp::parse("2026-01-15T10:00:00Z").unwrap()
    }

    #[test]
    fn test_counter_format_and_sequence() {
        let ids = CounterPackIds::new();
        assert_eq!(ids.next_id("COM", "quote", "q-1", jan15()), "COM-QUOTE-20260115-0001");
        assert_eq!(ids.next_id("COM", "invoice", "i-1", jan15()), "COM-INVOICE-20260115-0002");
    }

    #[test]
    fn test_counter_reset() {
        let ids = CounterPackIds::new();
        ids.next_id("COM", "quote", "q-1", jan15());
        ids.next_id("COM", "quote", "q-2", jan15());
        ids.reset();
        assert_eq!(ids.next_id("COM", "quote", "q-3", jan15()), "COM-QUOTE-20260115-0001");
    }

    #[test]
    fn test_counter_sortable_within_day() {
        let ids = CounterPackIds::new();
        let generated: Vec<_> = (0..50)
            .map(|i| ids.next_id("AGRI", "lot", &format!("lot-{i}"), jan15()))
            .collect();
        let mut sorted = generated.clone();
        sorted.sort();
        assert_eq!(generated, sorted);
    }

    #[test]
    fn test_counter_unique_under_concurrency() {
        let ids = Arc::new(CounterPackIds::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|_| ids.next_id("COM", "order", "o-1", jan15()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let all: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        assert_eq!(all.len(), 800);
    }

    #[test]
    fn test_random_suffix_shape() {
        let id = RandomPackIds.next_id("COM", "quote", "q-1", jan15());
        let suffix = id.strip_prefix("COM-QUOTE-20260115-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
