//! # SHA-256 Digests
//!
//! Entry hashes and chain hashes are lowercase hex SHA-256 over
//! [`CanonicalBytes`]. The functions here take `&CanonicalBytes` rather than
//! `&[u8]`, so a digest can only be computed over canonical JSON.
//!
//! Artifact hashes are different: they digest external files the core never
//! sees, so the core can only check their shape ([`is_sha256_hex`]).

use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A raw SHA-256 output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    /// The 32 digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        use std::fmt::Write;

        self.0.iter().fold(String::with_capacity(64), |mut acc, b| {
            let _ = write!(acc, "{b:02x}");
            acc
        })
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// SHA-256 of canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> Sha256Digest {
    Sha256Digest(Sha256::digest(data.as_bytes()).into())
}

/// SHA-256 of canonical bytes as lowercase hex.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

/// Whether `s` has the shape of a hex SHA-256 digest (64 hex characters,
/// either case).
pub fn is_sha256_hex(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_vector() {
        let cb = CanonicalBytes::new(&json!({})).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_hex_is_lowercase_and_display_matches() {
        let cb = CanonicalBytes::new(&json!({"orgId": "org-1"})).unwrap();
        let d = sha256_digest(&cb);
        let hex = d.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(!hex.bytes().any(|b| b.is_ascii_uppercase()));
        assert_eq!(d.to_string(), hex);
        assert_eq!(d.as_bytes().len(), 32);
    }

    #[test]
    fn test_key_order_does_not_change_digest() {
        let a = CanonicalBytes::new(&json!({"a": 1, "b": 2})).unwrap();
        let b = CanonicalBytes::new(&json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(sha256_digest(&a), sha256_digest(&b));
        let c = CanonicalBytes::new(&json!({"a": 1, "b": 3})).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&c));
    }

    #[test]
    fn test_artifact_hash_shape() {
        assert!(is_sha256_hex(&"a".repeat(64)));
        assert!(is_sha256_hex(&"A".repeat(64)));
        assert!(!is_sha256_hex(&"a".repeat(63)));
        assert!(!is_sha256_hex(&"g".repeat(64)));
        assert!(!is_sha256_hex(""));
    }
}
