//! # evtrail-cli: Verification Tooling
//!
//! Provides the `evtrail` command-line interface for inspecting stored
//! audit chains and evidence packs offline.
//!
//! ## Subcommands
//!
//! - `evtrail verify-chain`: replay a stored audit chain.
//! - `evtrail validate-pack`: list every structural violation of a pack.
//! - `evtrail seal-index`: print the index a pack would be sealed with.
//! - `evtrail transitions`: show the declared transitions of an entity type.
//! - `evtrail pack-id`: generate a pack id with the configured scheme.
//! - `evtrail policy`: show the control policy for an entity type.
//!
//! ```bash
//! evtrail verify-chain --file chain.json
//! evtrail validate-pack --file pack.yaml
//! evtrail transitions --entity-type shipment --state arrived
//! ```
//!
//! Handlers parse input, delegate to the library crates and render the
//! result. They return the process exit code: 0 on success, 1 when the
//! input was read but failed a check.

pub mod chain;
pub mod pack;
pub mod transitions;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read a JSON or YAML document. Files ending in `.yaml`/`.yml` are parsed
/// as YAML, everything else as JSON.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_reads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("doc.json");
        let yaml = dir.path().join("doc.yml");
        std::fs::write(&json, r#"{"a": "x"}"#).unwrap();
        std::fs::write(&yaml, "a: x\n").unwrap();

        let from_json: BTreeMap<String, String> = read_document(&json).unwrap();
        let from_yaml: BTreeMap<String, String> = read_document(&yaml).unwrap();
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = read_document::<BTreeMap<String, String>>(Path::new("/nonexistent/x.json"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/x.json"));
    }
}
