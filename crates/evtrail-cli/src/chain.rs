//! # Verify-Chain Subcommand
//!
//! Replays a stored audit chain: a list of `{entry, chainHash}` records in
//! append order, as JSON or YAML.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use evtrail_audit::{verify_chained, ChainedEntry};

/// Arguments for `evtrail verify-chain`.
#[derive(Args, Debug)]
pub struct VerifyChainArgs {
    /// Chain file (`[{entry, chainHash}]`).
    #[arg(long)]
    pub file: PathBuf,
}

/// Execute the verify-chain subcommand.
///
/// Returns exit code: 0 if every link verifies, 1 on the first break.
pub fn run_verify_chain(args: &VerifyChainArgs, out: &mut dyn Write) -> Result<u8> {
    let chain: Vec<ChainedEntry> = crate::read_document(&args.file)?;

    match verify_chained(&chain) {
        Ok(()) => {
            let head = chain.last().map(|c| c.chain_hash.as_str()).unwrap_or("-");
            writeln!(out, "OK: {} entries verified, head {head}", chain.len())?;
            Ok(0)
        }
        Err(e) => {
            writeln!(out, "BROKEN: {e}")?;
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evtrail_audit::{build_action_audit_entry_at, ActionAuditInput, AuditChain};
    use evtrail_core::{OrgId, Timestamp};

    fn write_chain(dir: &std::path::Path, tamper: bool) -> PathBuf {
        let mut chain = AuditChain::new(OrgId::new("org-1").unwrap());
        let mut records = Vec::new();
        for i in 0..3 {
            let entry = build_action_audit_entry_at(
                ActionAuditInput {
                    id: Some(format!("aud-{i}")),
                    org_id: "org-1".to_string(),
                    actor_id: "user-1".to_string(),
                    role: "clerk".to_string(),
                    entity_type: "quote".to_string(),
                    target_entity_id: "q-1".to_string(),
                    action: "quote.send".to_string(),
                    ..Default::default()
                },
                Timestamp::parse("2026-01-15T10:00:00Z").unwrap(),
            )
            .unwrap();
            let link = chain.append(&entry).unwrap();
            records.push(ChainedEntry {
                entry,
                chain_hash: link.chain_hash,
            });
        }
        if tamper {
            records.swap(0, 2);
        }
        let path = dir.join("chain.json");
        std::fs::write(&path, serde_json::to_string_pretty(&records).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_intact_chain_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let args = VerifyChainArgs {
            file: write_chain(dir.path(), false),
        };
        let mut out = Vec::new();
        assert_eq!(run_verify_chain(&args, &mut out).unwrap(), 0);
        assert!(String::from_utf8(out).unwrap().starts_with("OK: 3 entries"));
    }

    #[test]
    fn test_reordered_chain_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let args = VerifyChainArgs {
            file: write_chain(dir.path(), true),
        };
        let mut out = Vec::new();
        assert_eq!(run_verify_chain(&args, &mut out).unwrap(), 1);
        assert!(String::from_utf8(out).unwrap().contains("BROKEN"));
    }
}
