//! # Evidence Pack Subcommands
//!
//! `validate-pack`, `seal-index`, `pack-id` and `policy`. The last two read
//! their settings from [`EvidenceConfig`] (see `EVTRAIL_*` variables).

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use evtrail_core::Timestamp;
use evtrail_evidence::{
    to_sealable_index, validate_document, EvidenceConfig, EvidencePackBuilder, PackDocument,
};

/// Arguments for `evtrail validate-pack`.
#[derive(Args, Debug)]
pub struct ValidatePackArgs {
    /// Pack file (JSON or YAML, camelCase keys).
    #[arg(long)]
    pub file: PathBuf,
}

/// Arguments for `evtrail seal-index`.
#[derive(Args, Debug)]
pub struct SealIndexArgs {
    /// Pack file (JSON or YAML, camelCase keys).
    #[arg(long)]
    pub file: PathBuf,
}

/// Arguments for `evtrail pack-id`.
#[derive(Args, Debug)]
pub struct PackIdArgs {
    /// Entity type, e.g. `quote`.
    #[arg(long)]
    pub entity_type: String,

    /// Entity id.
    #[arg(long)]
    pub entity_id: String,

    /// Creation time (RFC 3339). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Arguments for `evtrail policy`.
#[derive(Args, Debug)]
pub struct PolicyArgs {
    /// Entity type, e.g. `invoice`.
    #[arg(long)]
    pub entity_type: String,
}

/// Execute validate-pack.
///
/// The file is read leniently, so missing keys and non-positive sizes are
/// listed with the other violations.
///
/// Returns exit code: 0 if the pack is valid, 1 otherwise.
pub fn run_validate_pack(args: &ValidatePackArgs, out: &mut dyn Write) -> Result<u8> {
    let doc: PackDocument = crate::read_document(&args.file)?;
    let violations = validate_document(&doc);
    let pack_id = doc.pack_id.as_deref().unwrap_or("(no packId)");
    if violations.is_empty() {
        writeln!(out, "OK: pack {pack_id} is valid")?;
        return Ok(0);
    }
    writeln!(out, "INVALID: pack {pack_id} has {} violation(s)", violations.len())?;
    for v in &violations {
        writeln!(out, "  - {v}")?;
    }
    Ok(1)
}

/// Execute seal-index: print the sealable projection as pretty JSON.
///
/// An invalid pack is an error; nothing is printed for it.
pub fn run_seal_index(args: &SealIndexArgs, out: &mut dyn Write) -> Result<u8> {
    let doc: PackDocument = crate::read_document(&args.file)?;
    let pack = doc
        .into_meta()
        .with_context(|| format!("{} is not a valid pack", args.file.display()))?;
    let index = to_sealable_index(&pack);
    let json = serde_json::to_string_pretty(&index).context("failed to render sealable index")?;
    writeln!(out, "{json}")?;
    Ok(0)
}

/// Execute pack-id.
pub fn run_pack_id(args: &PackIdArgs, config: &EvidenceConfig, out: &mut dyn Write) -> Result<u8> {
    let at = match &args.at {
        Some(raw) => Timestamp::parse_lenient(raw)
            .with_context(|| format!("invalid --at value {raw:?}"))?,
        None => Timestamp::now(),
    };
    let builder = EvidencePackBuilder::new(config.clone());
    writeln!(
        out,
        "{}",
        builder.generate_pack_id(&args.entity_type, &args.entity_id, at)
    )?;
    Ok(0)
}

/// Execute policy: print the resolved classification as pretty JSON.
///
/// With strict policy enabled an unknown entity type is an error.
pub fn run_policy(args: &PolicyArgs, config: &EvidenceConfig, out: &mut dyn Write) -> Result<u8> {
    let builder = EvidencePackBuilder::new(config.clone());
    let policy = builder.policy_for(&args.entity_type)?;
    let json = serde_json::to_string_pretty(policy).context("failed to render policy")?;
    writeln!(out, "{json}")?;
    Ok(0)
}
