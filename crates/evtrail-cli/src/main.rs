//! # evtrail CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use evtrail_cli::chain::{run_verify_chain, VerifyChainArgs};
use evtrail_cli::pack::{
    run_pack_id, run_policy, run_seal_index, run_validate_pack, PackIdArgs, PolicyArgs,
    SealIndexArgs, ValidatePackArgs,
};
use evtrail_cli::transitions::{run_transitions, TransitionsArgs};
use evtrail_evidence::EvidenceConfig;

/// evtrail: offline verification of audit chains and evidence packs.
#[derive(Parser, Debug)]
#[command(name = "evtrail", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when `RUST_LOG` is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a stored audit chain and report the first break.
    VerifyChain(VerifyChainArgs),

    /// List every structural violation of an evidence pack.
    ValidatePack(ValidatePackArgs),

    /// Print the index an evidence pack would be sealed with.
    SealIndex(SealIndexArgs),

    /// Show the declared transitions of an entity type.
    Transitions(TransitionsArgs),

    /// Generate a pack id (`EVTRAIL_PACK_PREFIX`, `EVTRAIL_PACK_ID_SCHEME`).
    PackId(PackIdArgs),

    /// Show the control policy for an entity type (`EVTRAIL_STRICT_POLICY`).
    Policy(PolicyArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "evtrail starting");

    match dispatch(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn dispatch(command: Commands) -> anyhow::Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match command {
        Commands::VerifyChain(args) => run_verify_chain(&args, &mut out),
        Commands::ValidatePack(args) => run_validate_pack(&args, &mut out),
        Commands::SealIndex(args) => run_seal_index(&args, &mut out),
        Commands::Transitions(args) => run_transitions(&args, &mut out),
        Commands::PackId(args) => {
            let config = EvidenceConfig::from_env().context("invalid evidence configuration")?;
            run_pack_id(&args, &config, &mut out)
        }
        Commands::Policy(args) => {
            let config = EvidenceConfig::from_env().context("invalid evidence configuration")?;
            run_policy(&args, &config, &mut out)
        }
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
