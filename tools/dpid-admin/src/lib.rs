//! dpid-admin library: CLI definitions and handlers.
//!
//! A command log is JSON Lines, one `{"caller": "0x..", "command": {...}}`
//! object per line. Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dpid_registry::domain::{is_reserved_prefix, validate_prefix};
use dpid_registry::{
    Command, CommandResult, ErrorKind, InMemoryTokenLedger, InMemoryTreasury, Principal,
    RecordedEvent, RegistryConfig, RegistryService,
};

/// dPID Registry admin tool
#[derive(Parser, Debug)]
#[command(name = "dpid-admin")]
#[command(version)]
#[command(about = "Replay command logs and check prefixes for the dPID registry")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON Lines command log against a fresh registry
    Replay {
        /// Command log to replay
        #[arg(short, long)]
        log: PathBuf,

        /// Initialize with this administrator before replaying
        #[arg(long)]
        admin: Option<Principal>,

        /// First minted dPID (overrides DPID_FIRST_DPID)
        #[arg(long)]
        first_dpid: Option<u64>,

        /// Namespace fee (overrides DPID_NAMESPACE_FEE)
        #[arg(long)]
        namespace_fee: Option<u64>,

        /// Entry fee (overrides DPID_ENTRY_FEE)
        #[arg(long)]
        entry_fee: Option<u64>,

        /// Stop at the first rejected command
        #[arg(long)]
        fail_fast: bool,
    },

    /// Check a namespace prefix against the charset and reservation rules
    ValidatePrefix {
        /// Prefix to check
        prefix: String,
    },
}

/// One line of a command log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    /// Principal issuing the command.
    pub caller: Principal,
    /// Command to apply.
    pub command: Command,
}

/// Rejection as printed in replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Error kind.
    pub kind: ErrorKind,
    /// Human-readable reason.
    pub message: String,
}

/// Outcome of one replayed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineOutcome {
    /// 1-based line number in the log.
    pub line: usize,
    /// Operation name.
    pub op: &'static str,
    /// Result when committed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<CommandResult>,
    /// Reason when rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Rejection>,
}

/// Result of a full replay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Per-line outcomes in log order.
    pub outcomes: Vec<LineOutcome>,
    /// Lines that committed.
    pub applied: usize,
    /// Lines that were rejected.
    pub rejected: usize,
}

/// Replay every command in `input` against `service`.
///
/// Malformed lines abort the replay; rejected commands are recorded and,
/// unless `fail_fast` is set, replay continues.
pub async fn replay(
    service: &RegistryService,
    input: impl BufRead,
    fail_fast: bool,
) -> anyhow::Result<ReplayReport> {
    let mut report = ReplayReport::default();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let raw = raw.with_context(|| format!("reading line {line}"))?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let entry: LogLine = serde_json::from_str(trimmed)
            .with_context(|| format!("malformed command on line {line}"))?;
        let op = entry.command.name();
        debug!(line, op, caller = %entry.caller, "Replaying command");

        match service.submit(entry.caller, entry.command).await {
            Ok(result) => {
                report.applied += 1;
                report.outcomes.push(LineOutcome {
                    line,
                    op,
                    result: Some(result),
                    error: None,
                });
            }
            Err(err) => {
                report.rejected += 1;
                report.outcomes.push(LineOutcome {
                    line,
                    op,
                    result: None,
                    error: Some(Rejection {
                        kind: err.kind(),
                        message: err.to_string(),
                    }),
                });
                if fail_fast {
                    bail!("line {line} ({op}) rejected: {err}");
                }
            }
        }
    }

    info!(
        applied = report.applied,
        rejected = report.rejected,
        "Replay finished"
    );
    Ok(report)
}

/// Execute a parsed CLI invocation, writing results to `out`.
pub async fn run(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    match cli.command {
        Commands::Replay {
            log,
            admin,
            first_dpid,
            namespace_fee,
            entry_fee,
            fail_fast,
        } => {
            let mut config = RegistryConfig::from_env();
            if let Some(first_dpid) = first_dpid {
                config.first_dpid = first_dpid;
            }
            if let Some(fee) = namespace_fee {
                config.namespace_fee = fee;
            }
            if let Some(fee) = entry_fee {
                config.entry_fee = fee;
            }

            let service = build_service(config, admin).await?;
            let file =
                File::open(&log).with_context(|| format!("opening {}", log.display()))?;
            let report = replay(&service, BufReader::new(file), fail_fast).await?;

            for outcome in &report.outcomes {
                writeln!(out, "{}", serde_json::to_string(outcome)?)?;
            }
            let events: Vec<RecordedEvent> = service.events_since(0);
            writeln!(out, "{}", serde_json::to_string_pretty(&events)?)?;
            Ok(())
        }
        Commands::ValidatePrefix { prefix } => {
            validate_prefix(&prefix).with_context(|| format!("prefix {prefix:?} rejected"))?;
            if is_reserved_prefix(&prefix) {
                writeln!(out, "{prefix:?}: valid, reserved for the administrator")?;
            } else {
                writeln!(out, "{prefix:?}: valid")?;
            }
            Ok(())
        }
    }
}

async fn build_service(
    config: RegistryConfig,
    admin: Option<Principal>,
) -> anyhow::Result<RegistryService> {
    let oracle = Arc::new(InMemoryTokenLedger::new());
    let treasury = Arc::new(InMemoryTreasury::new());
    match admin {
        Some(admin) => RegistryService::bootstrap(config, admin, oracle, treasury)
            .await
            .context("initializing registry"),
        None => Ok(RegistryService::new(config, oracle, treasury)),
    }
}
