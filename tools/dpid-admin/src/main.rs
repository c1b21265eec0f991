//! dpid-admin: dPID Registry admin tool
//!
//! Usage:
//!   dpid-admin replay --log commands.jsonl   - Replay a command log
//!   dpid-admin validate-prefix <prefix>      - Check a namespace prefix

use clap::Parser;
use dpid_admin::{run, Cli};
use registry_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut telemetry = TelemetryConfig::from_env().with_service_name("dpid-admin");
    if cli.verbose {
        telemetry = telemetry.with_log_level("debug");
    }
    init_telemetry(&telemetry)?;

    let mut stdout = std::io::stdout().lock();
    run(cli, &mut stdout).await
}
