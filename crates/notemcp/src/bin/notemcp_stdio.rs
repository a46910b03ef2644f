//! Hardened single-consumer stdio launcher.
//!
//! Guarantees the standard output stream carries nothing but protocol
//! frames from the first instant of process life: diagnostics go to a
//! log file next to the configuration file, pre-sink failures to the
//! error stream. The configuration file must exist; there is no
//! auto-discovery and no startup ping.

use clap::Parser;
use notemcp::args::LevelArg;
use notemcp::{Launcher, LauncherProfile};
use notemcp_core::{LaunchOutcome, TransportSpec};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "notemcp-stdio",
    version,
    about = "Hardened stdio launcher for the notes MCP server"
)]
struct Cli {
    /// Configuration file (required to exist; no auto-discovery)
    #[arg(short = 'c', long, default_value = "notemcp.json")]
    config: PathBuf,

    /// Diagnostic verbosity for the colocated log file
    #[arg(long, value_enum, default_value = "info")]
    log_level: LevelArg,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let launcher = Launcher::new(
        LauncherProfile::hardened(),
        TransportSpec::default(),
        Some(cli.config),
        cli.log_level.into(),
    );
    let outcome = launcher.launch().await;

    if let LaunchOutcome::Failed(e) = &outcome {
        eprintln!("notemcp-stdio: {e}");
    }
    ExitCode::from(outcome.exit_code() as u8)
}
