//! Interactive multi-transport launcher.
//!
//! Accepts explicit transport/host/port/path/log-level parameters, logs a
//! startup banner to the diagnostic channel, and keeps the startup health
//! check enabled.

use clap::Parser;
use notemcp::args::{LevelArg, TransportArg};
use notemcp::{Launcher, LauncherProfile};
use notemcp_core::{LaunchOutcome, TransportKind, TransportSpec};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "notemcp",
    version,
    about = "MCP server bridging the notes application's API"
)]
struct Cli {
    /// Configuration file path (default: notemcp.json if present,
    /// otherwise auto-discovery)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Wire transport to serve MCP over
    #[arg(short = 't', long, value_enum, default_value = "stdio")]
    transport: TransportArg,

    /// Bind address for HTTP-based transports
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Bind port for HTTP-based transports
    #[arg(short = 'p', long, default_value_t = 8000)]
    port: u16,

    /// Mount path for HTTP-based transports
    #[arg(long, default_value = "/mcp")]
    path: String,

    /// Diagnostic verbosity
    #[arg(long, value_enum, default_value = "info")]
    log_level: LevelArg,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let transport = match TransportSpec::builder()
        .kind(TransportKind::from(cli.transport))
        .host(cli.host)
        .port(cli.port)
        .path(cli.path)
        .build()
    {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("notemcp: invalid transport parameters: {e}");
            return ExitCode::FAILURE;
        }
    };

    let launcher = Launcher::new(
        LauncherProfile::interactive(),
        transport,
        cli.config,
        cli.log_level.into(),
    );
    let outcome = launcher.launch().await;

    if let LaunchOutcome::Failed(e) = &outcome {
        eprintln!("notemcp: {e}");
    }
    ExitCode::from(outcome.exit_code() as u8)
}
