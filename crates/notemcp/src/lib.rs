//! notemcp - launcher profiles and composition roots for the notes MCP
//! server bootstrap.
//!
//! Two deployment profiles share one engine: the interactive launcher
//! (multi-transport, auto-discovery, startup health check) and the
//! hardened stdio launcher (config file mandatory, working directory
//! pinned, diagnostics diverted to a file before the first protocol
//! frame).

pub mod args;

use notemcp_core::{
    BootstrapError, ConfigError, LaunchOutcome, LogLevel, LogSink, NoteApiClient, NoteMcpHandler,
    ServerConfig, Supervisor, TransportSpec,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Fixed log filename used when a profile pins the working directory.
pub const LOG_FILENAME: &str = "notemcp.log";

/// Deployment profile: the strictness knobs that distinguish the
/// interactive launcher from the hardened stdio launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherProfile {
    /// Fail with `NoConfigFound` instead of falling back to defaults.
    pub require_config: bool,
    /// Skip the startup ping against the notes API.
    pub skip_health_check: bool,
    /// chdir to the configuration file's directory before anything else.
    pub pin_working_directory: bool,
    /// Divert diagnostics to this file instead of the error stream.
    pub log_file: Option<PathBuf>,
    /// Log a human-readable startup banner to the diagnostic sink.
    pub banner: bool,
}

impl LauncherProfile {
    /// Interactive/multi-transport profile: auto-discovery allowed,
    /// health check on, banner on.
    pub fn interactive() -> Self {
        Self {
            require_config: false,
            skip_health_check: false,
            pin_working_directory: false,
            log_file: None,
            banner: true,
        }
    }

    /// Hardened single-consumer stdio profile: config file mandatory,
    /// working directory pinned next to it, diagnostics to a colocated
    /// file, no startup ping.
    pub fn hardened() -> Self {
        Self {
            require_config: true,
            skip_health_check: true,
            pin_working_directory: true,
            log_file: None,
            banner: false,
        }
    }
}

/// One fully parameterized launch of the server process.
pub struct Launcher {
    profile: LauncherProfile,
    transport: TransportSpec,
    config_path: Option<PathBuf>,
    log_level: LogLevel,
}

impl Launcher {
    pub fn new(
        profile: LauncherProfile,
        transport: TransportSpec,
        config_path: Option<PathBuf>,
        log_level: LogLevel,
    ) -> Self {
        Self {
            profile,
            transport,
            config_path,
            log_level,
        }
    }

    /// Bring the server up and block until it stops. Every failure mode
    /// collapses into the outcome so the exit-code mapping stays
    /// exhaustive at the call site.
    pub async fn launch(self) -> LaunchOutcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(e) => {
                // The sink may or may not exist yet; tracing is a no-op
                // before establishment and the binaries echo the failure
                // to the error stream either way.
                error!(error = %e, "launch failed");
                LaunchOutcome::Failed(e)
            }
        }
    }

    async fn run(self) -> Result<LaunchOutcome, BootstrapError> {
        let (config_path, log_file) = self.pin_if_requested()?;

        let config = ServerConfig::resolve(config_path.as_deref(), self.profile.require_config)?;
        let sink = LogSink::establish(self.transport.kind, self.log_level, log_file)?;

        if self.profile.banner {
            info!(
                transport = %self.transport.kind,
                api_host = %config.host,
                api_port = config.port,
                destination = ?sink.destination(),
                "starting notemcp server"
            );
        }

        let listener = self.transport.bind()?;

        if !self.profile.skip_health_check {
            NoteApiClient::new(&config)?.ping().await?;
        }

        let handler = NoteMcpHandler::new(config);
        Ok(Supervisor::new().run(handler, listener).await)
    }

    /// For pinned profiles: canonicalize the config path, chdir next to
    /// it, and pick the colocated log file unless one was given
    /// explicitly.
    fn pin_if_requested(&self) -> Result<(Option<PathBuf>, Option<PathBuf>), BootstrapError> {
        if !self.profile.pin_working_directory {
            return Ok((self.config_path.clone(), self.profile.log_file.clone()));
        }

        let requested = self.config_path.clone().ok_or(ConfigError::NoConfigFound)?;
        let config_path = requested
            .canonicalize()
            .map_err(|_| ConfigError::NotFound(requested))?;
        let dir = config_path.parent().ok_or_else(|| {
            BootstrapError::StartupFailed("configuration file has no parent directory".to_string())
        })?;
        std::env::set_current_dir(dir).map_err(|e| {
            BootstrapError::StartupFailed(format!("cannot enter {}: {e}", dir.display()))
        })?;

        let log_file = self
            .profile
            .log_file
            .clone()
            .unwrap_or_else(|| dir.join(LOG_FILENAME));
        Ok((Some(config_path), Some(log_file)))
    }
}
