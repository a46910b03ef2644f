use crate::error::BootstrapError;
use crate::transport::TransportKind;
use std::fmt;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

static SINK_ESTABLISHED: AtomicBool = AtomicBool::new(false);

/// Diagnostic verbosity accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(anyhow::anyhow!("unknown log level: {other}")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_directive())
    }
}

/// Where diagnostic text goes.
///
/// Deliberately has no stdout variant: for the stdio transport the
/// standard output stream carries protocol frames, so the type cannot
/// name it. This holds at every log level, debug included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogDestination {
    Stderr,
    File(PathBuf),
}

/// Handle to the process-wide diagnostic sink.
#[derive(Debug)]
pub struct LogSink {
    destination: LogDestination,
}

impl LogSink {
    /// Install the process-wide sink. Must run before anything logs and
    /// exactly once per process; a repeat call is a programming error and
    /// fails loudly rather than silently re-targeting a sink that may
    /// have writes in flight. A failed attempt installs nothing and
    /// leaves the single shot unspent.
    pub fn establish(
        transport: TransportKind,
        level: LogLevel,
        log_file: Option<PathBuf>,
    ) -> Result<Self, BootstrapError> {
        if SINK_ESTABLISHED.swap(true, Ordering::SeqCst) {
            return Err(BootstrapError::LoggingAlreadyInitialized);
        }

        let sink = Self::install(transport, level, log_file);
        if sink.is_err() {
            // No sink went in; release the gate so the caller can retry.
            SINK_ESTABLISHED.store(false, Ordering::SeqCst);
        }
        sink
    }

    fn install(
        transport: TransportKind,
        level: LogLevel,
        log_file: Option<PathBuf>,
    ) -> Result<Self, BootstrapError> {
        let destination = Self::destination_for(log_file);
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level.as_directive()));

        let init_result = match &destination {
            LogDestination::Stderr => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(std::io::stderr))
                .try_init(),
            LogDestination::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| {
                        BootstrapError::StartupFailed(format!(
                            "cannot open log file {}: {e}",
                            path.display()
                        ))
                    })?;
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(BoxMakeWriter::new(Arc::new(file)))
                    .try_init()
            }
        };
        init_result.map_err(|_| BootstrapError::LoggingAlreadyInitialized)?;

        tracing::debug!(
            transport = %transport,
            destination = ?destination,
            "logging sink established"
        );
        Ok(Self { destination })
    }

    /// Destination policy: an explicit file wins; otherwise the error
    /// stream. The protocol stream pair is not expressible here, which is
    /// what keeps stdio framing intact for any transport and level.
    pub fn destination_for(log_file: Option<PathBuf>) -> LogDestination {
        match log_file {
            Some(path) => LogDestination::File(path),
            None => LogDestination::Stderr,
        }
    }

    pub fn destination(&self) -> &LogDestination {
        &self.destination
    }
}
