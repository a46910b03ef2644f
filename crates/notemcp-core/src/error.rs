use std::path::PathBuf;
use thiserror::Error;

/// Failures while locating or parsing the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("no configuration file found in any conventional location")]
    NoConfigFound,

    #[error("malformed configuration: {0}")]
    Malformed(String),
}

/// Failures while turning a transport request into a listener binding.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("unsupported transport: {0}")]
    UnsupportedTransport(String),

    #[error("invalid binding: {0}")]
    InvalidBinding(String),
}

/// Everything that can go wrong between process start and server stop.
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("logging sink already established for this process")]
    LoggingAlreadyInitialized,

    #[error("startup failed: {0}")]
    StartupFailed(String),

    #[error("server crashed: {0}")]
    Crashed(String),
}

impl BootstrapError {
    pub fn startup_failed(msg: impl Into<String>) -> Self {
        BootstrapError::StartupFailed(msg.into())
    }

    pub fn crashed(msg: impl Into<String>) -> Self {
        BootstrapError::Crashed(msg.into())
    }

    /// True when the failure was detected before the server object ran,
    /// i.e. the process never carried a single protocol frame.
    pub fn is_pre_start(&self) -> bool {
        !matches!(self, BootstrapError::Crashed(_))
    }

    /// True for failures in configuration resolution specifically.
    pub fn is_config(&self) -> bool {
        matches!(self, BootstrapError::Config(_))
    }
}
