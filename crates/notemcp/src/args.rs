//! Shared clap argument types for the two launcher binaries.

use clap::ValueEnum;
use notemcp_core::{LogLevel, TransportKind};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    Stdio,
    Http,
    StreamableHttp,
    Sse,
}

impl From<TransportArg> for TransportKind {
    fn from(value: TransportArg) -> Self {
        match value {
            TransportArg::Stdio => TransportKind::Stdio,
            TransportArg::Http => TransportKind::Http,
            TransportArg::StreamableHttp => TransportKind::StreamableHttp,
            TransportArg::Sse => TransportKind::Sse,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LevelArg {
    Debug,
    Info,
    Warning,
    Error,
}

impl From<LevelArg> for LogLevel {
    fn from(value: LevelArg) -> Self {
        match value {
            LevelArg::Debug => LogLevel::Debug,
            LevelArg::Info => LogLevel::Info,
            LevelArg::Warning => LogLevel::Warning,
            LevelArg::Error => LogLevel::Error,
        }
    }
}
