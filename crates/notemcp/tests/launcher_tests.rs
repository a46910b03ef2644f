use notemcp::{Launcher, LauncherProfile};
use notemcp_core::{
    BootstrapError, ConfigError, LaunchOutcome, LogLevel, TransportError, TransportKind,
    TransportSpec,
};
use std::io::Write;
use std::path::PathBuf;

/// An explicitly supplied path that does not exist is a hard failure,
/// detected before the logging sink or any listener exists.
#[tokio::test]
async fn test_missing_explicit_config_fails_with_exit_code_one() {
    let launcher = Launcher::new(
        LauncherProfile::interactive(),
        TransportSpec::default(),
        Some(PathBuf::from("/nonexistent/notemcp.json")),
        LogLevel::Info,
    );
    let outcome = launcher.launch().await;

    assert_eq!(outcome.exit_code(), 1);
    assert!(matches!(
        outcome,
        LaunchOutcome::Failed(BootstrapError::Config(ConfigError::NotFound(_)))
    ));
}

/// The hardened profile never falls back to auto-discovery: a missing
/// configuration file ends the launch immediately.
#[tokio::test]
async fn test_hardened_profile_requires_the_config_file() {
    let launcher = Launcher::new(
        LauncherProfile::hardened(),
        TransportSpec::default(),
        Some(PathBuf::from("/nonexistent/notemcp.json")),
        LogLevel::Info,
    );
    let outcome = launcher.launch().await;

    assert_eq!(outcome.exit_code(), 1);
    assert!(matches!(
        outcome,
        LaunchOutcome::Failed(BootstrapError::Config(_))
    ));
}

/// A valid configuration with an invalid binding gets past resolution,
/// establishes the sink, and then fails in the transport selector - with
/// no listener resource ever allocated.
///
/// The only test in this binary that reaches sink establishment.
#[tokio::test]
async fn test_invalid_binding_fails_after_config_resolution() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"port": 41184, "timeout": 15}"#).unwrap();

    let transport = TransportSpec::builder()
        .kind(TransportKind::Http)
        .port(0u16)
        .build()
        .unwrap();
    let launcher = Launcher::new(
        LauncherProfile::interactive(),
        transport,
        Some(file.path().to_path_buf()),
        LogLevel::Info,
    );
    let outcome = launcher.launch().await;

    assert_eq!(outcome.exit_code(), 1);
    assert!(matches!(
        outcome,
        LaunchOutcome::Failed(BootstrapError::Transport(TransportError::InvalidBinding(_)))
    ));
}
