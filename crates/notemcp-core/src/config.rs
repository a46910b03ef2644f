use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Conventional configuration filename looked up in the working directory.
pub const DEFAULT_CONFIG_FILENAME: &str = "notemcp.json";

/// Sample token shipped in the documentation; refused at resolution time
/// so an unedited config fails with a pointed message instead of a 403
/// on the first tool call.
const PLACEHOLDER_TOKEN: &str = "YOUR_TOKEN_HERE";

/// Connection settings for the notes application's REST API.
///
/// Immutable once resolved; the launch call that created it owns it and
/// hands it to the server object by value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    /// Host the notes application listens on
    #[serde(default = "default_host")]
    pub host: String,

    /// Port of the notes application's API service
    #[serde(default = "default_port")]
    pub port: u16,

    /// API authorization token; optional until the first authenticated call
    #[serde(default)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Verify TLS certificates when talking to the API
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: None,
            timeout: default_timeout(),
            verify_ssl: default_verify_ssl(),
        }
    }
}

impl ServerConfig {
    /// Resolve a configuration with the documented precedence order: an
    /// explicit path, then `notemcp.json` in the working directory, then
    /// auto-discovery across the conventional locations. With nothing
    /// found, flows that require a file get `NoConfigFound` and the rest
    /// get the documented defaults.
    ///
    /// Reads at most one file; never touches the network.
    pub fn resolve(explicit: Option<&Path>, require_file: bool) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        let conventional = PathBuf::from(DEFAULT_CONFIG_FILENAME);
        if conventional.exists() {
            return Self::from_file(&conventional);
        }

        for candidate in Self::discovery_paths() {
            if candidate.exists() {
                return Self::from_file(&candidate);
            }
        }

        if require_file {
            Err(ConfigError::NoConfigFound)
        } else {
            Ok(Self::default())
        }
    }

    /// Load and validate a configuration from a JSON file. Unknown keys
    /// are ignored; missing keys take the documented defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Malformed(format!("{}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&raw)
            .map_err(|e| ConfigError::Malformed(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Locations searched when neither an explicit path nor a
    /// working-directory file exists. The working-directory file itself
    /// is resolve()'s job, so it never appears here.
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".notemcp.json"));
            paths.push(home.join(".config").join("notemcp").join("config.json"));
        }
        paths
    }

    /// Validate the invariants a resolved configuration must hold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Malformed(
                "port must be between 1 and 65535".to_string(),
            ));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Malformed(
                "timeout must be positive".to_string(),
            ));
        }
        if self.token.as_deref() == Some(PLACEHOLDER_TOKEN) {
            return Err(ConfigError::Malformed(
                "token is still the documentation placeholder; paste the real API token"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL of the notes application's API. `verify_ssl` selects the
    /// https scheme; plain http otherwise.
    pub fn api_base_url(&self) -> String {
        let scheme = if self.verify_ssl { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.host, self.port)
    }
}

// Default value functions for serde
fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    41184
}
fn default_timeout() -> u64 {
    30
}
fn default_verify_ssl() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 41184);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, 30);
        assert!(!config.verify_ssl);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_takes_defaults_for_the_rest() {
        let file = write_config(r#"{"port": 41184, "timeout": 15}"#);
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 41184);
        assert_eq!(config.token, None);
        assert_eq!(config.timeout, 15);
        assert!(!config.verify_ssl);
    }

    #[test]
    fn test_full_file_wins_over_defaults() {
        let file = write_config(
            r#"{"host": "notes.local", "port": 8080, "token": "abc123", "timeout": 5, "verify_ssl": true}"#,
        );
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.host, "notes.local");
        assert_eq!(config.port, 8080);
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout, 5);
        assert!(config.verify_ssl);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let file = write_config(r#"{"port": 1234, "log_level": "INFO", "extra": [1, 2]}"#);
        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.port, 1234);
    }

    #[test]
    fn test_malformed_json_rejected() {
        let file = write_config("{not json");
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_wrong_value_type_rejected() {
        let file = write_config(r#"{"port": "forty-one"}"#);
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file = write_config(r#"{"timeout": 0}"#);
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let file = write_config(r#"{"token": "YOUR_TOKEN_HERE"}"#);
        let err = ServerConfig::from_file(file.path()).unwrap_err();
        let detail = format!("{err}");
        assert!(detail.contains("placeholder"));
    }

    #[test]
    fn test_explicit_missing_path_is_not_found() {
        let err =
            ServerConfig::resolve(Some(Path::new("/nonexistent/notemcp.json")), false).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_explicit_path_wins() {
        let file = write_config(r#"{"port": 9999}"#);
        let config = ServerConfig::resolve(Some(file.path()), true).unwrap();
        assert_eq!(config.port, 9999);
    }

    #[test]
    fn test_api_base_url_scheme_follows_verify_ssl() {
        let config = ServerConfig::default();
        assert_eq!(config.api_base_url(), "http://localhost:41184");

        let config = ServerConfig {
            verify_ssl: true,
            ..Default::default()
        };
        assert_eq!(config.api_base_url(), "https://localhost:41184");
    }

    #[test]
    fn test_discovery_paths_are_home_locations_only() {
        // resolve() already checks the working-directory file before
        // falling back to discovery, so the search set must not repeat it.
        for path in ServerConfig::discovery_paths() {
            assert!(path.is_absolute());
            assert_ne!(path, PathBuf::from(DEFAULT_CONFIG_FILENAME));
        }
    }
}
