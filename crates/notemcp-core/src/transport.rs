use crate::error::TransportError;
use derive_builder::Builder;
use std::fmt;
use std::str::FromStr;

/// Wire transports the server can speak.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportKind {
    #[default]
    Stdio,
    Http,
    StreamableHttp,
    Sse,
}

impl TransportKind {
    /// Whether this transport multiplexes protocol frames over the
    /// process's own standard stream pair.
    pub fn owns_standard_streams(&self) -> bool {
        matches!(self, TransportKind::Stdio)
    }
}

impl FromStr for TransportKind {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(TransportKind::Stdio),
            "http" => Ok(TransportKind::Http),
            "streamable-http" => Ok(TransportKind::StreamableHttp),
            "sse" => Ok(TransportKind::Sse),
            other => Err(TransportError::UnsupportedTransport(other.to_string())),
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportKind::Stdio => "stdio",
            TransportKind::Http => "http",
            TransportKind::StreamableHttp => "streamable-http",
            TransportKind::Sse => "sse",
        };
        f.write_str(name)
    }
}

/// Requested transport plus binding parameters. Created once per process
/// from command-line input; immutable afterwards.
///
/// host/port/path carry meaning only for the HTTP-based transports, but
/// they are validated for well-formedness regardless so operator typos
/// surface early even on stdio.
#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(setter(into))]
pub struct TransportSpec {
    #[builder(default)]
    pub kind: TransportKind,

    #[builder(default = "default_bind_host()")]
    pub host: String,

    #[builder(default = "default_bind_port()")]
    pub port: u16,

    #[builder(default = "default_mount_path()")]
    pub path: String,
}

impl Default for TransportSpec {
    fn default() -> Self {
        Self {
            kind: TransportKind::default(),
            host: default_bind_host(),
            port: default_bind_port(),
            path: default_mount_path(),
        }
    }
}

impl TransportSpec {
    pub fn builder() -> TransportSpecBuilder {
        TransportSpecBuilder::default()
    }

    /// Turn the request into a listener configuration. No sockets are
    /// opened here; OS-level binding failures surface when the supervisor
    /// starts serving.
    pub fn bind(&self) -> Result<ListenerConfig, TransportError> {
        self.validate()?;
        let path = normalize_path(&self.path);
        Ok(match self.kind {
            TransportKind::Stdio => ListenerConfig::Stdio,
            // The plain `http` transport is served by the streamable-HTTP
            // listener; the two identifiers exist for operator familiarity.
            TransportKind::Http | TransportKind::StreamableHttp => ListenerConfig::Http {
                host: self.host.clone(),
                port: self.port,
                path,
            },
            TransportKind::Sse => ListenerConfig::Sse {
                host: self.host.clone(),
                port: self.port,
                path,
            },
        })
    }

    fn validate(&self) -> Result<(), TransportError> {
        if self.host.is_empty() || self.host.chars().any(char::is_whitespace) {
            return Err(TransportError::InvalidBinding(format!(
                "host {:?} is not a bindable address",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(TransportError::InvalidBinding(
                "port 0 is reserved".to_string(),
            ));
        }
        Ok(())
    }
}

/// A missing leading separator is normalized rather than rejected.
fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

/// Concrete listener parameters handed to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerConfig {
    /// Frames travel over the process's standard stream pair.
    Stdio,
    /// Streamable-HTTP listener.
    Http { host: String, port: u16, path: String },
    /// Server-sent-events listener.
    Sse { host: String, port: u16, path: String },
}

impl ListenerConfig {
    /// Bind address for network listeners; `None` for stdio.
    pub fn bind_addr(&self) -> Option<String> {
        match self {
            ListenerConfig::Stdio => None,
            ListenerConfig::Http { host, port, .. } | ListenerConfig::Sse { host, port, .. } => {
                Some(format!("{host}:{port}"))
            }
        }
    }
}

fn default_bind_host() -> String {
    "127.0.0.1".to_string()
}
fn default_bind_port() -> u16 {
    8000
}
fn default_mount_path() -> String {
    "/mcp".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identifiers_parse() {
        assert_eq!("stdio".parse::<TransportKind>().unwrap(), TransportKind::Stdio);
        assert_eq!("http".parse::<TransportKind>().unwrap(), TransportKind::Http);
        assert_eq!(
            "streamable-http".parse::<TransportKind>().unwrap(),
            TransportKind::StreamableHttp
        );
        assert_eq!("sse".parse::<TransportKind>().unwrap(), TransportKind::Sse);
        assert_eq!("SSE".parse::<TransportKind>().unwrap(), TransportKind::Sse);
    }

    #[test]
    fn test_unknown_identifier_rejected_before_any_resource() {
        let err = "ftp".parse::<TransportKind>().unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedTransport(v) if v == "ftp"));
    }

    #[test]
    fn test_display_roundtrips() {
        for kind in [
            TransportKind::Stdio,
            TransportKind::Http,
            TransportKind::StreamableHttp,
            TransportKind::Sse,
        ] {
            assert_eq!(kind.to_string().parse::<TransportKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_builder_defaults() {
        let spec = TransportSpec::builder().build().unwrap();
        assert_eq!(spec, TransportSpec::default());
        assert_eq!(spec.kind, TransportKind::Stdio);
        assert_eq!(spec.host, "127.0.0.1");
        assert_eq!(spec.port, 8000);
        assert_eq!(spec.path, "/mcp");
    }

    #[test]
    fn test_http_bind_with_default_path() {
        let spec = TransportSpec::builder()
            .kind(TransportKind::Http)
            .host("0.0.0.0")
            .port(9000u16)
            .build()
            .unwrap();
        assert_eq!(
            spec.bind().unwrap(),
            ListenerConfig::Http {
                host: "0.0.0.0".to_string(),
                port: 9000,
                path: "/mcp".to_string(),
            }
        );
    }

    #[test]
    fn test_streamable_http_binds_the_http_listener() {
        let spec = TransportSpec::builder()
            .kind(TransportKind::StreamableHttp)
            .build()
            .unwrap();
        assert!(matches!(spec.bind().unwrap(), ListenerConfig::Http { .. }));
    }

    #[test]
    fn test_missing_leading_separator_normalized() {
        let spec = TransportSpec::builder()
            .kind(TransportKind::Sse)
            .path("events")
            .build()
            .unwrap();
        let ListenerConfig::Sse { path, .. } = spec.bind().unwrap() else {
            panic!("expected sse listener");
        };
        assert_eq!(path, "/events");
    }

    #[test]
    fn test_stdio_opens_no_network_listener() {
        let listener = TransportSpec::default().bind().unwrap();
        assert_eq!(listener, ListenerConfig::Stdio);
        assert_eq!(listener.bind_addr(), None);
    }

    #[test]
    fn test_stdio_still_validates_binding_parameters() {
        let spec = TransportSpec::builder().port(0u16).build().unwrap();
        let err = spec.bind().unwrap_err();
        assert!(matches!(err, TransportError::InvalidBinding(_)));
    }

    #[test]
    fn test_whitespace_host_rejected() {
        let spec = TransportSpec::builder()
            .kind(TransportKind::Http)
            .host("not a host")
            .build()
            .unwrap();
        assert!(matches!(
            spec.bind().unwrap_err(),
            TransportError::InvalidBinding(_)
        ));
    }
}
