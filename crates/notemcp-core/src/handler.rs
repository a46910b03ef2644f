use crate::config::ServerConfig;
use rmcp::ServerHandler;
use rmcp::model::{Implementation, ServerCapabilities, ServerInfo};
use std::sync::Arc;

/// The MCP-facing server object.
///
/// Tool dispatch lives in the (external) tool layer; the bootstrap only
/// needs the handler to identify itself to clients and to carry the
/// resolved API configuration for that layer.
#[derive(Clone)]
pub struct NoteMcpHandler {
    config: Arc<ServerConfig>,
}

impl NoteMcpHandler {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The resolved notes-API configuration this server was launched with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl ServerHandler for NoteMcpHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "notemcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "MCP bridge to the notes application's REST API. Tools operate on notes, \
                 notebooks and tags."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}
