//! notemcp-core - bootstrap library for the notes MCP server
//!
//! Brings the server process up in a fixed order: resolve configuration,
//! establish the diagnostic sink, bind the selected transport, then hand
//! off to the lifecycle supervisor. MCP request handling itself sits
//! behind the handler seam and is not this crate's concern.

mod api;
mod config;
mod error;
mod handler;
mod logging;
mod serve;
mod supervisor;
mod transport;

pub use api::*;
pub use config::*;
pub use error::*;
pub use handler::*;
pub use logging::*;
pub use serve::*;
pub use supervisor::*;
pub use transport::*;
