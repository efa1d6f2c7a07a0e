//! TCP transport for a [`Router`](crate::Router).
//!
//! This module accepts connections, reads and parses one request per
//! connection, hands it to the router and writes back the finalized response.

mod config;
mod http_server;

// Re-export public items
pub use config::ServerConfig;
pub use http_server::HttpServer;
