//! Server configuration.

use std::net::{AddrParseError, SocketAddr};

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address to bind to.
    pub addr: SocketAddr,
    /// The maximum number of concurrent connections.
    pub max_connections: usize,
    /// The size of each socket read.
    pub read_buffer_size: usize,
    /// The largest request (head and body) accepted; larger ones get `413`.
    pub max_request_size: usize,
}

impl ServerConfig {
    /// The default configuration bound to `addr`, e.g. `"0.0.0.0:3000"`.
    pub fn with_addr(addr: &str) -> Result<Self, AddrParseError> {
        Ok(Self {
            addr: addr.parse()?,
            ..Self::default()
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: 1024,
            read_buffer_size: 8192,
            max_request_size: 1024 * 1024,
        }
    }
}
