//! Error types for routing and request handling.

use std::path::PathBuf;

use thiserror::Error;

use crate::parser::{Error as ParserError, Method};

/// Errors produced while registering routes, dispatching requests or
/// writing responses.
#[derive(Debug, Error)]
pub enum Error {
    /// No registered pattern matches the request path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A pattern matches but no route is bound for the request method.
    #[error("Method {0} not allowed for path: {1}")]
    MethodNotAllowed(Method, String),

    /// A response operation was called after the response was finalized.
    #[error("superfluous call to {0}")]
    SuperfluousWrite(&'static str),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The directory given to [`Router::static_dir`](crate::Router::static_dir) is unusable.
    #[error("Static directory {}: {source}", path.display())]
    StaticDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The request exceeded the configured size limit.
    #[error("Request larger than {0} bytes")]
    RequestTooLarge(usize),

    /// Failure reported by a handler or middleware.
    #[error("Internal server error: {0}")]
    InternalError(String),
}
