//! HTTP request parser module.
//!
//! This is the transport-facing half of the crate: it turns the raw bytes read
//! from a connection into an [`HttpRequest`] that the router can dispatch.

mod request;
mod method;
mod version;
mod error;
mod tests;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;

// Re-export the parsing entry points
pub use request::{expected_len, parse_request};
