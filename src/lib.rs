//! An embeddable HTTP request router.
//!
//! Routes are stored in a segment trie with static and `:dynamic` segments.
//! A request is matched by path (literal segments win over dynamic ones at
//! every depth), checked against the bound methods, and run through the
//! registered middlewares before its handler. Handlers answer through a
//! [`Context`] whose response can be written exactly once.
//!
//! # Features
//!
//! - O(depth) route lookup independent of the number of routes
//! - Path parameters, route groups and static directory registration
//! - Middleware chains with explicit `next` continuation and short-circuiting
//! - Write-once responses: strings, bytes, pretty JSON, HTML, redirects and
//!   canned error pages
//! - A process-wide key/value [`Store`] shared by every request
//! - A small tokio-based HTTP/1.1 server to host the router
//!
//! # Examples
//!
//! ## Routing and parameters
//!
//! ```
//! use std::collections::HashMap;
//! use microroute::{HttpRequest, HttpVersion, Method, Router, StatusCode};
//!
//! let mut router = Router::new();
//! router.get("/users/:id", |ctx| {
//!     let greeting = format!("hello {}", ctx.param("id").unwrap_or("stranger"));
//!     ctx.write_string(StatusCode::Ok, greeting)
//! });
//!
//! let request = HttpRequest::new(Method::GET, "/users/ada".to_string(), HttpVersion::Http11, HashMap::new());
//! let dispatch = router.dispatch(request);
//! assert!(dispatch.result.is_ok());
//! assert_eq!(dispatch.response.body, b"hello ada");
//! ```
//!
//! ## Middleware
//!
//! ```
//! use microroute::{Router, StatusCode};
//!
//! let mut router = Router::new();
//! router.use_middleware(|ctx, next| {
//!     if ctx.header("Authorization").is_none() {
//!         return ctx.unauthorized();
//!     }
//!     next.run(ctx)
//! });
//! router.get("/private", |ctx| ctx.write_string(StatusCode::Ok, "welcome"));
//! ```
//!
//! ## Serving
//!
//! ```no_run
//! use microroute::{HttpServer, Router, ServerConfig, StatusCode};
//!
//! # async fn run() -> Result<(), microroute::RouterError> {
//! let mut router = Router::new();
//! router.get("/", |ctx| ctx.html(StatusCode::Ok, "<h1>hello</h1>"));
//!
//! let config = ServerConfig::with_addr("127.0.0.1:8080").expect("valid address");
//! HttpServer::new(config, router).start().await
//! # }
//! ```

pub mod context;
pub mod logger;
pub mod parser;
pub mod response;
pub mod router;
pub mod server;
pub mod store;

// Re-export commonly used items for convenience
pub use context::Context;
pub use logger::{Level, Logger};
pub use parser::{Error as ParserError, HttpRequest, HttpVersion, Method, parse_request};
pub use response::{Cookie, HttpResponse, SameSite, StatusCode};
pub use router::{Dispatch, Error as RouterError, Group, Next, Params, Route, Router};
pub use server::{HttpServer, ServerConfig};
pub use store::Store;
