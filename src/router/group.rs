//! Route groups sharing a pattern prefix.

use std::sync::Arc;

use crate::context::Context;
use crate::parser::Method;
use crate::router::{Error, Router};

/// Registers routes on a [`Router`] under a common prefix.
///
/// ```
/// use microroute::{Router, StatusCode};
///
/// let mut router = Router::new();
/// let mut api = router.group("/api");
/// api.get("/users/:id", |ctx| {
///     let id = ctx.param("id").unwrap_or_default().to_string();
///     ctx.write_string(StatusCode::Ok, id)
/// });
/// assert!(router.find("/api/users/7").is_some());
/// ```
pub struct Group<'r> {
    router: &'r mut Router,
    prefix: String,
}

impl<'r> Group<'r> {
    pub(crate) fn new(router: &'r mut Router, prefix: String) -> Self {
        Self { router, prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A nested group whose prefix extends this one.
    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        let prefix = join(&self.prefix, prefix);
        Group::new(self.router, prefix)
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        let pattern = join(&self.prefix, pattern);
        self.router.add_route_fn(method, pattern, Arc::new(handler));
    }

    pub fn get<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<F>(&mut self, pattern: &str, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }
}

/// Join a group prefix and a pattern with exactly one `/` between them.
fn join(prefix: &str, pattern: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match pattern.strip_prefix('/') {
        Some(rest) => format!("{prefix}/{rest}"),
        None if pattern.is_empty() => prefix.to_string(),
        None => format!("{prefix}/{pattern}"),
    }
}
