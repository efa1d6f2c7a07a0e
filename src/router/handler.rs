//! Route handlers and the middleware chain.

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::parser::Method;
use crate::router::error::Error;

/// A request handler. It answers through the [`Context`] it is given.
pub type HandlerFn = Arc<dyn Fn(&mut Context) -> Result<(), Error> + Send + Sync>;

/// A middleware stage. It may answer on its own, or pass control on by
/// calling [`Next::run`].
pub type MiddlewareFn = Arc<dyn Fn(&mut Context, Next<'_>) -> Result<(), Error> + Send + Sync>;

/// A registered (method, pattern) → handler binding.
#[derive(Clone)]
pub struct Route {
    /// The HTTP method to match.
    pub method: Method,
    /// The pattern as it was registered.
    pub pattern: String,
    /// The handler function.
    pub handler: HandlerFn,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// The rest of the chain after the current middleware.
///
/// Dropping it without calling [`run`](Next::run) short-circuits the request:
/// later middlewares and the handler never execute.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    middlewares: &'a [MiddlewareFn],
    handler: &'a HandlerFn,
}

impl<'a> Next<'a> {
    pub(crate) fn new(middlewares: &'a [MiddlewareFn], handler: &'a HandlerFn) -> Self {
        Self { middlewares, handler }
    }

    /// Run the next middleware, or the handler when none are left.
    pub fn run(self, ctx: &mut Context) -> Result<(), Error> {
        match self.middlewares.split_first() {
            Some((middleware, rest)) => middleware(ctx, Next::new(rest, self.handler)),
            None => (self.handler)(ctx),
        }
    }
}
