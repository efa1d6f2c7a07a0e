//! Request routing and dispatch.
//!
//! A [`Router`] is built during a single-threaded setup phase (routes,
//! middlewares, static directories) and then shared read-only across
//! connections. [`Router::dispatch`] runs one request through
//!
//! 1. pattern lookup in the route trie (`404` when nothing matches),
//! 2. the method check (`405` when the pattern has no route for the method),
//! 3. a fresh [`Context`] carrying the extracted parameters,
//! 4. every middleware in registration order, then the handler.

mod error;
mod group;
mod handler;
mod params;
mod static_files;
mod tree;

use std::sync::Arc;

use log::{debug, warn};

use crate::context::Context;
use crate::logger::Logger;
use crate::parser::{HttpRequest, Method};
use crate::response::{HttpResponse, StatusCode};
use crate::store::Store;

pub use error::Error;
pub use group::Group;
pub use handler::{HandlerFn, MiddlewareFn, Next, Route};
pub use params::{extract_params, Params, PARAM_SIGIL};
pub use static_files::content_type_for;
pub use tree::{Endpoint, RouteTree};

/// The result of dispatching one request.
#[derive(Debug)]
pub struct Dispatch {
    /// The response to send; unchanged defaults when nothing wrote one.
    pub response: HttpResponse,
    /// `Err` when routing failed or a middleware or handler reported an error.
    pub result: Result<(), Error>,
}

/// Routes requests to handlers through a middleware chain.
pub struct Router {
    tree: RouteTree,
    middlewares: Vec<MiddlewareFn>,
    store: Arc<Store>,
    logger: Logger,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with an empty store and a facade-only logger.
    pub fn new() -> Self {
        Self::with_parts(Arc::new(Store::new()), Logger::new())
    }

    /// Create a router around an existing store and logger.
    pub fn with_parts(store: Arc<Store>, logger: Logger) -> Self {
        Self {
            tree: RouteTree::new(),
            middlewares: Vec::new(),
            store,
            logger,
        }
    }

    /// Register `handler` for `method` requests matching `pattern`.
    ///
    /// Segments starting with `:` capture a parameter. Registering the same
    /// method and pattern twice keeps the last handler.
    pub fn add_route<F>(&mut self, method: Method, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route_fn(method, pattern, Arc::new(handler));
    }

    pub(crate) fn add_route_fn(&mut self, method: Method, pattern: impl Into<String>, handler: HandlerFn) {
        let pattern = pattern.into();
        debug!("registering {method} {pattern}");
        self.tree.insert(Route {
            method,
            pattern,
            handler,
        });
    }

    pub fn get<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, handler);
    }

    pub fn post<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, handler);
    }

    pub fn put<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, handler);
    }

    pub fn delete<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, handler);
    }

    pub fn patch<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&mut Context) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, handler);
    }

    /// Append a middleware; middlewares run in the order they were added.
    pub fn use_middleware<F>(&mut self, middleware: F)
    where
        F: Fn(&mut Context, Next<'_>) -> Result<(), Error> + Send + Sync + 'static,
    {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Append several middlewares, keeping their order.
    pub fn use_middlewares(&mut self, middlewares: impl IntoIterator<Item = MiddlewareFn>) {
        self.middlewares.extend(middlewares);
    }

    /// A registration helper that prefixes every pattern with `prefix`.
    pub fn group(&mut self, prefix: impl Into<String>) -> Group<'_> {
        Group::new(self, prefix.into())
    }

    /// The endpoint whose pattern matches `path`, regardless of method.
    pub fn find(&self, path: &str) -> Option<&Endpoint> {
        self.tree.find(path)
    }

    /// The route matching both `method` and `path`.
    pub fn route(&self, method: Method, path: &str) -> Option<&Route> {
        self.find(path)?.route(method)
    }

    /// Every registered route, ordered by pattern.
    pub fn routes(&self) -> Vec<&Route> {
        self.tree.routes()
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Dispatch one request and return the finalized response.
    ///
    /// Routing failures produce a `404` or `405` response here. Any error a
    /// middleware or handler returns is passed back in
    /// [`Dispatch::result`]; it never replaces the response they wrote.
    pub fn dispatch(&self, request: HttpRequest) -> Dispatch {
        let Some(endpoint) = self.tree.find(&request.path) else {
            debug!("no route for {} {}", request.method, request.path);
            let response = HttpResponse::new(StatusCode::NotFound)
                .with_content_type("text/plain; charset=utf-8")
                .with_body_string(format!("Not found: {}", request.path));
            return Dispatch {
                response,
                result: Err(Error::NotFound(request.path)),
            };
        };

        let Some(route) = endpoint.route(request.method) else {
            let allowed = endpoint
                .allowed_methods()
                .map(|m| m.to_string())
                .collect::<Vec<String>>()
                .join(", ");
            debug!("{} not allowed for {} (allowed: {allowed})", request.method, request.path);
            let response = HttpResponse::new(StatusCode::MethodNotAllowed)
                .with_header("Allow", allowed)
                .with_content_type("text/plain; charset=utf-8")
                .with_body_string("Method Not Allowed");
            return Dispatch {
                response,
                result: Err(Error::MethodNotAllowed(request.method, request.path)),
            };
        };

        let params = extract_params(&request.path, &route.pattern);
        let mut ctx = Context::new(request, params, Arc::clone(&self.store), self.logger.clone());

        let result = Next::new(&self.middlewares, &route.handler).run(&mut ctx);
        if let Err(e) = &result {
            warn!("{} {} failed: {e}", route.method, ctx.path());
        }

        Dispatch {
            response: ctx.into_response(),
            result,
        }
    }
}
