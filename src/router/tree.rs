//! Segment trie holding every registered route.
//!
//! Each node is one path segment. Literal segments are looked up by exact
//! text; a node may additionally point at one of its children as its dynamic
//! child, which matches any single segment. Lookup is O(depth) and does not
//! depend on how many routes are registered.

use std::collections::{BTreeMap, HashMap};

use crate::parser::Method;
use crate::router::handler::Route;
use crate::router::params::{segments, PARAM_SIGIL};

/// The routes bound where a pattern terminates, one per method.
#[derive(Debug, Default)]
pub struct Endpoint {
    routes: BTreeMap<Method, Route>,
}

impl Endpoint {
    /// The route bound for `method`, if any.
    pub fn route(&self, method: Method) -> Option<&Route> {
        self.routes.get(&method)
    }

    /// Methods bound at this endpoint, in a stable order.
    pub fn allowed_methods(&self) -> impl Iterator<Item = Method> + '_ {
        self.routes.keys().copied()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }
}

#[derive(Debug, Default)]
struct Node {
    children: HashMap<String, Node>,
    /// Key into `children` of the single dynamic child at this depth.
    dynamic_child: Option<String>,
    /// Present exactly when a pattern terminates here.
    endpoint: Option<Endpoint>,
}

/// The route table.
#[derive(Debug, Default)]
pub struct RouteTree {
    root: Node,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `route`; never fails.
    ///
    /// Empty segments are skipped, so `//users` and `/users` are the same
    /// pattern. A dynamic segment only becomes its parent's dynamic child when
    /// its node is first created: registering `/a/:y` after `/a/:x` points the
    /// dynamic child of `/a` at `:y`, leaving `:x` reachable only literally.
    /// Registering the same method and pattern again replaces the binding.
    pub fn insert(&mut self, route: Route) {
        let mut current = &mut self.root;

        for part in segments(&route.pattern).filter(|s| !s.is_empty()) {
            if part.starts_with(PARAM_SIGIL) && !current.children.contains_key(part) {
                current.dynamic_child = Some(part.to_string());
            }
            current = current.children.entry(part.to_string()).or_default();
        }

        current
            .endpoint
            .get_or_insert_with(Endpoint::default)
            .routes
            .insert(route.method, route);
    }

    /// Find the endpoint whose pattern matches `path`.
    ///
    /// At every depth a literal child wins over the dynamic child, and there
    /// is no backtracking: once a literal child is taken, a failure further
    /// down is final. Ending on a node where no pattern terminates is a miss.
    pub fn find(&self, path: &str) -> Option<&Endpoint> {
        let mut current = &self.root;

        for part in segments(path).filter(|s| !s.is_empty()) {
            current = match current.children.get(part) {
                Some(next) => next,
                None => {
                    let dynamic = current.dynamic_child.as_deref()?;
                    current.children.get(dynamic)?
                }
            };
        }

        current.endpoint.as_ref()
    }

    /// Every registered route, ordered by pattern and then method.
    pub fn routes(&self) -> Vec<&Route> {
        let mut routes = Vec::new();
        let mut pending = vec![&self.root];
        while let Some(node) = pending.pop() {
            if let Some(endpoint) = &node.endpoint {
                routes.extend(endpoint.routes());
            }
            pending.extend(node.children.values());
        }
        routes.sort_by(|a, b| a.pattern.cmp(&b.pattern).then(a.method.cmp(&b.method)));
        routes
    }
}
