//! Compiled route tree.
//!
//! # Structure
//! ```text
//! root
//!  ├─ statics["users"]
//!  │    ├─ endpoints {GET -> users.list}
//!  │    ├─ statics["new"]  endpoints {GET -> users.form}
//!  │    └─ param           endpoints {GET -> users.show, DELETE -> users.delete}
//!  └─ statics["files"]
//!       └─ wildcard        endpoints {GET -> files.serve}
//! ```
//!
//! # Design Decisions
//! - At most one parameter child per node; parameter names live on the
//!   endpoint, not on the node, so `/a/:x` and `/a/:y/b` share a branch
//! - Handlers are keyed by method on the node where the template ends
//! - Nodes are only mutated through the registry; `RouteTree` exposes no
//!   mutating API, so a built tree can be shared across threads freely

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;

use crate::routing::template::{PathTemplate, Segment};
use crate::routing::RouterOptions;

/// A handler registered for one method at one template.
#[derive(Debug)]
pub(crate) struct Endpoint<H> {
    pub handler: H,
    pub template: Arc<str>,
    /// Capture names in template order; aligned with the captures a
    /// traversal collects on its way to this endpoint.
    pub names: Arc<[Arc<str>]>,
}

/// Per-method endpoints, kept sorted by method name.
#[derive(Debug)]
pub(crate) struct Endpoints<H> {
    entries: Vec<(Method, Endpoint<H>)>,
}

impl<H> Default for Endpoints<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> Endpoints<H> {
    pub fn get(&self, method: &Method) -> Option<&Endpoint<H>> {
        self.entries
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, endpoint)| endpoint)
    }

    pub fn insert(&mut self, method: Method, endpoint: Endpoint<H>) {
        let at = self
            .entries
            .partition_point(|(m, _)| m.as_str() < method.as_str());
        self.entries.insert(at, (method, endpoint));
    }

    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.entries.iter().map(|(m, _)| m)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Method, &Endpoint<H>)> {
        self.entries.iter().map(|(m, e)| (m, e))
    }

    fn shrink_to_fit(&mut self) {
        self.entries.shrink_to_fit();
    }
}

/// One position in the tree.
#[derive(Debug)]
pub(crate) struct Node<H> {
    pub statics: HashMap<Box<str>, Node<H>>,
    pub param: Option<Box<Node<H>>>,
    pub wildcard: Option<Endpoints<H>>,
    pub endpoints: Endpoints<H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            statics: HashMap::new(),
            param: None,
            wildcard: None,
            endpoints: Endpoints::default(),
        }
    }
}

impl<H> Node<H> {
    /// Walk the template's shape from this node, creating nodes as needed,
    /// and return the endpoint slot where it terminates.
    pub fn slot_mut(&mut self, template: &PathTemplate, options: &RouterOptions) -> &mut Endpoints<H> {
        let mut node = self;
        for segment in template.segments() {
            match segment {
                Segment::Static(text) => {
                    node = node
                        .statics
                        .entry(options.static_key(text).into_boxed_str())
                        .or_default();
                }
                Segment::Param(_) => {
                    node = node.param.get_or_insert_with(Box::default).as_mut();
                }
                Segment::Wildcard(_) => {
                    return node.wildcard.get_or_insert_with(Endpoints::default);
                }
            }
        }
        &mut node.endpoints
    }

    /// Release spare capacity once registration is complete.
    pub fn freeze(&mut self) {
        self.statics.shrink_to_fit();
        self.endpoints.shrink_to_fit();
        if let Some(wildcard) = self.wildcard.as_mut() {
            wildcard.shrink_to_fit();
        }
        if let Some(param) = self.param.as_mut() {
            param.freeze();
        }
        for child in self.statics.values_mut() {
            child.freeze();
        }
    }

    /// Depth-first visit of every endpoint below this node.
    pub fn for_each_endpoint<'t, F>(&'t self, f: &mut F)
    where
        F: FnMut(&'t Method, &'t Endpoint<H>),
    {
        for (method, endpoint) in self.endpoints.iter() {
            f(method, endpoint);
        }
        if let Some(wildcard) = &self.wildcard {
            for (method, endpoint) in wildcard.iter() {
                f(method, endpoint);
            }
        }
        if let Some(param) = &self.param {
            param.for_each_endpoint(f);
        }
        for child in self.statics.values() {
            child.for_each_endpoint(f);
        }
    }
}

/// A registered route, as listed by [`RouteTree::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    pub method: Method,
    pub template: Arc<str>,
}

/// The immutable, shareable product of [`RouteRegistry::build`].
///
/// [`RouteRegistry::build`]: crate::routing::RouteRegistry::build
#[derive(Debug)]
pub struct RouteTree<H> {
    pub(crate) root: Node<H>,
    pub(crate) options: RouterOptions,
    pub(crate) route_count: usize,
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            options: RouterOptions::default(),
            route_count: 0,
        }
    }
}

impl<H> RouteTree<H> {
    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Number of registered (method, template) routes.
    pub fn len(&self) -> usize {
        self.route_count
    }

    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Every registered route, ordered by template then method.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::with_capacity(self.route_count);
        self.root.for_each_endpoint(&mut |method, endpoint| {
            routes.push(RouteInfo {
                method: method.clone(),
                template: endpoint.template.clone(),
            });
        });
        routes.sort_by(|a, b| {
            a.template
                .cmp(&b.template)
                .then_with(|| a.method.as_str().cmp(b.method.as_str()))
        });
        routes
    }
}
