//! Request matching against a compiled tree.
//!
//! # Algorithm
//! ```text
//! at each node, for the current request segment:
//!     1. static child keyed by the segment   (most specific)
//!     2. parameter child, capturing it       (non-empty segments only)
//!     3. wildcard leaf, capturing the rest   (least specific)
//! a failed branch backtracks to the next option at the same depth
//! ```
//!
//! # Design Decisions
//! - Depth-first with backtracking: the first exact-method hit is the
//!   winner, which makes static > param > wildcard hold at the earliest
//!   differing depth regardless of registration order
//! - A shape match under another method is remembered, not returned, so a
//!   deeper exact-method match elsewhere still wins; only when the search is
//!   exhausted does it become `MethodNotAllowed`
//! - Captures are recorded as segment indices; names are attached from the
//!   matched endpoint at the end, so the tree stays name-agnostic

use axum::http::Method;

use crate::routing::error::MatchError;
use crate::routing::params::{Params, RouteMatch};
use crate::routing::path::{split_path, PathSegment};
use crate::routing::tree::{Endpoint, Endpoints, Node, RouteTree};

impl<H> RouteTree<H> {
    /// Find the handler for `method` and `path`.
    pub fn find(&self, method: &Method, path: &str) -> Result<RouteMatch<'_, H>, MatchError> {
        let segments = split_path(path, &self.options);
        let mut search = Search::new(Some(method), &segments);

        match search.walk(&self.root, 0) {
            Some(hit) => Ok(hit.into_match(&search.captures, &segments)),
            None if search.allowed.is_empty() => Err(MatchError::NotFound),
            None => Err(MatchError::MethodNotAllowed {
                allowed: search.into_allowed(),
            }),
        }
    }

    /// Methods with a route matching `path`, sorted and de-duplicated.
    ///
    /// Empty when nothing matches the path under any method.
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let segments = split_path(path, &self.options);
        let mut search = Search::new(None, &segments);
        search.walk(&self.root, 0);
        search.into_allowed()
    }
}

/// Where a successful search ended.
struct Hit<'t, H> {
    endpoint: &'t Endpoint<H>,
    /// Depth at which a wildcard took over, if one did.
    wildcard_from: Option<usize>,
}

impl<'t, H> Hit<'t, H> {
    fn into_match(self, captures: &[usize], segments: &[PathSegment<'_>]) -> RouteMatch<'t, H> {
        let names = &self.endpoint.names;
        let mut params = Params::with_capacity(names.len());

        for (name, &index) in names.iter().zip(captures) {
            params.push(name.clone(), segments[index].value.clone().into_owned());
        }
        if let (Some(from), Some(name)) = (self.wildcard_from, names.last()) {
            let rest = segments[from..]
                .iter()
                .map(|segment| &*segment.value)
                .collect::<Vec<_>>()
                .join("/");
            params.push(name.clone(), rest);
        }

        RouteMatch {
            handler: &self.endpoint.handler,
            template: &self.endpoint.template,
            params,
        }
    }
}

struct Search<'s, 'p> {
    /// `None` collects allowed methods without ever succeeding.
    method: Option<&'s Method>,
    segments: &'s [PathSegment<'p>],
    captures: Vec<usize>,
    allowed: Vec<Method>,
}

impl<'s, 'p> Search<'s, 'p> {
    fn new(method: Option<&'s Method>, segments: &'s [PathSegment<'p>]) -> Self {
        Self {
            method,
            segments,
            captures: Vec::with_capacity(segments.len()),
            allowed: Vec::new(),
        }
    }

    fn walk<'t, H>(&mut self, node: &'t Node<H>, depth: usize) -> Option<Hit<'t, H>> {
        let segments = self.segments;
        let Some(segment) = segments.get(depth) else {
            if let Some(endpoint) = self.accept(&node.endpoints) {
                return Some(Hit {
                    endpoint,
                    wildcard_from: None,
                });
            }
            return self.try_wildcard(node, depth);
        };

        if let Some(child) = node.statics.get(&*segment.key) {
            if let Some(hit) = self.walk(child, depth + 1) {
                return Some(hit);
            }
        }

        if let Some(child) = &node.param {
            if !segment.value.is_empty() {
                self.captures.push(depth);
                if let Some(hit) = self.walk(child, depth + 1) {
                    return Some(hit);
                }
                self.captures.pop();
            }
        }

        self.try_wildcard(node, depth)
    }

    fn try_wildcard<'t, H>(&mut self, node: &'t Node<H>, depth: usize) -> Option<Hit<'t, H>> {
        let wildcard = node.wildcard.as_ref()?;
        self.accept(wildcard).map(|endpoint| Hit {
            endpoint,
            wildcard_from: Some(depth),
        })
    }

    /// Return the endpoint for the requested method, or remember the
    /// methods that are registered here.
    fn accept<'t, H>(&mut self, endpoints: &'t Endpoints<H>) -> Option<&'t Endpoint<H>> {
        if let Some(endpoint) = self.method.and_then(|method| endpoints.get(method)) {
            return Some(endpoint);
        }
        self.allowed.extend(endpoints.methods().cloned());
        None
    }

    fn into_allowed(mut self) -> Vec<Method> {
        self.allowed.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        self.allowed.dedup();
        self.allowed
    }
}
