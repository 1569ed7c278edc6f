//! Route registration.
//!
//! # Responsibilities
//! - Parse and validate route templates
//! - Insert routes into the in-progress tree
//! - Reject duplicate (method, shape) pairs instead of overwriting
//! - Freeze the result into an immutable [`RouteTree`]
//!
//! # Design Decisions
//! - `build` consumes the registry, so nothing can be registered once a tree
//!   has been handed to the matcher
//! - A failed `register` leaves the registry unchanged: templates are
//!   validated before the tree is touched, and a conflict can only occur on
//!   a path whose nodes already exist
//! - Parameter names are not part of a route's shape; `GET /a/:x` and
//!   `GET /a/:y` conflict

use std::sync::Arc;

use axum::http::Method;

use crate::routing::error::RouteError;
use crate::routing::template::PathTemplate;
use crate::routing::tree::{Endpoint, Endpoints, Node, RouteTree};
use crate::routing::RouterOptions;

/// Mutable collection of routes, built once during configuration.
#[derive(Debug)]
pub struct RouteRegistry<H> {
    root: Node<H>,
    options: RouterOptions,
    route_count: usize,
}

impl<H> Default for RouteRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteRegistry<H> {
    /// Create an empty registry with default options.
    pub fn new() -> Self {
        Self::with_options(RouterOptions::default())
    }

    pub fn with_options(options: RouterOptions) -> Self {
        Self {
            root: Node::default(),
            options,
            route_count: 0,
        }
    }

    pub fn options(&self) -> &RouterOptions {
        &self.options
    }

    /// Number of (method, template) routes registered so far.
    pub fn len(&self) -> usize {
        self.route_count
    }

    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Register `handler` for `method` requests matching `template`.
    pub fn register(&mut self, method: Method, template: &str, handler: H) -> Result<(), RouteError> {
        let parsed = self.parse(template)?;
        let slot = self.root.slot_mut(&parsed, &self.options);
        check_conflict(slot, &method, &parsed)?;

        tracing::debug!(method = %method, template = %parsed, "Route registered");
        slot.insert(method, endpoint(&parsed, handler));
        self.route_count += 1;
        Ok(())
    }

    /// Register one handler under several methods.
    ///
    /// Either every method is registered or, on conflict, none is. Repeated
    /// methods in `methods` are registered once; an empty slice only
    /// validates the template.
    pub fn register_methods(&mut self, methods: &[Method], template: &str, handler: H) -> Result<(), RouteError>
    where
        H: Clone,
    {
        let parsed = self.parse(template)?;
        if methods.is_empty() {
            return Ok(());
        }
        let slot = self.root.slot_mut(&parsed, &self.options);

        let mut unique: Vec<&Method> = Vec::with_capacity(methods.len());
        for method in methods {
            if !unique.contains(&method) {
                check_conflict(slot, method, &parsed)?;
                unique.push(method);
            }
        }

        let shared = endpoint(&parsed, ());
        for method in unique {
            tracing::debug!(method = %method, template = %parsed, "Route registered");
            slot.insert(
                method.clone(),
                Endpoint {
                    handler: handler.clone(),
                    template: shared.template.clone(),
                    names: shared.names.clone(),
                },
            );
            self.route_count += 1;
        }
        Ok(())
    }

    pub fn get(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::GET, template, handler)
    }

    pub fn post(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::POST, template, handler)
    }

    pub fn put(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::PUT, template, handler)
    }

    pub fn delete(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::DELETE, template, handler)
    }

    pub fn patch(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::PATCH, template, handler)
    }

    pub fn head(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::HEAD, template, handler)
    }

    pub fn options_route(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::OPTIONS, template, handler)
    }

    /// Freeze the registry into an immutable tree.
    pub fn build(mut self) -> RouteTree<H> {
        self.root.freeze();
        tracing::info!(routes = self.route_count, "Route tree built");
        RouteTree {
            root: self.root,
            options: self.options,
            route_count: self.route_count,
        }
    }

    fn parse(&self, template: &str) -> Result<PathTemplate, RouteError> {
        PathTemplate::parse(template, &self.options).map_err(|source| RouteError::InvalidTemplate {
            template: template.to_string(),
            source,
        })
    }
}

fn check_conflict<H>(slot: &Endpoints<H>, method: &Method, template: &PathTemplate) -> Result<(), RouteError> {
    match slot.get(method) {
        Some(existing) => Err(RouteError::Conflict {
            method: method.clone(),
            template: template.as_str().to_string(),
            existing: existing.template.to_string(),
        }),
        None => Ok(()),
    }
}

fn endpoint<H>(template: &PathTemplate, handler: H) -> Endpoint<H> {
    Endpoint {
        handler,
        template: Arc::from(template.as_str()),
        names: template.param_names().map(Arc::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::TemplateError;

    #[test]
    fn test_register_counts_routes() {
        let mut registry = RouteRegistry::new();
        registry.get("/users", "list").unwrap();
        registry.post("/users", "create").unwrap();
        registry.get("/users/:id", "show").unwrap();
        assert_eq!(registry.len(), 3);

        let tree = registry.build();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_same_shape_conflicts() {
        let mut registry = RouteRegistry::new();
        registry.get("/a/:x", 1).unwrap();

        let err = registry.get("/a/:x", 2).unwrap_err();
        assert_eq!(
            err,
            RouteError::Conflict {
                method: Method::GET,
                template: "/a/:x".into(),
                existing: "/a/:x".into(),
            }
        );

        // Parameter names are not part of the shape.
        assert!(matches!(registry.get("/a/:y", 3), Err(RouteError::Conflict { .. })));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_different_method_or_shape_is_fine() {
        let mut registry = RouteRegistry::new();
        registry.get("/a/:x", 1).unwrap();
        registry.post("/a/:x", 2).unwrap();
        registry.get("/a/:x/b", 3).unwrap();
        registry.get("/a/b", 4).unwrap();
        registry.get("/a/*rest", 5).unwrap();
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn test_wildcard_conflicts() {
        let mut registry = RouteRegistry::new();
        registry.get("/files/*rest", 1).unwrap();
        assert!(matches!(
            registry.get("/files/*path", 2),
            Err(RouteError::Conflict { .. })
        ));
    }

    #[test]
    fn test_case_insensitive_statics_conflict() {
        let mut registry = RouteRegistry::new();
        registry.get("/Users", 1).unwrap();
        assert!(registry.get("/users", 2).is_err());

        let mut sensitive = RouteRegistry::with_options(RouterOptions {
            case_sensitive: true,
            ..RouterOptions::default()
        });
        sensitive.get("/Users", 1).unwrap();
        sensitive.get("/users", 2).unwrap();
    }

    #[test]
    fn test_trailing_slash_conflicts_unless_strict() {
        let mut lenient = RouteRegistry::new();
        lenient.get("/users", 1).unwrap();
        assert!(lenient.get("/users/", 2).is_err());

        let mut strict = RouteRegistry::with_options(RouterOptions {
            trailing_slash_strict: true,
            ..RouterOptions::default()
        });
        strict.get("/users", 1).unwrap();
        strict.get("/users/", 2).unwrap();
    }

    #[test]
    fn test_invalid_template_reported() {
        let mut registry: RouteRegistry<u32> = RouteRegistry::new();
        let err = registry.get("/a/*rest/b", 1).unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidTemplate {
                template: "/a/*rest/b".into(),
                source: TemplateError::WildcardNotLast("rest".into()),
            }
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_methods_is_all_or_nothing() {
        let mut registry = RouteRegistry::new();
        registry.post("/items", "create").unwrap();

        let err = registry.register_methods(&[Method::GET, Method::POST], "/items", "any");
        assert!(matches!(err, Err(RouteError::Conflict { .. })));
        assert_eq!(registry.len(), 1);

        registry
            .register_methods(&[Method::GET, Method::HEAD, Method::GET], "/items", "read")
            .unwrap();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_register_methods_with_no_methods_leaves_tree_untouched() {
        let mut registry: RouteRegistry<&str> = RouteRegistry::new();
        registry.register_methods(&[], "/a/:x/b", "none").unwrap();
        assert!(registry.is_empty());
        assert!(registry.root.statics.is_empty());

        assert!(matches!(
            registry.register_methods(&[], "/a/*rest/b", "none"),
            Err(RouteError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_verb_helpers_register_their_method() {
        let mut registry = RouteRegistry::new();
        registry.put("/r", "put").unwrap();
        registry.delete("/r", "delete").unwrap();
        registry.patch("/r", "patch").unwrap();
        registry.head("/r", "head").unwrap();
        registry.options_route("/r", "options").unwrap();
        let tree = registry.build();

        let methods: Vec<Method> = tree.routes().into_iter().map(|route| route.method).collect();
        assert_eq!(
            methods,
            vec![Method::DELETE, Method::HEAD, Method::OPTIONS, Method::PATCH, Method::PUT]
        );
        assert_eq!(*tree.find(&Method::OPTIONS, "/r").unwrap().handler(), "options");
        assert_eq!(*tree.find(&Method::HEAD, "/r").unwrap().handler(), "head");
    }
}
