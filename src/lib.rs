//! Express-style request routing.
//!
//! Route templates such as `/users/:id` and `/static/*path` are registered
//! into a [`RouteRegistry`], frozen into an immutable [`RouteTree`], and
//! matched per request in time proportional to path depth.
//!
//! ```
//! use axum::http::Method;
//! use segment_router::RouteRegistry;
//!
//! let mut registry = RouteRegistry::new();
//! registry.get("/users/:id", "users.show").unwrap();
//! registry.get("/users/new", "users.form").unwrap();
//! let tree = registry.build();
//!
//! let found = tree.find(&Method::GET, "/users/42").unwrap();
//! assert_eq!(*found.handler(), "users.show");
//! assert_eq!(found.params().get("id"), Some("42"));
//! ```

// Core
pub mod routing;

// Serving
pub mod config;
pub mod http;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{
    MatchError, Params, RouteError, RouteMatch, RouteRegistry, RouteTable, RouteTree, RouterOptions,
};
