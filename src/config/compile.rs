//! Compile configured routes into a route tree.

use crate::config::loader::ConfigError;
use crate::config::schema::{RouteConfig, RouterConfig};
use crate::config::validation::{parse_method, ValidationError};
use crate::routing::{RouteRegistry, RouteTree};

/// Register every configured route and freeze the result.
///
/// Fails on the first route that conflicts with an earlier one.
pub fn compile_routes(config: &RouterConfig) -> Result<RouteTree<String>, ConfigError> {
    let mut registry = RouteRegistry::with_options(config.router);

    for route in &config.routes {
        let methods = route_methods(route)?;
        registry.register_methods(&methods, &route.path, route.handler.clone())?;
    }

    Ok(registry.build())
}

fn route_methods(route: &RouteConfig) -> Result<Vec<axum::http::Method>, ConfigError> {
    let mut methods = Vec::new();
    let mut errors = Vec::new();

    for token in route.method_tokens() {
        match parse_method(token) {
            Some(method) => methods.push(method),
            None => errors.push(ValidationError::InvalidMethod {
                route: route.label().to_string(),
                method: token.to_string(),
            }),
        }
    }
    if methods.is_empty() && errors.is_empty() {
        errors.push(ValidationError::MissingMethod {
            route: route.label().to_string(),
        });
    }

    if errors.is_empty() {
        Ok(methods)
    } else {
        Err(ConfigError::Validation(errors))
    }
}
