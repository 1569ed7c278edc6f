//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check every route's method tokens and path template
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Shape conflicts between routes are left to the registry, which is the
//!   only place that knows the tree

use std::net::SocketAddr;

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::routing::{PathTemplate, TemplateError};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

const STANDARD_METHODS: [Method; 9] = [
    Method::GET,
    Method::HEAD,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::PATCH,
    Method::OPTIONS,
    Method::CONNECT,
    Method::TRACE,
];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} `{value}`")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("unknown log level `{0}`")]
    UnknownLogLevel(String),

    #[error("route `{route}` names no HTTP method")]
    MissingMethod { route: String },

    #[error("route `{route}` has invalid HTTP method `{method}`")]
    InvalidMethod { route: String, method: String },

    #[error("route `{route}` has an empty handler")]
    EmptyHandler { route: String },

    #[error("route `{route}` has invalid path: {source}")]
    InvalidTemplate {
        route: String,
        #[source]
        source: TemplateError,
    },
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero("listener.max_connections"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for route in &config.routes {
        let label = route.label().to_string();

        if route.method_tokens().next().is_none() {
            errors.push(ValidationError::MissingMethod {
                route: label.clone(),
            });
        }
        for token in route.method_tokens() {
            if parse_method(token).is_none() {
                errors.push(ValidationError::InvalidMethod {
                    route: label.clone(),
                    method: token.to_string(),
                });
            }
        }
        if route.handler.trim().is_empty() {
            errors.push(ValidationError::EmptyHandler {
                route: label.clone(),
            });
        }
        if let Err(source) = PathTemplate::parse(&route.path, &config.router) {
            errors.push(ValidationError::InvalidTemplate {
                route: label,
                source,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a method token. Standard verbs are accepted in any case; extension
/// tokens are taken as written.
pub fn parse_method(token: &str) -> Option<Method> {
    let upper = token.to_ascii_uppercase();
    match Method::from_bytes(upper.as_bytes()) {
        Ok(method) if is_standard(&method) => Some(method),
        _ => Method::from_bytes(token.as_bytes()).ok(),
    }
}

fn is_standard(method: &Method) -> bool {
    STANDARD_METHODS.contains(method)
}
