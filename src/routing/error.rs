//! Registration and lookup errors.

use axum::http::{Method, StatusCode};
use thiserror::Error;

use crate::routing::TemplateError;

/// Errors raised while registering routes.
///
/// Both are fatal to the `register` call that produced them and leave the
/// registry exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The template string is malformed.
    #[error("invalid route template `{template}`: {source}")]
    InvalidTemplate {
        template: String,
        #[source]
        source: TemplateError,
    },

    /// A route with the same method and shape is already registered.
    #[error("{method} {template} conflicts with already registered route {method} {existing}")]
    Conflict {
        method: Method,
        template: String,
        existing: String,
    },
}

/// Errors returned by a lookup. Both are expected outcomes, not bugs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// No template matches the path under any method.
    #[error("no route matches the request path")]
    NotFound,

    /// The path matches, but only under other methods.
    #[error("method not allowed (allowed: {})", join_methods(.allowed))]
    MethodNotAllowed { allowed: Vec<Method> },
}

impl MatchError {
    /// HTTP status the dispatch layer should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            MatchError::NotFound => StatusCode::NOT_FOUND,
            MatchError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Value for an `Allow` header, when one applies.
    pub fn allow_header(&self) -> Option<String> {
        match self {
            MatchError::NotFound => None,
            MatchError::MethodNotAllowed { allowed } => Some(join_methods(allowed)),
        }
    }
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
