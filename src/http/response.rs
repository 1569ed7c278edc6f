//! Rendering lookup outcomes as HTTP responses.
//!
//! # Responsibilities
//! - 200 with the handler identifier and parameters on a match
//! - 404 when nothing matches the path
//! - 405 with an `Allow` header when only other methods match
//!
//! # Design Decisions
//! - JSON bodies everywhere so clients can rely on one shape per status

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::routing::{MatchError, Params, RouteMatch};

#[derive(Debug, Serialize)]
pub struct MatchBody<'a> {
    pub handler: &'a str,
    pub route: &'a str,
    pub params: &'a Params,
    pub request_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<&'a str>>,
    pub request_id: &'a str,
}

/// Render a successful match.
pub fn matched(found: &RouteMatch<'_, String>, request_id: &str) -> Response {
    let body = MatchBody {
        handler: found.handler(),
        route: found.template(),
        params: found.params(),
        request_id,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Render a failed lookup as 404 or 405.
pub fn unmatched(err: &MatchError, request_id: &str) -> Response {
    let status = err.status_code();
    let allowed = match err {
        MatchError::NotFound => None,
        MatchError::MethodNotAllowed { allowed } => {
            Some(allowed.iter().map(|m| m.as_str()).collect())
        }
    };
    let body = ErrorBody {
        error: err.to_string(),
        status: status.as_u16(),
        allowed,
        request_id,
    };

    let mut response = (status, Json(body)).into_response();
    if let Some(allow) = err
        .allow_header()
        .and_then(|value| HeaderValue::from_str(&value).ok())
    {
        response.headers_mut().insert(header::ALLOW, allow);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_not_found_has_no_allow_header() {
        let response = unmatched(&MatchError::NotFound, "r1");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(header::ALLOW).is_none());
    }

    #[test]
    fn test_method_not_allowed_sets_allow() {
        let err = MatchError::MethodNotAllowed {
            allowed: vec![Method::GET, Method::HEAD],
        };
        let response = unmatched(&err, "r1");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, HEAD");
    }
}
