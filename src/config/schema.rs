//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router
//! server. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::routing::RouterOptions;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address, concurrency).
    pub listener: ListenerConfig,

    /// Matching options applied to every route.
    pub router: RouterOptions,

    /// Route definitions, in any order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum requests handled concurrently (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// A single route: method(s), path template, handler identifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Optional label for logs.
    #[serde(default)]
    pub name: Option<String>,

    /// Single HTTP method (e.g. "GET").
    #[serde(default)]
    pub method: Option<String>,

    /// Several HTTP methods sharing one handler.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Path template, e.g. "/users/:id" or "/static/*path".
    pub path: String,

    /// Opaque handler identifier returned on match.
    pub handler: String,
}

impl RouteConfig {
    /// Shorthand for a single-method route.
    pub fn new(method: &str, path: &str, handler: &str) -> Self {
        Self {
            name: None,
            method: Some(method.to_string()),
            methods: Vec::new(),
            path: path.to_string(),
            handler: handler.to_string(),
        }
    }

    /// All method tokens named by this route, `method` first.
    pub fn method_tokens(&self) -> impl Iterator<Item = &str> {
        self.method
            .iter()
            .chain(self.methods.iter())
            .map(String::as_str)
    }

    /// Label used in logs and validation messages.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.path)
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
