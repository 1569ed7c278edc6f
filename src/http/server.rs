//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app: every request goes to `dispatch`
//! - Wire up middleware (request ID, tracing, timeout, concurrency limit)
//! - Serve until shutdown
//! - Apply configuration updates by publishing a freshly compiled tree

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{compile_routes, ConfigError, RouterConfig};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::RouteTable;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable<String>>,
}

/// HTTP front-end for the router.
pub struct HttpServer {
    app: Router,
    table: Arc<RouteTable<String>>,
    config: RouterConfig,
}

impl HttpServer {
    /// Compile the configured routes and build the app.
    pub fn new(config: RouterConfig) -> Result<Self, ConfigError> {
        let tree = compile_routes(&config)?;
        metrics::record_route_count(tree.len());
        for route in tree.routes() {
            tracing::debug!(method = %route.method, template = %route.template, "Serving route");
        }

        let table = Arc::new(RouteTable::new(tree));
        let state = AppState {
            table: table.clone(),
        };
        let app = Self::build_app(&config, state);

        Ok(Self { app, table, config })
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(ConcurrencyLimitLayer::new(config.listener.max_connections))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The app, for embedding or driving directly in tests.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Shared handle to the published routes.
    pub fn table(&self) -> Arc<RouteTable<String>> {
        self.table.clone()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires, applying config updates
    /// as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.load().len(),
            "HTTP server starting"
        );

        let table = self.table.clone();
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let _ = apply_config(&table, &config);
            }
        });

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Compile `config` and publish it; on error the current tree keeps serving.
///
/// Listener, timeout and observability settings are fixed at startup and
/// are not affected.
pub fn apply_config(table: &RouteTable<String>, config: &RouterConfig) -> Result<usize, ConfigError> {
    match compile_routes(config) {
        Ok(tree) => {
            let routes = tree.len();
            table.publish(tree);
            metrics::record_reload(true);
            metrics::record_route_count(routes);
            tracing::info!(routes, "Configuration reloaded");
            Ok(routes)
        }
        Err(e) => {
            metrics::record_reload(false);
            tracing::error!(error = %e, "Reload rejected. Keeping current routes.");
            Err(e)
        }
    }
}

/// Route every request through the published tree.
async fn dispatch(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let started = Instant::now();
    let request_id = request_id(&headers);
    let tree = state.table.load();

    match tree.find(&method, uri.path()) {
        Ok(found) => {
            metrics::record_match(metrics::outcome_label(Ok(())), started);
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %uri.path(),
                handler = %found.handler(),
                params = %found.params(),
                "Route matched"
            );
            response::matched(&found, request_id)
        }
        Err(err) => {
            metrics::record_match(metrics::outcome_label(Err(&err)), started);
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %uri.path(),
                error = %err,
                "No route matched"
            );
            response::unmatched(&err, request_id)
        }
    }
}
