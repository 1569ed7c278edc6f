//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;

use segment_router::config::{RouteConfig, RouterConfig};
use segment_router::http::HttpServer;
use segment_router::lifecycle::Shutdown;

/// A config serving a small users/files API.
pub fn sample_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.routes = vec![
        RouteConfig::new("GET", "/", "index"),
        RouteConfig::new("GET", "/users", "users.list"),
        RouteConfig::new("POST", "/users", "users.create"),
        RouteConfig::new("GET", "/users/new", "users.form"),
        RouteConfig::new("GET", "/users/:id", "users.show"),
        RouteConfig::new("DELETE", "/users/:id", "users.delete"),
        RouteConfig::new("GET", "/users/:id/posts/:post", "posts.show"),
        RouteConfig::new("GET", "/files/:name", "files.one"),
        RouteConfig::new("GET", "/files/*rest", "files.tree"),
    ];
    config
}

/// A running server plus the handles needed to drive and stop it.
#[allow(dead_code)]
pub struct RunningServer {
    pub addr: SocketAddr,
    pub updates: mpsc::UnboundedSender<RouterConfig>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
}

/// Start a server for `config` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(config: RouterConfig) -> RunningServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let (updates, config_updates) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    RunningServer {
        addr,
        updates,
        shutdown,
        handle,
    }
}
