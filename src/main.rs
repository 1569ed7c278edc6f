//! segment-router server
//!
//! Serves a configured route table over HTTP: each request is matched by
//! method and path and answered with the matched handler identifier and
//! its extracted parameters.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request           ┌──────────────────────────────────────────────┐
//!     ─────────────────────────┼─▶ http::server ──▶ RouteTable::load()        │
//!                              │                        │                     │
//!                              │                        ▼                     │
//!                              │                  RouteTree::find            │
//!     Client Response          │                        │                     │
//!     ◀────────────────────────┼── http::response ◀─────┘                     │
//!                              │                                              │
//!                              │  config file ──▶ watcher ──▶ compile ──▶ publish
//!                              └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use segment_router::lifecycle::startup::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Express-style HTTP route matcher", long_about = None)]
struct Args {
    /// Path to the TOML configuration file (watched for changes).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    startup::run(StartupOptions {
        config_path: args.config,
        bind_address: args.bind,
    })
    .await
}
