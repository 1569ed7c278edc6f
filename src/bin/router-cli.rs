use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use segment_router::config::validation::parse_method;
use segment_router::config::{compile_routes, load_config};
use segment_router::RouteTree;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Inspect and exercise a segment-router configuration offline", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "router.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config and compile its routes
    Check,
    /// List compiled routes
    Routes,
    /// Show which handler a request would reach
    Match {
        /// HTTP method, e.g. GET
        method: String,
        /// Request path, e.g. /users/42
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<Value, Box<dyn std::error::Error>> {
    let config = load_config(&cli.config)?;
    let tree = compile_routes(&config)?;

    match &cli.command {
        Commands::Check => Ok(json!({
            "status": "ok",
            "routes": tree.len(),
        })),
        Commands::Routes => Ok(routes(&tree)),
        Commands::Match { method, path } => {
            let method = parse_method(method).ok_or_else(|| format!("invalid HTTP method `{}`", method))?;
            Ok(match tree.find(&method, path) {
                Ok(found) => json!({
                    "status": 200,
                    "handler": found.handler(),
                    "route": found.template(),
                    "params": found.params(),
                }),
                Err(err) => json!({
                    "status": err.status_code().as_u16(),
                    "error": err.to_string(),
                    "allowed": tree.allowed_methods(path).iter().map(|m| m.as_str()).collect::<Vec<_>>(),
                }),
            })
        }
    }
}

fn routes(tree: &RouteTree<String>) -> Value {
    tree.routes()
        .into_iter()
        .map(|route| json!({ "method": route.method.as_str(), "template": &*route.template }))
        .collect()
}
