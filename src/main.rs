//! Route a free-text request to welfare services and print the result as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use graphroute::{load_graph, Config, Router};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "graphroute", version, about)]
struct Args {
    /// Nodes CSV (default: data.nodes_path from config, else data/nodes.csv).
    #[arg(long)]
    nodes: Option<PathBuf>,

    /// Edges CSV (default: data.edges_path from config, else data/edges.csv).
    #[arg(long)]
    edges: Option<PathBuf>,

    /// User request, e.g. "ho subìto violenza, ho paura".
    #[arg(long)]
    query: String,

    /// Config file (overrides GRAPHROUTE_CONFIG and ./config.toml).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The logger's level comes from the config, so anything logged while
    // loading it (e.g. the missing config.toml notice) is dropped.
    let config = Config::resolve(args.config.as_deref())?;

    // Logs go to stderr; stdout carries only the routing JSON.
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.graphroute.log_level.as_str()),
    )
    .init();

    let nodes_path = args.nodes.unwrap_or_else(|| config.data.nodes_path.clone());
    let edges_path = args.edges.unwrap_or_else(|| config.data.edges_path.clone());

    let graph = load_graph(&nodes_path, &edges_path).with_context(|| {
        format!(
            "Failed to load graph from {} and {}",
            nodes_path.display(),
            edges_path.display()
        )
    })?;

    let router = Router::new(config.routing);
    let result = router.route(&graph, &args.query);
    log::info!("Routed query to {} service(s)", result.len());

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
