//! Cerebryx — Alzheimer's knowledge-graph build pipeline.
//! Entry point for the build binary.

use tracing_subscriber::EnvFilter;

use cerebryx_kg::{run_all, run_edges, run_export, run_nodes, BuildConfig};
use cerebryx_schema::SchemaRegistry;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cerebryx=debug,info")),
        )
        .init();

    let stage = std::env::args().nth(1).unwrap_or_else(|| "all".to_string());

    let config = BuildConfig::load()?;
    let registry = SchemaRegistry::new();

    match stage.as_str() {
        "all" => run_all(&config, &registry)?,
        "nodes" => run_nodes(&config, &registry)?,
        "edges" => run_edges(&config, &registry)?,
        "export" => run_export(&config, &registry)?,
        other => {
            eprintln!("Unknown stage '{other}'");
            eprintln!("Usage: cerebryx-kg [all|nodes|edges|export]");
            std::process::exit(2);
        }
    }

    Ok(())
}
