//! Build orchestration.
//!
//! Node builders run to completion for every label before any edge builder
//! starts — edges are only created between nodes that already exist on
//! disk. The exporter runs last as a pure transform.
//!
//! Skip policy: a node label or edge type whose raw source table is absent
//! is logged and skipped so its siblings still run; a missing *node* table
//! under an edge builder aborts the run, since the graph would come out
//! structurally incomplete.

use tracing::{info, warn};

use cerebryx_common::error::{KgError, Result};
use cerebryx_schema::SchemaRegistry;

use crate::config::BuildConfig;
use crate::edges::edge_builders;
use crate::export::export_all;
use crate::nodes::node_builders;

/// Build and write every node table.
pub fn run_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    std::fs::create_dir_all(&cfg.output_dir)?;

    for (label, builder) in node_builders() {
        match builder(cfg, registry) {
            Ok(table) => {
                let path = cfg.node_table_path(label);
                table.write_csv(&path)?;
                info!(label, rows = table.len(), path = %path.display(), "Wrote node table");
            }
            Err(e @ (KgError::MissingInput(_) | KgError::NoSourceData(_))) => {
                warn!(label, error = %e, "Skipping node label");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Build and write every edge table. Assumes `run_nodes` already ran.
pub fn run_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    std::fs::create_dir_all(&cfg.output_dir)?;

    for (name, builder) in edge_builders() {
        match builder(cfg, registry) {
            Ok(()) => {}
            Err(e @ (KgError::MissingInput(_) | KgError::NoSourceData(_))) => {
                warn!(edge = name, error = %e, "Skipping edge type");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Rewrite canonical tables into bulk-import form.
pub fn run_export(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let manifest = export_all(cfg, registry)?;
    info!(
        node_files = manifest.nodes.len(),
        edge_files = manifest.edges.len(),
        "Export complete"
    );
    Ok(())
}

/// Full pipeline: nodes, then edges, then export.
pub fn run_all(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    run_nodes(cfg, registry)?;
    run_edges(cfg, registry)?;
    run_export(cfg, registry)
}
