//! Neo4j bulk-import export.
//!
//! Pure, order-preserving transform over whatever canonical node/edge
//! tables exist on disk: the identifier columns are renamed to carry the
//! node label (`id:ID(Label)`) or the edge endpoints' labels
//! (`source_id:START_ID(Source)`, `target_id:END_ID(Target)`) so the
//! import tool can disambiguate identifier namespaces per label.
//!
//! Column-position invariants are validated before transforming: a node
//! table must lead with `id`, an edge table with `source_id, target_id`.
//! A violation is fatal — silently misaligned columns would corrupt every
//! downstream edge. Missing files are skipped; not every declared schema
//! entry has data in every run.

use serde::Serialize;
use tracing::info;

use cerebryx_common::error::{KgError, Result};
use cerebryx_common::table::Table;
use cerebryx_schema::SchemaRegistry;

use crate::config::BuildConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub file: String,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportManifest {
    pub nodes: Vec<ExportEntry>,
    pub edges: Vec<ExportEntry>,
}

/// Export all present node tables. Returns one entry per written file.
pub fn export_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Vec<ExportEntry>> {
    let mut out = Vec::new();

    for label in registry.node_labels() {
        let slug = label.to_lowercase();
        let src_path = cfg.node_table_path(label);
        if !src_path.exists() {
            continue;
        }

        let table = Table::read_csv(&src_path)?;
        let columns = table.columns();
        if columns.is_empty() {
            continue;
        }
        if columns.first().map(String::as_str) != Some("id") {
            return Err(KgError::SchemaViolation(format!(
                "Expected first column of {} to be 'id', got '{}'",
                src_path.display(),
                columns.first().map(String::as_str).unwrap_or("<none>")
            )));
        }

        let mut renamed: Vec<String> = columns.to_vec();
        renamed[0] = format!("id:ID({})", label);
        let exported = table.with_renamed_columns(renamed)?;

        let file = format!("neo4j_nodes_{}.csv", slug);
        exported.write_csv(&cfg.export_dir.join(&file))?;
        out.push(ExportEntry {
            name: label.to_string(),
            file,
            rows: exported.len(),
        });
    }

    Ok(out)
}

/// Export all present edge tables. Returns one entry per written file.
pub fn export_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Vec<ExportEntry>> {
    let mut out = Vec::new();

    for rel_type in registry.edge_types() {
        let schema = registry
            .edge_schema(rel_type)
            .ok_or_else(|| KgError::UnknownEdgeType(rel_type.to_string()))?;
        let slug = rel_type.to_lowercase();
        let src_path = cfg.edge_table_path(rel_type);
        if !src_path.exists() {
            continue;
        }

        let table = Table::read_csv(&src_path)?;
        let columns = table.columns();
        if columns.is_empty() {
            continue;
        }
        if columns.len() < 2
            || columns[0] != "source_id"
            || columns[1] != "target_id"
        {
            return Err(KgError::SchemaViolation(format!(
                "Expected first two columns of {} to be 'source_id', 'target_id'",
                src_path.display()
            )));
        }

        let mut renamed: Vec<String> = columns.to_vec();
        renamed[0] = format!("source_id:START_ID({})", schema.source_label);
        renamed[1] = format!("target_id:END_ID({})", schema.target_label);
        let exported = table.with_renamed_columns(renamed)?;

        let file = format!("neo4j_edges_{}.csv", slug);
        exported.write_csv(&cfg.export_dir.join(&file))?;
        out.push(ExportEntry {
            name: rel_type.to_string(),
            file,
            rows: exported.len(),
        });
    }

    Ok(out)
}

/// Export nodes then edges and write a row-count manifest alongside them.
pub fn export_all(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<ExportManifest> {
    std::fs::create_dir_all(&cfg.export_dir)?;

    let nodes = export_nodes(cfg, registry)?;
    info!(files = nodes.len(), "Exported node CSVs");

    let edges = export_edges(cfg, registry)?;
    info!(files = edges.len(), "Exported edge CSVs");

    let manifest = ExportManifest { nodes, edges };
    let json = serde_json::to_string_pretty(&manifest)
        .map_err(|e| KgError::Other(e.into()))?;
    std::fs::write(cfg.export_dir.join("import_manifest.json"), json)?;

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config(root: &std::path::Path) -> BuildConfig {
        BuildConfig {
            ontology_dir: root.join("ontology"),
            site_dir: root.join("site"),
            output_dir: root.join("out"),
            export_dir: root.join("export"),
        }
    }

    #[test]
    fn test_node_export_renames_id_only() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture_config(dir.path());
        std::fs::create_dir_all(&cfg.output_dir).unwrap();

        let mut t = Table::new(vec!["id", "label", "source"]);
        t.push_record(&[
            ("id", "MONDO:0004975".into()),
            ("label", "Alzheimer disease".into()),
            ("source", "MONDO".into()),
        ]);
        t.write_csv(&cfg.node_table_path("Disease")).unwrap();

        let registry = SchemaRegistry::new();
        let manifest = export_all(&cfg, &registry).unwrap();
        assert_eq!(manifest.nodes.len(), 1);
        assert_eq!(manifest.nodes[0].rows, 1);

        let exported =
            Table::read_csv(&cfg.export_dir.join("neo4j_nodes_disease.csv")).unwrap();
        assert_eq!(
            exported.columns(),
            &["id:ID(Disease)", "label", "source"]
        );
        let row = exported.iter().next().unwrap();
        assert_eq!(row.get("id:ID(Disease)"), "MONDO:0004975");
        assert_eq!(row.get("label"), "Alzheimer disease");
    }

    #[test]
    fn test_edge_export_renames_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture_config(dir.path());
        std::fs::create_dir_all(&cfg.output_dir).unwrap();

        let mut t = Table::new(vec!["source_id", "target_id", "direction"]);
        t.push_record(&[
            ("source_id", "MONDO:0004975".into()),
            ("target_id", "abeta42_csf".into()),
            ("direction", "decreased".into()),
        ]);
        t.write_csv(&cfg.edge_table_path("HAS_BIOMARKER")).unwrap();

        let registry = SchemaRegistry::new();
        export_all(&cfg, &registry).unwrap();

        let exported =
            Table::read_csv(&cfg.export_dir.join("neo4j_edges_has_biomarker.csv")).unwrap();
        assert_eq!(
            exported.columns(),
            &[
                "source_id:START_ID(Disease)",
                "target_id:END_ID(Biomarker)",
                "direction"
            ]
        );
    }

    #[test]
    fn test_misaligned_node_table_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture_config(dir.path());
        std::fs::create_dir_all(&cfg.output_dir).unwrap();

        let mut t = Table::new(vec!["label", "id"]);
        t.push_record(&[("label", "x".into()), ("id", "Y:1".into())]);
        t.write_csv(&cfg.node_table_path("Disease")).unwrap();

        let registry = SchemaRegistry::new();
        let err = export_all(&cfg, &registry).unwrap_err();
        assert!(matches!(err, KgError::SchemaViolation(_)));
    }

    #[test]
    fn test_missing_tables_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = fixture_config(dir.path());
        let registry = SchemaRegistry::new();
        let manifest = export_all(&cfg, &registry).unwrap();
        assert!(manifest.nodes.is_empty());
        assert!(manifest.edges.is_empty());
    }
}
