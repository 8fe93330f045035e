//! Configuration loading for the KG build.
//! Reads cerebryx.toml from the current directory or the path in the
//! CEREBRYX_CONFIG env var; individual directories can be overridden with
//! CEREBRYX_*_DIR variables. Everything has a sensible default so the
//! pipeline runs from a data checkout without any config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use cerebryx_common::error::{KgError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory holding the processed ontology subset tables.
    pub ontology_dir: PathBuf,
    /// Directory holding the processed AlzForum site tables.
    pub site_dir: PathBuf,
    /// Directory the canonical node/edge tables are written to.
    pub output_dir: PathBuf,
    /// Directory the bulk-import CSVs are written to.
    pub export_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            ontology_dir: PathBuf::from("ontology/processed"),
            site_dir: PathBuf::from("alzforum/processed"),
            output_dir: PathBuf::from("kg_build/output"),
            export_dir: PathBuf::from("neo4j_import"),
        }
    }
}

impl BuildConfig {
    /// Load configuration: cerebryx.toml if present, then env overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var("CEREBRYX_CONFIG").unwrap_or_else(|_| "cerebryx.toml".to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(Path::new(&path))?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| KgError::Config(format!("{}: {}", path.display(), e)))
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("CEREBRYX_ONTOLOGY_DIR") {
            self.ontology_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CEREBRYX_SITE_DIR") {
            self.site_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CEREBRYX_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("CEREBRYX_EXPORT_DIR") {
            self.export_dir = PathBuf::from(v);
        }
    }

    /// Canonical node table path for a label (e.g. Disease -> nodes_disease.csv).
    pub fn node_table_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(format!("nodes_{}.csv", label.to_lowercase()))
    }

    /// Canonical edge table path for a relationship type.
    pub fn edge_table_path(&self, rel_type: &str) -> PathBuf {
        self.output_dir.join(format!("edges_{}.csv", rel_type.to_lowercase()))
    }
}
