//! cerebryx-kg — Knowledge-graph construction from ontology and site tables.
//!
//! Compiles curated ontology subsets (MONDO, ChEBI, HGNC, PRO, GO, HPO) and
//! AlzForum-derived entity/relationship tables into canonical node/edge CSVs
//! shaped by `cerebryx-schema`, then rewrites them into Neo4j bulk-import
//! form. Node builders run to completion before any edge builder; the
//! exporter is a pure transform over whatever tables are present.

pub mod config;
pub mod edges;
pub mod export;
pub mod matcher;
pub mod nodes;
pub mod pipeline;

pub use config::BuildConfig;
pub use pipeline::{run_all, run_edges, run_export, run_nodes};
