use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KgError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing input table: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("No usable source tables for {0}")]
    NoSourceData(String),

    #[error("Missing node table for label '{label}': {}", .path.display())]
    MissingNodeTable { label: String, path: PathBuf },

    #[error("Unknown node label: {0}")]
    UnknownLabel(String),

    #[error("Unknown edge type: {0}")]
    UnknownEdgeType(String),

    #[error("Schema consistency violation: {0}")]
    SchemaViolation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, KgError>;
