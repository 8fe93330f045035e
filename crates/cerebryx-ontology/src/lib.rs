//! cerebryx-ontology — Term indexing over the curated ontology subset tables.
//!
//! Builds small in-memory indices mapping normalised text terms (labels,
//! synonyms, symbols) to canonical ontology IDs, for fast string → ID lookup
//! during graph construction.
//!
//! Intentionally simple and deterministic: no fuzzy matching, no external
//! services — exact lookups on normalised strings only.

pub mod catalog;
pub mod index;

pub use catalog::OntologyCatalog;
pub use index::{IndexSpec, TermIndex};
