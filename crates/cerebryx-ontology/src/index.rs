//! Generic normalised-term → canonical-ID index over one table.

use std::collections::HashMap;

use cerebryx_common::error::{KgError, Result};
use cerebryx_common::table::Table;
use cerebryx_common::text::{normalise, split_synonyms};

/// Which columns of a table feed the index.
#[derive(Debug, Clone)]
pub struct IndexSpec {
    /// Short source name for diagnostics (e.g. "MONDO", "HGNC").
    pub name: &'static str,
    /// Column holding the canonical ID. Rows with an empty ID are excluded.
    pub id_col: &'static str,
    /// Columns treated as canonical labels.
    pub label_cols: &'static [&'static str],
    /// Columns holding pipe-delimited synonym strings.
    pub synonym_cols: &'static [&'static str],
    /// Columns with additional term-like values (e.g. gene_symbol).
    pub extra_term_cols: &'static [&'static str],
}

/// Index for one table: normalised term → list of canonical IDs.
///
/// A term may map to multiple IDs; `lookup` returns all of them in
/// first-seen order and the caller decides how to handle ambiguity.
#[derive(Debug, Clone)]
pub struct TermIndex {
    name: String,
    term_to_ids: HashMap<String, Vec<String>>,
    n_rows: usize,
}

impl TermIndex {
    pub fn from_table(table: &Table, spec: &IndexSpec) -> Result<Self> {
        if !table.has_column(spec.id_col) {
            return Err(KgError::SchemaViolation(format!(
                "[{}] id column '{}' not found in table",
                spec.name, spec.id_col
            )));
        }

        let mut term_to_ids: HashMap<String, Vec<String>> = HashMap::new();
        let mut n_rows = 0usize;

        let mut add_term = |term: &str, oid: &str| {
            let key = normalise(term);
            if key.is_empty() {
                return;
            }
            let bucket = term_to_ids.entry(key).or_default();
            if !bucket.iter().any(|existing| existing == oid) {
                bucket.push(oid.to_string());
            }
        };

        for row in table.iter() {
            let oid = match row.get_non_empty(spec.id_col) {
                Some(oid) => oid,
                None => continue,
            };
            n_rows += 1;

            for col in spec.label_cols {
                if let Some(val) = row.get_non_empty(col) {
                    add_term(val, oid);
                }
            }
            for col in spec.synonym_cols {
                if let Some(val) = row.get_non_empty(col) {
                    for syn in split_synonyms(val) {
                        add_term(&syn, oid);
                    }
                }
            }
            for col in spec.extra_term_cols {
                if let Some(val) = row.get_non_empty(col) {
                    add_term(val, oid);
                }
            }
        }

        Ok(Self {
            name: spec.name.to_string(),
            term_to_ids,
            n_rows,
        })
    }

    /// Matching IDs for a text term. Empty slice means no match.
    pub fn lookup(&self, term: &str) -> &[String] {
        let key = normalise(term);
        self.term_to_ids.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True iff the term has at least one matching ID.
    pub fn has(&self, term: &str) -> bool {
        !self.lookup(term).is_empty()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Indexed rows (rows with a canonical ID).
    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    /// Distinct normalised terms.
    pub fn term_count(&self) -> usize {
        self.term_to_ids.len()
    }
}
