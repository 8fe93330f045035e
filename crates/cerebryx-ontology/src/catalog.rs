//! Cached per-process indexes over the ontology subset tables.
//!
//! The catalog is an explicitly constructed value owned by the caller —
//! tests get fresh state by constructing a new catalog. Each accessor
//! builds its index once and caches it; passing `reload = true` forces a
//! rebuild, which is the only invalidation mechanism.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use cerebryx_common::error::Result;
use cerebryx_common::table::Table;

use crate::index::{IndexSpec, TermIndex};

const DISEASE_SPEC: IndexSpec = IndexSpec {
    name: "MONDO",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &["synonyms"],
    extra_term_cols: &[],
};

const DRUG_SPEC: IndexSpec = IndexSpec {
    name: "ChEBI",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &["synonyms"],
    extra_term_cols: &[],
};

// HGNC uses hgnc_id as canonical ID; symbol + name are both labels,
// alias/prev symbols come in pipe-delimited.
const GENE_SPEC: IndexSpec = IndexSpec {
    name: "HGNC",
    id_col: "hgnc_id",
    label_cols: &["symbol", "name"],
    synonym_cols: &["alias_symbol", "prev_symbol"],
    extra_term_cols: &[],
};

const PROTEIN_SPEC: IndexSpec = IndexSpec {
    name: "PRO",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &["synonyms"],
    extra_term_cols: &["gene_symbol"],
};

// GO subset carries no synonyms column.
const PATHWAY_SPEC: IndexSpec = IndexSpec {
    name: "GO",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &[],
    extra_term_cols: &[],
};

const PHENOTYPE_SPEC: IndexSpec = IndexSpec {
    name: "HPO",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &["synonyms"],
    extra_term_cols: &[],
};

/// Catalog of term indexes over one directory of ontology subset tables.
#[derive(Debug)]
pub struct OntologyCatalog {
    dir: PathBuf,
    cache: HashMap<&'static str, TermIndex>,
}

impl OntologyCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn disease_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("diseases_mondo.csv", &DISEASE_SPEC, reload)
    }

    pub fn drug_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("drugs_chebi.csv", &DRUG_SPEC, reload)
    }

    pub fn gene_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("genes_hgnc.csv", &GENE_SPEC, reload)
    }

    pub fn protein_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("proteins_pro.csv", &PROTEIN_SPEC, reload)
    }

    pub fn pathway_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("pathways_go.csv", &PATHWAY_SPEC, reload)
    }

    pub fn phenotype_index(&mut self, reload: bool) -> Result<&TermIndex> {
        self.index_for("phenotypes_hpo.csv", &PHENOTYPE_SPEC, reload)
    }

    fn index_for(
        &mut self,
        file: &'static str,
        spec: &IndexSpec,
        reload: bool,
    ) -> Result<&TermIndex> {
        if reload || !self.cache.contains_key(file) {
            let path = self.dir.join(file);
            let table = Table::read_csv(&path)?;
            let index = TermIndex::from_table(&table, spec)?;
            debug!(
                source = spec.name,
                rows = index.row_count(),
                terms = index.term_count(),
                "Built ontology index"
            );
            self.cache.insert(file, index);
        }
        // Just inserted or already present.
        Ok(&self.cache[file])
    }
}
