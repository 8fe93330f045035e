//! Cross-source matching primitives.
//!
//! Resolves free-text references from site tables to canonical node IDs in
//! the already-built node tables. Three strategies, tried by callers in a
//! fixed priority sequence with the results unioned (first-seen order,
//! deduplicated):
//!
//! 1. gene-symbol bridge (gene symbol → proteins carrying that symbol),
//! 2. exact label match,
//! 3. exact synonym match,
//!
//! plus a token-overlap fallback for pathway-like phrases. Token overlap is
//! deliberately permissive: any shared token between the normalised phrase
//! and a pathway label counts as a match. High recall, low precision; it is
//! the only link available where no controlled vocabulary covers the phrase.

use std::collections::{BTreeSet, HashMap};

use cerebryx_common::error::Result;
use cerebryx_common::table::Table;
use cerebryx_common::text::{normalise, token_set};
use cerebryx_ontology::index::{IndexSpec, TermIndex};

/// Derivational suffixes stripped before token comparison, longest first,
/// so variants of the same head noun overlap ("neuroinflammation" /
/// "neuroinflammatory" → "neuroinflamm").
const STEM_SUFFIXES: &[&str] = &["atory", "ation", "ory", "ion"];

fn stem_token(token: &str) -> String {
    for suffix in STEM_SUFFIXES {
        if let Some(stripped) = token.strip_suffix(suffix) {
            // Keep short words intact; "ion" itself is not a suffix match.
            if stripped.len() >= 4 {
                return stripped.to_string();
            }
        }
    }
    token.to_string()
}

fn stemmed_token_set(phrase: &str) -> BTreeSet<String> {
    token_set(phrase).iter().map(|t| stem_token(t)).collect()
}

const NODE_LABEL_SPEC: IndexSpec = IndexSpec {
    name: "node-labels",
    id_col: "id",
    label_cols: &["label"],
    synonym_cols: &[],
    extra_term_cols: &[],
};

const NODE_SYNONYM_SPEC: IndexSpec = IndexSpec {
    name: "node-synonyms",
    id_col: "id",
    label_cols: &[],
    synonym_cols: &["synonyms"],
    extra_term_cols: &[],
};

/// Normalised gene symbol → protein IDs carrying that symbol.
#[derive(Debug, Clone)]
pub struct GeneSymbolBridge {
    map: HashMap<String, Vec<String>>,
}

impl GeneSymbolBridge {
    pub fn from_proteins(proteins: &Table) -> Self {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        if proteins.has_column("gene_symbol") {
            for row in proteins.iter() {
                let sym = normalise(row.get("gene_symbol"));
                if sym.is_empty() {
                    continue;
                }
                let pid = row.get("id").to_string();
                map.entry(sym).or_default().push(pid);
            }
        }
        Self { map }
    }

    /// Protein IDs for a gene symbol. Empty slice means no bridge.
    pub fn proteins_for(&self, symbol: &str) -> &[String] {
        self.map
            .get(&normalise(symbol))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Token-overlap matcher over (id, label) pairs of one node table.
#[derive(Debug, Clone)]
pub struct TokenOverlapMatcher {
    targets: Vec<(String, BTreeSet<String>)>,
}

impl TokenOverlapMatcher {
    pub fn from_nodes(nodes: &Table) -> Self {
        let mut targets = Vec::new();
        for row in nodes.iter() {
            let label_norm = normalise(row.get("label"));
            if label_norm.is_empty() {
                continue;
            }
            targets.push((row.get("id").to_string(), stemmed_token_set(&label_norm)));
        }
        Self { targets }
    }

    /// IDs whose label shares at least one (stemmed) token with the phrase.
    pub fn matches(&self, phrase: &str) -> Vec<String> {
        let tokens = stemmed_token_set(&normalise(phrase));
        if tokens.is_empty() {
            return Vec::new();
        }
        self.targets
            .iter()
            .filter(|(_, target_tokens)| !tokens.is_disjoint(target_tokens))
            .map(|(id, _)| id.clone())
            .collect()
    }
}

/// Matcher over the built Protein and Pathway node tables.
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    protein_labels: TermIndex,
    protein_synonyms: TermIndex,
    gene_bridge: GeneSymbolBridge,
    pathway_overlap: TokenOverlapMatcher,
}

impl EntityMatcher {
    pub fn new(proteins: &Table, pathways: &Table) -> Result<Self> {
        Ok(Self {
            protein_labels: TermIndex::from_table(proteins, &NODE_LABEL_SPEC)?,
            protein_synonyms: TermIndex::from_table(proteins, &NODE_SYNONYM_SPEC)?,
            gene_bridge: GeneSymbolBridge::from_proteins(proteins),
            pathway_overlap: TokenOverlapMatcher::from_nodes(pathways),
        })
    }

    /// Resolve a target name to protein IDs: gene-symbol bridge first, then
    /// direct label match, then synonym match; union, first-seen dedup.
    pub fn match_protein(&self, name: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let candidates = self
            .gene_bridge
            .proteins_for(name)
            .iter()
            .chain(self.protein_labels.lookup(name))
            .chain(self.protein_synonyms.lookup(name));
        for id in candidates {
            if !out.iter().any(|seen| seen == id) {
                out.push(id.clone());
            }
        }
        out
    }

    /// Resolve a pathway-like phrase by token overlap against pathway labels.
    pub fn match_pathway(&self, phrase: &str) -> Vec<String> {
        self.pathway_overlap.matches(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protein_table() -> Table {
        let mut t = Table::new(vec!["id", "label", "gene_symbol", "synonyms"]);
        t.push_record(&[
            ("id", "PR:000004155".into()),
            ("label", "amyloid-beta precursor protein".into()),
            ("gene_symbol", "APP".into()),
            ("synonyms", "ABPP|APP".into()),
        ]);
        t.push_record(&[
            ("id", "PR:000010173".into()),
            ("label", "microtubule-associated protein tau".into()),
            ("gene_symbol", "MAPT".into()),
            ("synonyms", "tau".into()),
        ]);
        t
    }

    fn pathway_table() -> Table {
        let mut t = Table::new(vec!["id", "label"]);
        t.push_record(&[("id", "GO:0150076".into()), ("label", "neuroinflammatory response".into())]);
        t.push_record(&[("id", "GO:0048167".into()), ("label", "regulation of synaptic plasticity".into())]);
        t
    }

    #[test]
    fn test_gene_bridge_priority_then_label_then_synonym() {
        let matcher = EntityMatcher::new(&protein_table(), &pathway_table()).unwrap();
        // "APP" hits the bridge and the synonym list; the union dedups.
        assert_eq!(matcher.match_protein("APP"), vec!["PR:000004155"]);
        // Direct label match.
        assert_eq!(
            matcher.match_protein("Microtubule-associated protein tau"),
            vec!["PR:000010173"]
        );
        // Synonym-only match.
        assert_eq!(matcher.match_protein("tau"), vec!["PR:000010173"]);
        assert!(matcher.match_protein("BACE1").is_empty());
    }

    #[test]
    fn test_token_overlap_matches_shared_token_only() {
        let matcher = EntityMatcher::new(&protein_table(), &pathway_table()).unwrap();
        // Derivational variants share a stem.
        assert_eq!(
            matcher.match_pathway("neuroinflammation"),
            vec!["GO:0150076"]
        );
        assert!(matcher.match_pathway("tau aggregation").is_empty());
        // Hyphens split into tokens.
        assert_eq!(
            matcher.match_pathway("synaptic-plasticity modulation"),
            vec!["GO:0048167"]
        );
    }

    #[test]
    fn test_stem_token_keeps_short_words() {
        assert_eq!(stem_token("ion"), "ion");
        assert_eq!(stem_token("neuroinflammation"), "neuroinflamm");
        assert_eq!(stem_token("neuroinflammatory"), "neuroinflamm");
        assert_eq!(stem_token("response"), "response");
    }

    #[test]
    fn test_token_overlap_empty_phrase_matches_nothing() {
        let matcher = EntityMatcher::new(&protein_table(), &pathway_table()).unwrap();
        assert!(matcher.match_pathway("   ").is_empty());
    }
}
