//! cerebryx-schema — Central definition of the knowledge-graph schema.
//!
//! Declares every canonical node label and relationship type together with
//! its required/optional property lists. The build crates rely on these
//! schemas instead of hard-coding labels or columns: `all_props` fixes the
//! column order of every node/edge table the pipeline writes, and the
//! exporter derives its identifier typing from `source_label`/`target_label`.
//!
//! The registry is a plain constructed value. Build one with
//! [`SchemaRegistry::new`] and pass it where needed; there is no global.

use std::collections::HashMap;

use serde::Serialize;

/// Schema for a node label.
///
/// `required_props` must be present on every node of this label (at minimum
/// `id` and `label`); `optional_props` may be empty on any given node but the
/// column still appears in the table.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSchema {
    pub label: &'static str,
    pub description: &'static str,
    pub required_props: &'static [&'static str],
    pub optional_props: &'static [&'static str],
}

/// Schema for a relationship type.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeSchema {
    pub rel_type: &'static str,
    pub description: &'static str,
    pub source_label: &'static str,
    pub target_label: &'static str,
    pub required_props: &'static [&'static str],
    pub optional_props: &'static [&'static str],
}

fn union_props(
    required: &'static [&'static str],
    optional: &'static [&'static str],
) -> Vec<&'static str> {
    let mut seen = Vec::new();
    for p in required.iter().chain(optional.iter()) {
        if !seen.contains(p) {
            seen.push(*p);
        }
    }
    seen
}

impl NodeSchema {
    /// Order-preserving union of required then optional properties.
    /// This union is the column order of the node table.
    pub fn all_props(&self) -> Vec<&'static str> {
        union_props(self.required_props, self.optional_props)
    }
}

impl EdgeSchema {
    /// Order-preserving union of required then optional edge properties.
    /// Edge tables prepend `source_id`, `target_id` to this union.
    pub fn all_props(&self) -> Vec<&'static str> {
        union_props(self.required_props, self.optional_props)
    }
}

// ---------------------------------------------------------------------------
// Node schemas
// ---------------------------------------------------------------------------

// Every node has at least: id, label.
// *_id fields hold ontology IDs where available (MONDO, HGNC, ...).
// "source" may be a pipe-joined list of provenance tags.

const NODE_SCHEMAS: &[NodeSchema] = &[
    NodeSchema {
        label: "Disease",
        description: "Disease / disorder entities (e.g. Alzheimer disease, MCI).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "mondo_id",
            "umls_cui",
            "mesh_id",
            "icd10",
            "synonyms",
            "category",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Protein",
        description: "Proteins / gene products (e.g. APP, tau, BACE1).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "uniprot_id",
            "hgnc_id",
            "gene_symbol",
            "synonyms",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Gene",
        description: "Genes (e.g. APP, PSEN1, APOE).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "hgnc_id",
            "entrez_id",
            "ensembl_id",
            "chromosome",
            "synonyms",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Pathway",
        description: "Biological processes / pathways (mostly GO terms).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "go_id",
            "namespace",
            "synonyms",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Biomarker",
        description: "Assayable biomarkers (often fluid-based analytes).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "analyte",
            "analyte_class",
            "fluid",
            "units",
            "assay_type",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Phenotype",
        description: "Clinical signs, symptoms, and phenotypes (HPO-driven).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "hpo_id",
            "umls_cui",
            "mesh_id",
            "synonyms",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "Drug",
        description: "Therapeutics / interventions (AlzForum Therapeutics, ChEBI).",
        required_props: &["id", "label"],
        optional_props: &[
            "iri",
            "chebi_id",
            "atc_code",
            "drug_type",
            "drug_class",
            "primary_indication",
            "secondary_indications",
            "mechanism_summary",
            "status_overall",
            "approved_regions",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "RiskFactor",
        description: "Non-genetic or genetic risk / protective factors.",
        required_props: &["id", "label"],
        optional_props: &["category", "direction", "short_summary", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "Study",
        description: "Meta-analyses or clinical trial groups (optional node type).",
        required_props: &["id", "label"],
        optional_props: &["citation", "year", "pubmed_id", "doi", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "Mechanism",
        description: "Pathophysiologic mechanism or pathology (e.g. Amyloid, Tau).",
        required_props: &["id", "label"],
        optional_props: &["category", "description", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "Company",
        description: "Organisations / companies developing therapeutics.",
        required_props: &["id", "label"],
        optional_props: &["country", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "TherapyType",
        description: "Therapeutic modality (e.g. Immunotherapy (passive), Small Molecule).",
        required_props: &["id", "label"],
        optional_props: &["category", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "Fluid",
        description: "Biofluid or sample type in which biomarkers are measured.",
        required_props: &["id", "label"],
        optional_props: &["category", "source", "raw_source_ids"],
    },
    NodeSchema {
        label: "Trial",
        description: "Aggregated clinical trial record for a drug-indication pair.",
        required_props: &["id", "label"],
        optional_props: &[
            "indication",
            "trial_phase_max",
            "has_phase3",
            "status",
            "trial_count",
            "notes",
            "source",
            "raw_source_ids",
        ],
    },
    NodeSchema {
        label: "AlzPediaEntity",
        description: "AlzPedia entry representing a gene, protein, or concept.",
        required_props: &["id", "label"],
        optional_props: &[
            "url",
            "synonyms",
            "short_summary",
            "category",
            "has_function_section",
            "has_pathology_section",
            "has_genetics_section",
            "has_therapeutics_section",
            "source",
            "raw_source_ids",
        ],
    },
];

// ---------------------------------------------------------------------------
// Edge schemas
// ---------------------------------------------------------------------------

const EDGE_SCHEMAS: &[EdgeSchema] = &[
    EdgeSchema {
        rel_type: "HAS_BIOMARKER",
        description: "Biomarker evidence for a disease (e.g. CSF Aβ42 decreased in AD vs controls).",
        source_label: "Disease",
        target_label: "Biomarker",
        required_props: &["direction"],
        optional_props: &[
            "comparison",
            "disease_group",
            "control_group",
            "effect_size_type",
            "effect_size",
            "ci_lower",
            "ci_upper",
            "p_value",
            "n_studies",
            "n_cases",
            "n_controls",
            "study_id",
            "source",
            "source_text",
        ],
    },
    EdgeSchema {
        rel_type: "INCREASES_RISK_OF",
        description: "Risk factor increases risk of a disease.",
        source_label: "RiskFactor",
        target_label: "Disease",
        required_props: &["direction"],
        optional_props: &[
            "outcome",
            "population",
            "effect_size_type",
            "effect_size",
            "ci_lower",
            "ci_upper",
            "p_value",
            "n_studies",
            "quality_flags",
            "study_id",
            "source",
            "source_text",
        ],
    },
    EdgeSchema {
        rel_type: "TREATS",
        description: "Therapeutic trials / approval for a disease.",
        source_label: "Drug",
        target_label: "Disease",
        required_props: &[],
        optional_props: &[
            "status",
            "indication",
            "trial_phase_max",
            "has_phase3",
            "trial_count",
            "approved_regions",
            "source",
            "notes",
        ],
    },
    EdgeSchema {
        rel_type: "TARGETS_PROTEIN",
        description: "Therapeutic targets a specific protein (e.g. BACE1, tau, APP).",
        source_label: "Drug",
        target_label: "Protein",
        required_props: &[],
        optional_props: &["action_type", "is_primary_target", "source", "target_notes"],
    },
    EdgeSchema {
        rel_type: "AFFECTS_PATHWAY",
        description: "Therapeutic affects a biological pathway or process.",
        source_label: "Drug",
        target_label: "Pathway",
        required_props: &[],
        optional_props: &["action_type", "is_primary_target", "source", "target_notes"],
    },
    EdgeSchema {
        rel_type: "ENCODES",
        description: "Gene encodes a protein (HGNC / PRO mapping).",
        source_label: "Gene",
        target_label: "Protein",
        required_props: &[],
        optional_props: &["source"],
    },
    EdgeSchema {
        rel_type: "INVOLVED_IN_PATHWAY",
        description: "Protein participates in a biological process/pathway (GO).",
        source_label: "Protein",
        target_label: "Pathway",
        required_props: &[],
        optional_props: &["evidence_code", "source"],
    },
    EdgeSchema {
        rel_type: "HAS_PHENOTYPE",
        description: "Disease presents with a given phenotype/symptom (HPO).",
        source_label: "Disease",
        target_label: "Phenotype",
        required_props: &[],
        optional_props: &["onset", "frequency", "source"],
    },
    EdgeSchema {
        rel_type: "INVOLVES_PATHOLOGY",
        description: "Disease involves a given pathophysiologic mechanism.",
        source_label: "Disease",
        target_label: "Mechanism",
        required_props: &[],
        optional_props: &["role", "source"],
    },
    EdgeSchema {
        rel_type: "TARGETS_PATHOLOGY",
        description: "Therapeutic targets a pathophysiologic mechanism.",
        source_label: "Drug",
        target_label: "Mechanism",
        required_props: &[],
        optional_props: &["action_type", "is_primary_target", "source", "target_notes"],
    },
    EdgeSchema {
        rel_type: "REFLECTS_PATHOLOGY",
        description: "Biomarker reflects a given pathophysiologic mechanism.",
        source_label: "Biomarker",
        target_label: "Mechanism",
        required_props: &[],
        optional_props: &["analyte_core", "analyte_class", "fluid", "source"],
    },
    EdgeSchema {
        rel_type: "REPRESENTS_GENE",
        description: "AlzPedia entity corresponds to a specific gene.",
        source_label: "AlzPediaEntity",
        target_label: "Gene",
        required_props: &[],
        optional_props: &["match_strategy", "source"],
    },
    EdgeSchema {
        rel_type: "ASSOCIATED_WITH_DISEASE",
        description: "Gene associated with a disease (e.g. AD risk gene).",
        source_label: "Gene",
        target_label: "Disease",
        required_props: &[],
        optional_props: &["evidence_type", "source"],
    },
    EdgeSchema {
        rel_type: "DEVELOPED_BY",
        description: "Drug is/was developed or sponsored by a company.",
        source_label: "Drug",
        target_label: "Company",
        required_props: &[],
        optional_props: &["role", "source"],
    },
    EdgeSchema {
        rel_type: "HAS_THERAPY_TYPE",
        description: "Drug has a given therapeutic modality.",
        source_label: "Drug",
        target_label: "TherapyType",
        required_props: &[],
        optional_props: &["source"],
    },
    EdgeSchema {
        rel_type: "MEASURED_IN",
        description: "Biomarker is measured in a given biofluid (CSF, plasma, ...).",
        source_label: "Biomarker",
        target_label: "Fluid",
        required_props: &[],
        optional_props: &["source"],
    },
    EdgeSchema {
        rel_type: "HAS_TRIAL",
        description: "Drug has a clinical trial record for a given indication.",
        source_label: "Drug",
        target_label: "Trial",
        required_props: &[],
        optional_props: &["source"],
    },
    EdgeSchema {
        rel_type: "FOR_DISEASE",
        description: "Trial is for a specific disease / indication.",
        source_label: "Trial",
        target_label: "Disease",
        required_props: &[],
        optional_props: &["indication_label", "source"],
    },
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Lookup over the static schema catalog.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    nodes: HashMap<&'static str, &'static NodeSchema>,
    edges: HashMap<&'static str, &'static EdgeSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let nodes = NODE_SCHEMAS.iter().map(|s| (s.label, s)).collect();
        let edges = EDGE_SCHEMAS.iter().map(|s| (s.rel_type, s)).collect();
        Self { nodes, edges }
    }

    /// Schema for a node label, or None if unknown.
    pub fn node_schema(&self, label: &str) -> Option<&'static NodeSchema> {
        self.nodes.get(label).copied()
    }

    /// Schema for a relationship type, or None if unknown.
    pub fn edge_schema(&self, rel_type: &str) -> Option<&'static EdgeSchema> {
        self.edges.get(rel_type).copied()
    }

    /// All defined node labels, sorted.
    pub fn node_labels(&self) -> Vec<&'static str> {
        let mut labels: Vec<&'static str> = self.nodes.keys().copied().collect();
        labels.sort_unstable();
        labels
    }

    /// All defined relationship types, sorted.
    pub fn edge_types(&self) -> Vec<&'static str> {
        let mut types: Vec<&'static str> = self.edges.keys().copied().collect();
        types.sort_unstable();
        types
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
