//! Canonical node table builders.
//!
//! One builder per node label. Each reads its designated raw source
//! table(s), maps rows onto the label's declared property set, and applies
//! the schema column contract as the final step: missing properties are
//! padded with empty values and undeclared columns are dropped, in the
//! schema's declared order.
//!
//! Labels synthesised from free-text enumerable fields (Mechanism, Company,
//! TherapyType, Fluid) slug each token into a stable synthetic ID and merge
//! entries sharing an ID by concatenating provenance.

use std::collections::HashMap;

use tracing::warn;

use cerebryx_common::error::{KgError, Result};
use cerebryx_common::table::Table;
use cerebryx_common::text::{merge_provenance, split_multi, synthetic_id};
use cerebryx_schema::SchemaRegistry;

use crate::config::BuildConfig;

pub type NodeBuilderFn = fn(&BuildConfig, &SchemaRegistry) -> Result<Table>;

/// All node builders in execution order.
pub fn node_builders() -> Vec<(&'static str, NodeBuilderFn)> {
    vec![
        ("Disease", build_disease_nodes as NodeBuilderFn),
        ("Gene", build_gene_nodes),
        ("Protein", build_protein_nodes),
        ("Pathway", build_pathway_nodes),
        ("Phenotype", build_phenotype_nodes),
        ("Biomarker", build_biomarker_nodes),
        ("Drug", build_drug_nodes),
        ("Mechanism", build_mechanism_nodes),
        ("Company", build_company_nodes),
        ("TherapyType", build_therapytype_nodes),
        ("Fluid", build_fluid_nodes),
        ("Trial", build_trial_nodes),
        ("AlzPediaEntity", build_alzpediaentity_nodes),
    ]
}

/// Reshape a builder's table to exactly the schema's property union:
/// missing columns padded empty, extra columns dropped, schema order kept.
pub fn conform_to_schema(table: &Table, label: &str, registry: &SchemaRegistry) -> Result<Table> {
    let schema = registry
        .node_schema(label)
        .ok_or_else(|| KgError::UnknownLabel(label.to_string()))?;
    let cols: Vec<String> = schema.all_props().iter().map(|p| p.to_string()).collect();
    Ok(table.with_columns(&cols))
}

// ---------------------------------------------------------------------------
// Ontology-sourced labels
// ---------------------------------------------------------------------------

/// Disease nodes from the MONDO subset (id, label, iri, synonyms, source).
pub fn build_disease_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.ontology_dir.join("diseases_mondo.csv"))?;

    let mut out = Table::new(vec![
        "id", "label", "iri", "mondo_id", "synonyms", "source", "raw_source_ids",
    ]);
    for row in df.iter() {
        let oid = row.get("id").to_string();
        out.push_record(&[
            ("id", oid.clone()),
            ("label", row.get("label").to_string()),
            ("iri", row.get("iri").to_string()),
            ("mondo_id", oid.clone()),
            ("synonyms", row.get("synonyms").to_string()),
            ("source", row.get_non_empty("source").unwrap_or("MONDO").to_string()),
            ("raw_source_ids", oid),
        ]);
    }
    conform_to_schema(&out, "Disease", registry)
}

/// Gene nodes from the HGNC subset.
/// Synonyms keep the pipes inside alias/prev blocks; the blocks themselves
/// are joined with "|".
pub fn build_gene_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.ontology_dir.join("genes_hgnc.csv"))?;

    let mut out = Table::new(vec![
        "id", "label", "hgnc_id", "entrez_id", "ensembl_id", "synonyms", "source",
        "raw_source_ids",
    ]);
    for row in df.iter() {
        let hgnc_id = row.get("hgnc_id").to_string();
        let synonyms = [row.get("alias_symbol").trim(), row.get("prev_symbol").trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("|");
        out.push_record(&[
            ("id", hgnc_id.clone()),
            ("label", row.get("symbol").to_string()),
            ("hgnc_id", hgnc_id.clone()),
            ("entrez_id", row.get("entrez_id").to_string()),
            ("ensembl_id", row.get("ensembl_gene_id").to_string()),
            ("synonyms", synonyms),
            ("source", "HGNC".to_string()),
            ("raw_source_ids", hgnc_id),
        ]);
    }
    conform_to_schema(&out, "Gene", registry)
}

/// Protein nodes from the PRO subset; carries gene_symbol for bridging.
pub fn build_protein_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.ontology_dir.join("proteins_pro.csv"))?;

    let mut out = Table::new(vec![
        "id", "label", "iri", "gene_symbol", "synonyms", "source", "raw_source_ids",
    ]);
    for row in df.iter() {
        let oid = row.get("id").to_string();
        out.push_record(&[
            ("id", oid.clone()),
            ("label", row.get("label").to_string()),
            ("iri", row.get("iri").to_string()),
            ("gene_symbol", row.get("gene_symbol").to_string()),
            ("synonyms", row.get("synonyms").to_string()),
            ("source", row.get_non_empty("source").unwrap_or("PRO").to_string()),
            ("raw_source_ids", oid),
        ]);
    }
    conform_to_schema(&out, "Protein", registry)
}

/// Pathway nodes from the GO subset.
pub fn build_pathway_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.ontology_dir.join("pathways_go.csv"))?;

    let mut out = Table::new(vec!["id", "label", "iri", "go_id", "source", "raw_source_ids"]);
    for row in df.iter() {
        let oid = row.get("id").to_string();
        out.push_record(&[
            ("id", oid.clone()),
            ("label", row.get("label").to_string()),
            ("iri", row.get("iri").to_string()),
            ("go_id", oid.clone()),
            ("source", row.get_non_empty("source").unwrap_or("GO").to_string()),
            ("raw_source_ids", oid),
        ]);
    }
    conform_to_schema(&out, "Pathway", registry)
}

/// Phenotype nodes from the HPO subset.
pub fn build_phenotype_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.ontology_dir.join("phenotypes_hpo.csv"))?;

    let mut out = Table::new(vec![
        "id", "label", "iri", "hpo_id", "synonyms", "source", "raw_source_ids",
    ]);
    for row in df.iter() {
        let oid = row.get("id").to_string();
        out.push_record(&[
            ("id", oid.clone()),
            ("label", row.get("label").to_string()),
            ("iri", row.get("iri").to_string()),
            ("hpo_id", oid.clone()),
            ("synonyms", row.get("synonyms").to_string()),
            ("source", row.get_non_empty("source").unwrap_or("HPO").to_string()),
            ("raw_source_ids", oid),
        ]);
    }
    conform_to_schema(&out, "Phenotype", registry)
}

// ---------------------------------------------------------------------------
// Site-sourced labels
// ---------------------------------------------------------------------------

/// Biomarker nodes from the AlzBiomarker per-analyte table.
pub fn build_biomarker_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.site_dir.join("alzbiomarker_biomarkers.csv"))?;

    let mut out = Table::new(vec![
        "id", "label", "analyte", "analyte_class", "fluid", "source", "raw_source_ids",
    ]);
    for row in df.iter() {
        let bid = row.get("biomarker_key").to_string();
        out.push_record(&[
            ("id", bid.clone()),
            ("label", row.get("analyte_label_example").to_string()),
            ("analyte", row.get("analyte_core").to_string()),
            ("analyte_class", row.get("analyte_class").to_string()),
            ("fluid", row.get("fluid").to_string()),
            ("source", "AlzBiomarker".to_string()),
            ("raw_source_ids", bid),
        ]);
    }
    conform_to_schema(&out, "Biomarker", registry)
}

/// Drug nodes: ChEBI subset concatenated with the site therapeutics table.
/// Both provenances share one schema; they are reconciled later by ID
/// co-occurrence, not merged here. Prefers the enriched therapeutics file,
/// falls back to the base file, and degrades to ChEBI-only with a warning.
pub fn build_drug_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let chebi = Table::read_csv(&cfg.ontology_dir.join("drugs_chebi.csv"))?;

    let mut out = Table::new(vec![
        "id",
        "label",
        "iri",
        "chebi_id",
        "drug_type",
        "drug_class",
        "primary_indication",
        "secondary_indications",
        "mechanism_summary",
        "status_overall",
        "source",
        "raw_source_ids",
    ]);

    for row in chebi.iter() {
        let oid = row.get("id").to_string();
        out.push_record(&[
            ("id", oid.clone()),
            ("label", row.get("label").to_string()),
            ("iri", row.get("iri").to_string()),
            ("chebi_id", oid.clone()),
            ("source", row.get_non_empty("source").unwrap_or("ChEBI").to_string()),
            ("raw_source_ids", oid),
        ]);
    }

    let enriched_path = cfg.site_dir.join("therapeutics_entities_enriched.csv");
    let base_path = cfg.site_dir.join("therapeutics_entities.csv");

    if enriched_path.exists() {
        let df = Table::read_csv(&enriched_path)?;
        for row in df.iter() {
            let tid = row.get("therapeutic_id").to_string();
            let primary = row
                .get_non_empty("detail_conditions")
                .or_else(|| row.get_non_empty("fda_statuses"))
                .unwrap_or("");
            out.push_record(&[
                ("id", tid.clone()),
                ("label", row.get("name").to_string()),
                ("iri", row.get("url").to_string()),
                (
                    "drug_type",
                    row.get_non_empty("detail_therapy_type")
                        .or_else(|| row.get_non_empty("therapy_types"))
                        .unwrap_or("")
                        .to_string(),
                ),
                (
                    "drug_class",
                    row.get_non_empty("detail_target_type")
                        .or_else(|| row.get_non_empty("target_types"))
                        .unwrap_or("")
                        .to_string(),
                ),
                ("primary_indication", primary.to_string()),
                (
                    "secondary_indications",
                    row.get_non_empty("detail_approved_for")
                        .or_else(|| row.get_non_empty("approved_for"))
                        .unwrap_or("")
                        .to_string(),
                ),
                ("mechanism_summary", row.get("mechanism_summary").to_string()),
                ("status_overall", row.get("status_overall").to_string()),
                ("source", "AlzForum.Therapeutics".to_string()),
                ("raw_source_ids", tid),
            ]);
        }
    } else if base_path.exists() {
        let df = Table::read_csv(&base_path)?;
        for row in df.iter() {
            let tid = row.get("therapeutic_id").to_string();
            out.push_record(&[
                ("id", tid.clone()),
                ("label", row.get("name").to_string()),
                ("iri", row.get("url").to_string()),
                ("drug_type", row.get("therapy_types").to_string()),
                ("drug_class", row.get("target_types").to_string()),
                ("primary_indication", row.get("fda_statuses").to_string()),
                ("secondary_indications", row.get("approved_for").to_string()),
                ("source", "AlzForum.Therapeutics".to_string()),
                ("raw_source_ids", tid),
            ]);
        }
    } else {
        warn!("No therapeutics entities table found; Drug nodes will only contain ChEBI entries");
    }

    conform_to_schema(&out, "Drug", registry)
}

// ---------------------------------------------------------------------------
// Labels synthesised from free-text enumerable fields
// ---------------------------------------------------------------------------

/// First-seen-ordered map from synthetic ID to a mutable record.
struct SlugMap<T> {
    order: Vec<String>,
    entries: HashMap<String, T>,
}

impl<T> SlugMap<T> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    fn upsert(&mut self, id: String, init: impl FnOnce() -> T, merge: impl FnOnce(&mut T)) {
        if let Some(entry) = self.entries.get_mut(&id) {
            merge(entry);
        } else {
            self.order.push(id.clone());
            self.entries.insert(id, init());
        }
    }

    fn into_ordered(mut self) -> Vec<(String, T)> {
        self.order
            .drain(..)
            .filter_map(|id| {
                let entry = self.entries.remove(&id)?;
                Some((id, entry))
            })
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct MechEntry {
    label: String,
    category: String,
    source: String,
    raw_source_ids: String,
}

/// Mechanism nodes from biomarker analyte classes and therapeutics
/// target-type strings. Tokens sharing a synthetic ID merge their
/// provenance tags.
pub fn build_mechanism_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let mut mechs: SlugMap<MechEntry> = SlugMap::new();

    let biom_path = cfg.site_dir.join("alzbiomarker_biomarkers.csv");
    if biom_path.exists() {
        let df = Table::read_csv(&biom_path)?;
        for row in df.iter() {
            if let Some(class) = row.get_non_empty("analyte_class") {
                let label = class.to_string();
                let mid = synthetic_id("MECH", &label);
                mechs.upsert(
                    mid,
                    || MechEntry {
                        category: label.to_lowercase(),
                        raw_source_ids: label.clone(),
                        label,
                        source: "AlzBiomarker".to_string(),
                    },
                    |_| {},
                );
            }
        }
    }

    let mut add_target_types = |df: &Table, col: &str| {
        for row in df.iter() {
            let raw = match row.get_non_empty(col) {
                Some(raw) => raw,
                None => continue,
            };
            for label in split_multi(raw) {
                let mid = synthetic_id("MECH", &label);
                mechs.upsert(
                    mid,
                    || MechEntry {
                        category: label.to_lowercase(),
                        raw_source_ids: label.clone(),
                        label: label.clone(),
                        source: "AlzForum.Therapeutics".to_string(),
                    },
                    |entry| {
                        entry.source = merge_provenance(&entry.source, "AlzForum.Therapeutics");
                    },
                );
            }
        }
    };

    let enriched_path = cfg.site_dir.join("therapeutics_entities_enriched.csv");
    let base_path = cfg.site_dir.join("therapeutics_entities.csv");
    if enriched_path.exists() {
        let df = Table::read_csv(&enriched_path)?;
        add_target_types(&df, "detail_target_type");
        add_target_types(&df, "target_types");
    } else if base_path.exists() {
        let df = Table::read_csv(&base_path)?;
        add_target_types(&df, "target_types");
    }

    if mechs.is_empty() {
        return Err(KgError::NoSourceData("Mechanism".to_string()));
    }

    let mut out = Table::new(vec!["id", "label", "category", "source", "raw_source_ids"]);
    for (id, entry) in mechs.into_ordered() {
        out.push_record(&[
            ("id", id),
            ("label", entry.label),
            ("category", entry.category),
            ("source", entry.source),
            ("raw_source_ids", entry.raw_source_ids),
        ]);
    }
    conform_to_schema(&out, "Mechanism", registry)
}

struct CompanyEntry {
    label: String,
    raw_source_ids: String,
}

/// Company nodes from therapeutics sponsor strings (comma-separated).
/// raw_source_ids accumulates the therapeutic IDs that mention the company.
pub fn build_company_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let mut companies: SlugMap<CompanyEntry> = SlugMap::new();

    let mut add_companies = |df: &Table, col: &str| {
        for row in df.iter() {
            let tid = row.get("therapeutic_id").trim();
            let raw = match row.get_non_empty(col) {
                Some(raw) => raw,
                None => continue,
            };
            for name in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let cid = synthetic_id("COMP", name);
                let name = name.to_string();
                companies.upsert(
                    cid,
                    || CompanyEntry {
                        label: name,
                        raw_source_ids: if tid.is_empty() { String::new() } else { tid.to_string() },
                    },
                    |entry| {
                        entry.raw_source_ids = merge_provenance(&entry.raw_source_ids, tid);
                    },
                );
            }
        }
    };

    let enriched_path = cfg.site_dir.join("therapeutics_entities_enriched.csv");
    let base_path = cfg.site_dir.join("therapeutics_entities.csv");
    if enriched_path.exists() {
        let df = Table::read_csv(&enriched_path)?;
        add_companies(&df, "detail_company");
        add_companies(&df, "companies");
    } else if base_path.exists() {
        let df = Table::read_csv(&base_path)?;
        add_companies(&df, "companies");
    } else {
        return Err(KgError::NoSourceData("Company".to_string()));
    }

    let mut out = Table::new(vec!["id", "label", "source", "raw_source_ids"]);
    for (id, entry) in companies.into_ordered() {
        out.push_record(&[
            ("id", id),
            ("label", entry.label),
            ("source", "AlzForum.Therapeutics".to_string()),
            ("raw_source_ids", entry.raw_source_ids),
        ]);
    }
    conform_to_schema(&out, "Company", registry)
}

/// TherapyType nodes from therapy-type strings (pipe/comma-separated);
/// first occurrence of a synthetic ID wins.
pub fn build_therapytype_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let mut types: SlugMap<String> = SlugMap::new();

    let mut add_types = |df: &Table, col: &str| {
        for row in df.iter() {
            if let Some(raw) = row.get_non_empty(col) {
                for label in split_multi(raw) {
                    let tid = synthetic_id("TT", &label);
                    types.upsert(tid, || label.clone(), |_| {});
                }
            }
        }
    };

    let enriched_path = cfg.site_dir.join("therapeutics_entities_enriched.csv");
    let base_path = cfg.site_dir.join("therapeutics_entities.csv");
    if enriched_path.exists() {
        let df = Table::read_csv(&enriched_path)?;
        add_types(&df, "detail_therapy_type");
        add_types(&df, "therapy_types");
    } else if base_path.exists() {
        let df = Table::read_csv(&base_path)?;
        add_types(&df, "therapy_types");
    } else {
        return Err(KgError::NoSourceData("TherapyType".to_string()));
    }

    let mut out = Table::new(vec!["id", "label", "source", "raw_source_ids"]);
    for (id, label) in types.into_ordered() {
        out.push_record(&[
            ("id", id),
            ("label", label.clone()),
            ("source", "AlzForum.Therapeutics".to_string()),
            ("raw_source_ids", label),
        ]);
    }
    conform_to_schema(&out, "TherapyType", registry)
}

/// Fluid nodes: distinct biomarker fluids, sorted for stable output.
pub fn build_fluid_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.site_dir.join("alzbiomarker_biomarkers.csv"))?;

    let mut fluids: Vec<String> = df
        .column_values("fluid")
        .into_iter()
        .map(str::to_string)
        .collect();
    fluids.sort();
    fluids.dedup();

    let mut out = Table::new(vec!["id", "label", "source", "raw_source_ids"]);
    for fluid in fluids {
        out.push_record(&[
            ("id", synthetic_id("FLUID", &fluid)),
            ("label", fluid.clone()),
            ("source", "AlzBiomarker".to_string()),
            ("raw_source_ids", fluid),
        ]);
    }
    conform_to_schema(&out, "Fluid", registry)
}

/// Trial nodes: one per trials-table row; the row index keeps IDs unique
/// across repeated drug-indication pairs.
pub fn build_trial_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.site_dir.join("therapeutics_trials.csv"))?;

    let mut out = Table::new(vec![
        "id",
        "label",
        "indication",
        "trial_phase_max",
        "has_phase3",
        "status",
        "trial_count",
        "notes",
        "source",
        "raw_source_ids",
    ]);
    for (idx, row) in df.iter().enumerate() {
        let tid = row.get("therapeutic_id").to_string();
        let indication = row.get("indication").to_string();
        let label = if indication.is_empty() {
            format!("{} trial", tid)
        } else {
            format!("{} trial for {}", tid, indication)
        };
        out.push_record(&[
            ("id", format!("TRIAL_{}_{}", tid, idx)),
            ("label", label),
            ("indication", indication),
            ("trial_phase_max", row.get("trial_phase_max").to_string()),
            ("has_phase3", row.get("has_phase3").to_string()),
            ("status", row.get("status").to_string()),
            ("trial_count", row.get("trial_count").to_string()),
            ("notes", row.get("notes").to_string()),
            ("source", "AlzForum.Therapeutics".to_string()),
            ("raw_source_ids", tid),
        ]);
    }
    conform_to_schema(&out, "Trial", registry)
}

/// AlzPediaEntity nodes from the AlzPedia entity extract.
pub fn build_alzpediaentity_nodes(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<Table> {
    let df = Table::read_csv(&cfg.site_dir.join("alzpedia_entities.csv"))?;

    let mut out = Table::new(vec![
        "id",
        "label",
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
    ]);
    for row in df.iter() {
        let eid = row.get("entity_id").to_string();
        out.push_record(&[
            ("id", format!("ALZPEDIA:{}", eid)),
            ("label", row.get("name").to_string()),
            ("url", row.get("url").to_string()),
            ("synonyms", row.get("synonyms").to_string()),
            ("short_summary", row.get("short_summary").to_string()),
            ("category", row.get("category").to_string()),
            ("has_function_section", row.get("has_function_section").to_string()),
            ("has_pathology_section", row.get("has_pathology_section").to_string()),
            ("has_genetics_section", row.get("has_genetics_section").to_string()),
            (
                "has_therapeutics_section",
                row.get("has_therapeutics_section").to_string(),
            ),
            ("source", "AlzPedia".to_string()),
            ("raw_source_ids", eid),
        ]);
    }
    conform_to_schema(&out, "AlzPediaEntity", registry)
}
