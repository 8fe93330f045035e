//! Canonical edge table builders.
//!
//! One builder per relationship type, all following the same shape:
//! restrict to rows whose endpoints already exist as node IDs (unmatched
//! rows drop silently — a coverage gap, not an error), map/derive the edge
//! properties, pad to the edge schema's property union, write.
//!
//! Builders read the node tables the node stage wrote; a missing node table
//! is fatal for the whole run since the graph would be structurally
//! incomplete. A missing raw site table only skips that edge type.

use std::collections::HashSet;

use anyhow::anyhow;
use tracing::info;

use cerebryx_common::error::{KgError, Result};
use cerebryx_common::table::Table;
use cerebryx_common::text::normalise;
use cerebryx_schema::SchemaRegistry;

use crate::config::BuildConfig;
use crate::matcher::{EntityMatcher, GeneSymbolBridge};

// ── Rule tables ──────────────────────────────────────────────────────────────

/// Indication substrings that anchor a trial row to the Alzheimer disease
/// node. Anything else is out of scope for this graph and dropped.
const AD_INDICATION_PATTERNS: &[&str] = &["alzheimer", "mci due to ad", "ad "];

/// target_kind substrings that route a target name to pathway matching.
const PATHWAYISH_KINDS: &[&str] = &["pathway", "process"];

pub fn indication_matches_ad(indication: &str) -> bool {
    let text = indication.to_lowercase();
    AD_INDICATION_PATTERNS.iter().any(|p| text.contains(p))
}

pub fn is_pathwayish_kind(target_kind: &str) -> bool {
    let kind = normalise(target_kind);
    PATHWAYISH_KINDS.iter().any(|p| kind.contains(p))
}

// ── Helpers ──────────────────────────────────────────────────────────────────

/// Infer biomarker direction from the effect size, read as ratio-like
/// (centred at 1). Missing or non-numeric values read as no change.
// TODO: branch on effect_size_type once it is populated — difference-type
// statistics (SMD) are not centred at 1.
pub fn infer_direction(effect_size: &str) -> &'static str {
    let trimmed = effect_size.trim();
    if trimmed.is_empty() {
        return "no_change";
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => "no_change",
        Ok(v) if v > 1.0 => "increased",
        Ok(v) if v < 1.0 => "decreased",
        Ok(_) => "no_change",
        Err(_) => "no_change",
    }
}

/// Load the canonical node table for a label; absence is fatal for edge
/// construction.
fn load_nodes(cfg: &BuildConfig, label: &str) -> Result<Table> {
    let path = cfg.node_table_path(label);
    let table = Table::read_csv(&path).map_err(|e| match e {
        KgError::MissingInput(path) => KgError::MissingNodeTable {
            label: label.to_string(),
            path,
        },
        other => other,
    })?;
    if !table.has_column("id") {
        return Err(KgError::SchemaViolation(format!(
            "Node table {} has no 'id' column",
            path.display()
        )));
    }
    Ok(table)
}

/// Canonical Alzheimer disease node: label or synonyms contain "alzheimer",
/// MONDO-sourced rows preferred, first candidate otherwise.
pub fn find_ad_disease_id(diseases: &Table) -> Option<String> {
    let candidates: Vec<_> = diseases
        .iter()
        .filter(|row| {
            normalise(row.get("label")).contains("alzheimer")
                || normalise(row.get("synonyms")).contains("alzheimer")
        })
        .collect();

    candidates
        .iter()
        .find(|row| row.get("source") == "MONDO")
        .or_else(|| candidates.first())
        .map(|row| row.get("id").to_string())
}

fn id_set(nodes: &Table) -> HashSet<String> {
    nodes.iter().map(|row| row.get("id").to_string()).collect()
}

/// Assemble and write one edge table: source_id, target_id, then the edge
/// schema's property union. Unset properties pad to empty.
fn write_edge_table(
    cfg: &BuildConfig,
    registry: &SchemaRegistry,
    rel_type: &str,
    rows: &[Vec<(&str, String)>],
) -> Result<()> {
    let schema = registry
        .edge_schema(rel_type)
        .ok_or_else(|| KgError::UnknownEdgeType(rel_type.to_string()))?;

    let mut columns = vec!["source_id".to_string(), "target_id".to_string()];
    columns.extend(schema.all_props().iter().map(|p| p.to_string()));

    let mut table = Table::new(columns);
    for row in rows {
        table.push_record(row);
    }

    let path = cfg.edge_table_path(rel_type);
    table.write_csv(&path)?;
    info!(rel_type, rows = table.len(), path = %path.display(), "Wrote edge table");
    Ok(())
}

pub type EdgeBuilderFn = fn(&BuildConfig, &SchemaRegistry) -> Result<()>;

/// All edge builders in execution order. The targets builder emits both
/// TARGETS_PROTEIN and AFFECTS_PATHWAY from the one raw table.
pub fn edge_builders() -> Vec<(&'static str, EdgeBuilderFn)> {
    vec![
        ("HAS_BIOMARKER", build_has_biomarker_edges as EdgeBuilderFn),
        ("TREATS", build_treats_edges),
        ("ENCODES", build_encodes_edges),
        ("TARGETS_PROTEIN/AFFECTS_PATHWAY", build_target_edges),
        ("HAS_PHENOTYPE", build_has_phenotype_edges),
    ]
}

// ── HAS_BIOMARKER: Disease -> Biomarker ─────────────────────────────────────

/// Biomarker effect rows all describe the Alzheimer cohort, so every edge
/// anchors at the canonical AD node; the biomarker endpoint must already
/// exist as a node.
pub fn build_has_biomarker_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let diseases = load_nodes(cfg, "Disease")?;
    let biomarkers = load_nodes(cfg, "Biomarker")?;

    let ad_id = find_ad_disease_id(&diseases)
        .ok_or_else(|| anyhow!("No Alzheimer disease node found in the Disease table"))?;
    let biomarker_ids = id_set(&biomarkers);

    let effects = Table::read_csv(&cfg.site_dir.join("alzbiomarker_effects.csv"))?;

    let mut rows = Vec::new();
    for row in effects.iter() {
        let key = row.get("biomarker_key").trim();
        if key.is_empty() || !biomarker_ids.contains(key) {
            continue;
        }
        let effect_size = row.get("effect_size");
        rows.push(vec![
            ("source_id", ad_id.clone()),
            ("target_id", key.to_string()),
            ("direction", infer_direction(effect_size).to_string()),
            ("comparison", row.get("comparison").to_string()),
            ("effect_size", effect_size.to_string()),
            ("p_value", row.get("p_value").to_string()),
            ("source", "AlzBiomarker".to_string()),
            ("source_text", row.get("meta_text").to_string()),
        ]);
    }

    write_edge_table(cfg, registry, "HAS_BIOMARKER", &rows)
}

// ── TREATS: Drug -> Disease ─────────────────────────────────────────────────

/// Trial rows whose indication matches the AD rule table become TREATS
/// edges; all other indications are out of scope and drop.
pub fn build_treats_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let drugs = load_nodes(cfg, "Drug")?;
    let diseases = load_nodes(cfg, "Disease")?;

    let drug_ids = id_set(&drugs);
    let ad_id = find_ad_disease_id(&diseases);

    let trials = Table::read_csv(&cfg.site_dir.join("therapeutics_trials.csv"))?;

    let mut rows = Vec::new();
    if let Some(ad_id) = ad_id {
        for row in trials.iter() {
            let drug_id = row.get("therapeutic_id").trim();
            if drug_id.is_empty() || !drug_ids.contains(drug_id) {
                continue;
            }
            let indication = row.get("indication");
            if !indication_matches_ad(indication) {
                continue;
            }
            rows.push(vec![
                ("source_id", drug_id.to_string()),
                ("target_id", ad_id.clone()),
                ("status", row.get("status").to_string()),
                ("indication", indication.to_string()),
                ("trial_phase_max", row.get("trial_phase_max").to_string()),
                ("has_phase3", row.get("has_phase3").to_string()),
                ("trial_count", row.get("trial_count").to_string()),
                ("source", "AlzForum.Therapeutics".to_string()),
                ("notes", row.get("notes").to_string()),
            ]);
        }
    }

    write_edge_table(cfg, registry, "TREATS", &rows)
}

// ── ENCODES: Gene -> Protein ────────────────────────────────────────────────

/// A gene encodes every protein whose gene_symbol property, normalised,
/// equals the gene's own normalised label.
pub fn build_encodes_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let genes = load_nodes(cfg, "Gene")?;
    let proteins = load_nodes(cfg, "Protein")?;

    let bridge = GeneSymbolBridge::from_proteins(&proteins);

    let mut rows = Vec::new();
    for gene in genes.iter() {
        let symbol = gene.get("label");
        if normalise(symbol).is_empty() {
            continue;
        }
        for protein_id in bridge.proteins_for(symbol) {
            rows.push(vec![
                ("source_id", gene.get("id").to_string()),
                ("target_id", protein_id.clone()),
                ("source", "HGNC_PRO".to_string()),
            ]);
        }
    }

    write_edge_table(cfg, registry, "ENCODES", &rows)
}

// ── TARGETS_PROTEIN + AFFECTS_PATHWAY: Drug -> Protein / Pathway ────────────

/// Both edge types come from the one raw targets table. Each target name is
/// tried against the gene-symbol bridge, then protein labels, then protein
/// synonyms; pathway-ish rows additionally run token overlap against
/// pathway labels. A single raw row may yield edges of both types.
pub fn build_target_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let drugs = load_nodes(cfg, "Drug")?;
    let proteins = load_nodes(cfg, "Protein")?;
    let pathways = load_nodes(cfg, "Pathway")?;

    let drug_ids = id_set(&drugs);
    let matcher = EntityMatcher::new(&proteins, &pathways)?;

    let targets = Table::read_csv(&cfg.site_dir.join("therapeutics_targets.csv"))?;

    let mut protein_rows = Vec::new();
    let mut pathway_rows = Vec::new();

    for row in targets.iter() {
        let drug_id = row.get("therapeutic_id").trim();
        if drug_id.is_empty() || !drug_ids.contains(drug_id) {
            continue;
        }
        let target_name = row.get("target_name").trim();
        if target_name.is_empty() {
            continue;
        }

        let action_type = row.get("action_type").to_string();
        let is_primary = row.get("is_primary_target").to_string();
        let notes = row.get("target_notes").to_string();

        for protein_id in matcher.match_protein(target_name) {
            protein_rows.push(vec![
                ("source_id", drug_id.to_string()),
                ("target_id", protein_id),
                ("action_type", action_type.clone()),
                ("is_primary_target", is_primary.clone()),
                ("source", "AlzForum.Therapeutics".to_string()),
                ("target_notes", notes.clone()),
            ]);
        }

        if is_pathwayish_kind(row.get("target_kind")) {
            for pathway_id in matcher.match_pathway(target_name) {
                pathway_rows.push(vec![
                    ("source_id", drug_id.to_string()),
                    ("target_id", pathway_id),
                    ("action_type", action_type.clone()),
                    ("is_primary_target", is_primary.clone()),
                    ("source", "AlzForum.Therapeutics".to_string()),
                    ("target_notes", notes.clone()),
                ]);
            }
        }
    }

    write_edge_table(cfg, registry, "TARGETS_PROTEIN", &protein_rows)?;
    write_edge_table(cfg, registry, "AFFECTS_PATHWAY", &pathway_rows)
}

// ── HAS_PHENOTYPE: Disease -> Phenotype ─────────────────────────────────────

/// No disease-phenotype crosswalk table exists yet, so every phenotype node
/// is seeded against the AD anchor. Placeholder relationship, replace when
/// a real mapping source lands.
pub fn build_has_phenotype_edges(cfg: &BuildConfig, registry: &SchemaRegistry) -> Result<()> {
    let diseases = load_nodes(cfg, "Disease")?;
    let phenotypes = load_nodes(cfg, "Phenotype")?;

    let ad_id = find_ad_disease_id(&diseases)
        .ok_or_else(|| anyhow!("No Alzheimer disease node found in the Disease table"))?;

    let mut rows = Vec::new();
    for phenotype in phenotypes.iter() {
        rows.push(vec![
            ("source_id", ad_id.clone()),
            ("target_id", phenotype.get("id").to_string()),
            ("source", "HPO (seeded for AD)".to_string()),
        ]);
    }

    write_edge_table(cfg, registry, "HAS_PHENOTYPE", &rows)
}
