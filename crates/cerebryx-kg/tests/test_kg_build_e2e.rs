//! End-to-end KG build over an on-disk fixture tree.
//!
//! Exercises the full pipeline: node normalisation, edge synthesis, and the
//! bulk-import export, then checks the column contracts, referential
//! integrity, and determinism of the outputs.

use std::collections::HashSet;
use std::path::Path;

use cerebryx_common::table::Table;
use cerebryx_kg::config::BuildConfig;
use cerebryx_kg::pipeline::run_all;
use cerebryx_schema::SchemaRegistry;

fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) {
    let mut t = Table::new(header.to_vec());
    for row in rows {
        let record: Vec<(&str, String)> = header
            .iter()
            .zip(row.iter())
            .map(|(c, v)| (*c, v.to_string()))
            .collect();
        t.push_record(&record);
    }
    t.write_csv(path).unwrap();
}

/// Lay down a minimal but complete fixture tree covering every builder.
fn setup_fixtures(root: &Path) -> BuildConfig {
    let cfg = BuildConfig {
        ontology_dir: root.join("ontology"),
        site_dir: root.join("site"),
        output_dir: root.join("kg_output"),
        export_dir: root.join("neo4j_import"),
    };
    std::fs::create_dir_all(&cfg.ontology_dir).unwrap();
    std::fs::create_dir_all(&cfg.site_dir).unwrap();

    write_csv(
        &cfg.ontology_dir.join("diseases_mondo.csv"),
        &["id", "label", "iri", "synonyms", "source"],
        &[
            &[
                "MONDO:0004975",
                "Alzheimer disease",
                "http://purl.obolibrary.org/obo/MONDO_0004975",
                "AD|Alzheimer dementia",
                "MONDO",
            ],
            &["MONDO:0001627", "dementia", "", "", "MONDO"],
        ],
    );

    write_csv(
        &cfg.ontology_dir.join("genes_hgnc.csv"),
        &[
            "symbol",
            "name",
            "status",
            "hgnc_id",
            "entrez_id",
            "ensembl_gene_id",
            "alias_symbol",
            "prev_symbol",
        ],
        &[
            &[
                "APP",
                "amyloid beta precursor protein",
                "Approved",
                "HGNC:620",
                "351",
                "ENSG00000142192",
                "AAA|ABPP",
                "",
            ],
            &[
                "MAPT",
                "microtubule associated protein tau",
                "Approved",
                "HGNC:6893",
                "4137",
                "ENSG00000186868",
                "",
                "DDPAC",
            ],
        ],
    );

    write_csv(
        &cfg.ontology_dir.join("proteins_pro.csv"),
        &["id", "label", "iri", "synonyms", "source", "gene_symbol"],
        &[
            &[
                "PR:000004155",
                "amyloid-beta precursor protein",
                "",
                "ABPP",
                "PRO",
                "APP",
            ],
            &[
                "PR:000010173",
                "microtubule-associated protein tau",
                "",
                "tau",
                "PRO",
                "MAPT",
            ],
        ],
    );

    write_csv(
        &cfg.ontology_dir.join("pathways_go.csv"),
        &["id", "label", "iri", "source"],
        &[
            &["GO:0150076", "neuroinflammatory response", "", "GO"],
            &["GO:0048167", "regulation of synaptic plasticity", "", "GO"],
        ],
    );

    write_csv(
        &cfg.ontology_dir.join("phenotypes_hpo.csv"),
        &["id", "label", "iri", "synonyms", "source"],
        &[
            &["HP:0002354", "Memory impairment", "", "", "HPO"],
            &["HP:0002381", "Aphasia", "", "", "HPO"],
        ],
    );

    write_csv(
        &cfg.ontology_dir.join("drugs_chebi.csv"),
        &["id", "label", "iri", "synonyms", "source"],
        &[&["CHEBI:53289", "donepezil", "", "", "ChEBI"]],
    );

    write_csv(
        &cfg.site_dir.join("alzbiomarker_biomarkers.csv"),
        &["biomarker_key", "analyte_core", "analyte_class", "fluid", "analyte_label_example"],
        &[&["abeta42_csf", "abeta42", "Amyloid", "CSF", "Aβ42 (CSF)"]],
    );

    write_csv(
        &cfg.site_dir.join("alzbiomarker_effects.csv"),
        &["biomarker_key", "effect_size", "comparison", "p_value", "meta_text"],
        &[
            &["abeta42_csf", "0.6", "AD vs CTRL", "0.0001", "meta-analysis v3"],
            // Unknown biomarker: must drop silently.
            &["unknown_key", "2.0", "AD vs CTRL", "", ""],
        ],
    );

    write_csv(
        &cfg.site_dir.join("therapeutics_entities.csv"),
        &[
            "therapeutic_id",
            "name",
            "url",
            "therapy_types",
            "target_types",
            "fda_statuses",
            "approved_for",
            "companies",
        ],
        &[&[
            "lecanemab",
            "Lecanemab",
            "https://example.org/therapeutics/lecanemab",
            "Immunotherapy (passive)",
            "Amyloid",
            "Approved",
            "Early AD",
            "Eisai, Biogen",
        ]],
    );

    write_csv(
        &cfg.site_dir.join("therapeutics_trials.csv"),
        &[
            "therapeutic_id",
            "indication",
            "trial_phase_max",
            "has_phase3",
            "status",
            "trial_count",
            "notes",
        ],
        &[
            &[
                "lecanemab",
                "Mild Alzheimer's Disease",
                "3",
                "True",
                "approved",
                "14",
                "Approved July 2023",
            ],
            // Out-of-scope indication: no TREATS edge.
            &["lecanemab", "Parkinson's disease", "2", "False", "ongoing", "1", ""],
        ],
    );

    write_csv(
        &cfg.site_dir.join("therapeutics_targets.csv"),
        &[
            "therapeutic_id",
            "target_name",
            "target_kind",
            "action_type",
            "is_primary_target",
            "target_notes",
        ],
        &[
            &["lecanemab", "APP", "protein", "antibody", "True", "binds protofibrils"],
            &[
                "lecanemab",
                "neuroinflammation",
                "pathway_or_process",
                "antibody",
                "False",
                "",
            ],
        ],
    );

    write_csv(
        &cfg.site_dir.join("alzpedia_entities.csv"),
        &[
            "entity_id",
            "name",
            "url",
            "synonyms",
            "short_summary",
            "category",
            "has_function_section",
            "has_pathology_section",
            "has_genetics_section",
            "has_therapeutics_section",
        ],
        &[&[
            "app",
            "APP",
            "https://example.org/alzpedia/app",
            "amyloid precursor protein",
            "Membrane protein cleaved into amyloid-beta.",
            "protein_or_gene",
            "True",
            "True",
            "True",
            "False",
        ]],
    );

    cfg
}

fn read_output(cfg: &BuildConfig, file: &str) -> Table {
    Table::read_csv(&cfg.output_dir.join(file)).unwrap()
}

#[test]
fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup_fixtures(dir.path());
    let registry = SchemaRegistry::new();

    run_all(&cfg, &registry).unwrap();

    // ── Node tables conform to their schemas ────────────────────────────────
    for (label, file) in [
        ("Disease", "nodes_disease.csv"),
        ("Gene", "nodes_gene.csv"),
        ("Protein", "nodes_protein.csv"),
        ("Drug", "nodes_drug.csv"),
        ("Biomarker", "nodes_biomarker.csv"),
        ("Trial", "nodes_trial.csv"),
    ] {
        let table = read_output(&cfg, file);
        let expected: Vec<String> = registry
            .node_schema(label)
            .unwrap()
            .all_props()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(table.columns(), expected.as_slice(), "{label} header mismatch");
    }

    // Drug table concatenates ChEBI and site provenances.
    let drugs = read_output(&cfg, "nodes_drug.csv");
    let drug_ids: Vec<&str> = drugs.iter().map(|r| r.get("id")).collect();
    assert_eq!(drug_ids, vec!["CHEBI:53289", "lecanemab"]);

    // Synthetic labels: mechanisms from analyte class + target types,
    // fluids from the biomarker table.
    let mechanisms = read_output(&cfg, "nodes_mechanism.csv");
    let mech_ids: HashSet<&str> = mechanisms.iter().map(|r| r.get("id")).collect();
    assert!(mech_ids.contains("MECH_AMYLOID"));
    let fluids = read_output(&cfg, "nodes_fluid.csv");
    assert_eq!(fluids.iter().next().unwrap().get("id"), "FLUID_CSF");

    // ── HAS_BIOMARKER end-to-end scenario ───────────────────────────────────
    let biomarker_edges = read_output(&cfg, "edges_has_biomarker.csv");
    let mut expected_cols = vec!["source_id".to_string(), "target_id".to_string()];
    expected_cols.extend(
        registry
            .edge_schema("HAS_BIOMARKER")
            .unwrap()
            .all_props()
            .iter()
            .map(|p| p.to_string()),
    );
    assert_eq!(biomarker_edges.columns(), expected_cols.as_slice());
    // The unknown biomarker row dropped; exactly one edge remains.
    assert_eq!(biomarker_edges.len(), 1);
    let edge = biomarker_edges.iter().next().unwrap();
    assert_eq!(edge.get("source_id"), "MONDO:0004975");
    assert_eq!(edge.get("target_id"), "abeta42_csf");
    assert_eq!(edge.get("direction"), "decreased");
    assert_eq!(edge.get("comparison"), "AD vs CTRL");

    // ── TREATS: only the AD indication survives ─────────────────────────────
    let treats = read_output(&cfg, "edges_treats.csv");
    assert_eq!(treats.len(), 1);
    let edge = treats.iter().next().unwrap();
    assert_eq!(edge.get("source_id"), "lecanemab");
    assert_eq!(edge.get("target_id"), "MONDO:0004975");
    assert_eq!(edge.get("status"), "approved");

    // ── ENCODES: genes bridge to proteins by symbol ─────────────────────────
    let encodes = read_output(&cfg, "edges_encodes.csv");
    let pairs: HashSet<(String, String)> = encodes
        .iter()
        .map(|r| (r.get("source_id").to_string(), r.get("target_id").to_string()))
        .collect();
    assert!(pairs.contains(&("HGNC:620".to_string(), "PR:000004155".to_string())));
    assert!(pairs.contains(&("HGNC:6893".to_string(), "PR:000010173".to_string())));

    // ── TARGETS_PROTEIN via gene-symbol bridge ──────────────────────────────
    let targets = read_output(&cfg, "edges_targets_protein.csv");
    assert_eq!(targets.len(), 1);
    let edge = targets.iter().next().unwrap();
    assert_eq!(edge.get("source_id"), "lecanemab");
    assert_eq!(edge.get("target_id"), "PR:000004155");
    assert_eq!(edge.get("action_type"), "antibody");

    // ── AFFECTS_PATHWAY via token overlap ───────────────────────────────────
    let pathways = read_output(&cfg, "edges_affects_pathway.csv");
    assert_eq!(pathways.len(), 1);
    let edge = pathways.iter().next().unwrap();
    assert_eq!(edge.get("target_id"), "GO:0150076");

    // ── HAS_PHENOTYPE seeds every phenotype against the AD anchor ───────────
    let phenos = read_output(&cfg, "edges_has_phenotype.csv");
    assert_eq!(phenos.len(), 2);
    assert!(phenos.iter().all(|r| r.get("source_id") == "MONDO:0004975"));

    // ── Referential integrity across every edge table ───────────────────────
    for rel_type in registry.edge_types() {
        let path = cfg.edge_table_path(rel_type);
        if !path.exists() {
            continue;
        }
        let schema = registry.edge_schema(rel_type).unwrap();
        let sources = Table::read_csv(&cfg.node_table_path(schema.source_label)).unwrap();
        let targets = Table::read_csv(&cfg.node_table_path(schema.target_label)).unwrap();
        let source_ids: HashSet<&str> = sources.iter().map(|r| r.get("id")).collect();
        let target_ids: HashSet<&str> = targets.iter().map(|r| r.get("id")).collect();

        let edges = Table::read_csv(&path).unwrap();
        for edge in edges.iter() {
            assert!(
                source_ids.contains(edge.get("source_id")),
                "{rel_type}: dangling source {}",
                edge.get("source_id")
            );
            assert!(
                target_ids.contains(edge.get("target_id")),
                "{rel_type}: dangling target {}",
                edge.get("target_id")
            );
        }
    }

    // ── Export renaming ─────────────────────────────────────────────────────
    let exported = Table::read_csv(&cfg.export_dir.join("neo4j_nodes_disease.csv")).unwrap();
    assert_eq!(exported.columns()[0], "id:ID(Disease)");
    assert_eq!(
        &exported.columns()[1..],
        &read_output(&cfg, "nodes_disease.csv").columns()[1..]
    );
    let exported_edges =
        Table::read_csv(&cfg.export_dir.join("neo4j_edges_has_biomarker.csv")).unwrap();
    assert_eq!(exported_edges.columns()[0], "source_id:START_ID(Disease)");
    assert_eq!(exported_edges.columns()[1], "target_id:END_ID(Biomarker)");
    assert!(cfg.export_dir.join("import_manifest.json").exists());
}

#[test]
fn test_pipeline_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup_fixtures(dir.path());
    let registry = SchemaRegistry::new();

    run_all(&cfg, &registry).unwrap();
    let snapshot = |dir: &Path| -> Vec<(String, String)> {
        let mut files: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        files.sort();
        files
            .into_iter()
            .map(|p| {
                (
                    p.file_name().unwrap().to_string_lossy().to_string(),
                    std::fs::read_to_string(&p).unwrap(),
                )
            })
            .collect()
    };

    let first_output = snapshot(&cfg.output_dir);
    let first_export = snapshot(&cfg.export_dir);
    assert!(!first_output.is_empty());

    run_all(&cfg, &registry).unwrap();

    assert_eq!(first_output, snapshot(&cfg.output_dir));
    assert_eq!(first_export, snapshot(&cfg.export_dir));
}

#[test]
fn test_missing_optional_sources_skip_but_siblings_build() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup_fixtures(dir.path());
    // Drop one node source and one edge source; everything else must
    // still build.
    std::fs::remove_file(cfg.site_dir.join("alzpedia_entities.csv")).unwrap();
    std::fs::remove_file(cfg.site_dir.join("therapeutics_targets.csv")).unwrap();

    let registry = SchemaRegistry::new();
    run_all(&cfg, &registry).unwrap();

    assert!(cfg.node_table_path("Disease").exists());
    assert!(!cfg.node_table_path("AlzPediaEntity").exists());
    assert!(!cfg.edge_table_path("TARGETS_PROTEIN").exists());
    assert!(cfg.edge_table_path("HAS_BIOMARKER").exists());
    assert!(cfg.edge_table_path("ENCODES").exists());
}

#[test]
fn test_missing_node_table_is_fatal_for_edges() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = setup_fixtures(dir.path());
    // Without the biomarker source the Biomarker label is skipped, and the
    // HAS_BIOMARKER builder then has nothing to link against.
    std::fs::remove_file(cfg.site_dir.join("alzbiomarker_biomarkers.csv")).unwrap();

    let registry = SchemaRegistry::new();
    let err = run_all(&cfg, &registry).unwrap_err();
    assert!(matches!(
        err,
        cerebryx_common::error::KgError::MissingNodeTable { .. }
    ));
}
