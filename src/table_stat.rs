use std::collections::BTreeMap;
use strum::IntoEnumIterator;

use crate::data_types::drug::Drug;
use crate::data_types::gene::Gene;
use crate::database::guidance::GUIDANCE_RECORDS;
use crate::database::pgx_tables::PgxTables;

/// Summary counts for a set of reference tables
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableStats {
    pub activity_genes: usize,
    pub activity_alleles: usize,
    pub known_variants: usize,
    pub legacy_diplotypes: usize,
    pub drugs: usize,
    pub curated_drugs: usize,
    pub drug_aliases: usize,
    pub guidance_records: usize
}

/// Counts the entries in each reference table
/// # Arguments
/// * `tables` - the tables to summarize
pub fn collect_stats(tables: &PgxTables) -> TableStats {
    TableStats {
        activity_genes: tables.activity_tables().len(),
        activity_alleles: tables.activity_tables().values().map(|t| t.activities().len()).sum(),
        known_variants: tables.known_variants().len(),
        legacy_diplotypes: tables.legacy_diplotypes().len(),
        drugs: Drug::all().count(),
        curated_drugs: Drug::all().filter(|d| !d.risk_rule().table_genes().is_empty()).count(),
        drug_aliases: Drug::aliases().len(),
        guidance_records: GUIDANCE_RECORDS.len()
    }
}

/// Prints the statistics for the given tables
/// # Arguments
/// * `tables` - the tables to print the statistics for
pub fn print_stats(tables: &PgxTables) {
    let metadata = tables.metadata();
    println!("Table metadata:");
    println!("\tVersion: {}", metadata.pgxguard_version);
    println!("\tAlgorithm version: {}", metadata.algorithm_version);

    let stats = collect_stats(tables);
    println!("Table statistics:");
    println!("\tGenes: {} ({} with an activity model)", Gene::iter().count(), stats.activity_genes);
    println!("\t\tTotal alleles with activity: {}", stats.activity_alleles);
    println!("\t\tKnown variants: {}", stats.known_variants);
    println!("\t\tLegacy diplotypes: {}", stats.legacy_diplotypes);
    println!("\tDrugs: {} ({} with curated risk tables)", stats.drugs, stats.curated_drugs);
    println!("\t\tAliases: {}", stats.drug_aliases);
    println!("\t\tGuidance records: {}", stats.guidance_records);

    // per-gene and per-drug statistics, only with elevated verbosity
    if log::log_enabled!(log::Level::Debug) {
        println!();
        println!("Gene statistics:");
        println!("gene\talleles\tladder\tknown_variants\tlegacy_diplotypes");
        let mut variant_counts: BTreeMap<Gene, usize> = BTreeMap::new();
        for kv in tables.known_variants().iter() {
            *variant_counts.entry(kv.gene).or_insert(0) += 1;
        }
        let legacy_counts = tables.legacy_diplotypes().gene_counts();
        for gene in Gene::iter() {
            let (alleles, ladder) = match tables.activity_table(gene) {
                Some(t) => (t.activities().len().to_string(), format!("{:?}", t.ladder())),
                None => ("0".to_string(), "None".to_string())
            };
            println!("{gene}\t{alleles}\t{ladder}\t{}\t{}",
                variant_counts.get(&gene).unwrap_or(&0),
                legacy_counts.get(&gene).unwrap_or(&0));
        }
        println!();

        println!("Drug statistics:");
        println!("drug\tgoverning_genes\ttable_genes\tguidance_records");
        let mut guidance_counts: BTreeMap<Drug, usize> = BTreeMap::new();
        for (drug, _phenotype) in GUIDANCE_RECORDS.keys() {
            *guidance_counts.entry(*drug).or_insert(0) += 1;
        }
        for drug in Drug::all() {
            let rule = drug.risk_rule();
            let governing: Vec<String> = rule.governing_genes().iter().map(|g| g.to_string()).collect();
            let table_genes: Vec<String> = rule.table_genes().iter().map(|g| g.to_string()).collect();
            println!("{drug}\t{}\t{}\t{}", governing.join(","), table_genes.join(","),
                guidance_counts.get(&drug).unwrap_or(&0));
        }
        println!();
    }
}
