use lazy_static::lazy_static;
use log::debug;
use serde::Serialize;
use simple_error::{SimpleError, bail};
use std::collections::BTreeMap;

use crate::data_types::drug::Drug;
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::risk_level::RiskLevel;
use crate::database::allele_activity::{AlleleActivityTable, default_activity_tables};
use crate::database::db_const::{ALGORITHM_VERSION, GENE_CHROMOSOMES, KNOWN_VARIANTS, KnownVariant};
use crate::database::guidance::{GUIDANCE_RECORDS, GuidanceRecord};
use crate::database::legacy_diplotypes::{LegacyDiplotypeTable, default_legacy_table};

lazy_static! {
    /// The default reference tables, built once and shared for the life of the process
    pub static ref DEFAULT_TABLES: PgxTables = PgxTables::default();
}

/// Contains metadata about the reference tables
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TableMetadata {
    /// The version of pgxguard that built the tables
    pub pgxguard_version: String,
    /// The version of the phenotype and risk rule set
    pub algorithm_version: String
}

impl Default for TableMetadata {
    fn default() -> Self {
        TableMetadata {
            pgxguard_version: crate::cli::core::FULL_VERSION.to_string(),
            algorithm_version: ALGORITHM_VERSION.to_string()
        }
    }
}

/// The full set of reference data used for inference.
/// Once constructed this is read-only; it is typically shared by reference through `DEFAULT_TABLES`.
#[derive(Clone, Debug)]
pub struct PgxTables {
    /// Metadata for the tables
    metadata: TableMetadata,
    /// Genes with an activity model
    activity_tables: BTreeMap<Gene, AlleleActivityTable>,
    /// Exact diplotype calls, used when a gene has no activity model
    legacy_diplotypes: LegacyDiplotypeTable
}

impl Default for PgxTables {
    fn default() -> Self {
        PgxTables {
            metadata: TableMetadata::default(),
            activity_tables: default_activity_tables(),
            legacy_diplotypes: default_legacy_table()
        }
    }
}

impl PgxTables {
    /// Removes the activity model for a gene, forcing that gene onto the legacy path.
    /// # Arguments
    /// * `gene` - the gene to remove the activity model for
    pub fn without_activity_model(mut self, gene: Gene) -> PgxTables {
        if self.activity_tables.remove(&gene).is_some() {
            debug!("Activity model disabled for {gene}");
        }
        self
    }

    /// Sanity checks that the tables are consistent with each other.
    /// # Errors
    /// * if a known variant sits on a chromosome other than the one listed for its gene
    /// * if a drug rule has no governing genes or a table for a gene that does not govern it
    /// * if a guidance record is keyed on a phenotype that none of the drug's gene tables produce
    pub fn validate(&self) -> Result<(), SimpleError> {
        for kv in KNOWN_VARIANTS.iter() {
            let listed: bool = GENE_CHROMOSOMES.iter()
                .any(|&(gene, chrom)| gene == kv.gene && chrom == kv.chrom);
            if !listed {
                bail!("Known variant {} maps to {} on chromosome {}, which is not listed for that gene", kv.variant_id, kv.gene, kv.chrom);
            }
        }

        for drug in Drug::all() {
            let rule = drug.risk_rule();
            if rule.governing_genes().is_empty() {
                bail!("Risk rule for {drug} has no governing genes");
            }
            for gene in rule.table_genes() {
                if !rule.governing_genes().contains(&gene) {
                    bail!("Risk rule for {drug} has a table for {gene}, which does not govern it");
                }
            }
        }

        for (drug, phenotype) in GUIDANCE_RECORDS.keys() {
            let rule = drug.risk_rule();
            let covered: bool = rule.table_genes().into_iter()
                .filter_map(|g| rule.gene_table(g))
                .any(|t| t.iter().any(|(p, _)| p == phenotype));
            if !covered {
                bail!("Guidance for {drug} / {phenotype} does not match any verdict in the drug's gene tables");
            }
        }
        Ok(())
    }

    /// Builds a serializable snapshot of every table
    pub fn export(&self) -> TableExport {
        let risk_rules: Vec<RiskRuleExport> = Drug::all()
            .map(|drug| {
                let rule = drug.risk_rule();
                RiskRuleExport {
                    drug,
                    governing_genes: rule.governing_genes().to_vec(),
                    tables: rule.table_genes().into_iter()
                        .filter_map(|g| rule.gene_table(g).map(|t| (g, t.to_vec())))
                        .collect()
                }
            })
            .collect();
        TableExport {
            metadata: self.metadata.clone(),
            gene_chromosomes: GENE_CHROMOSOMES.clone(),
            known_variants: KNOWN_VARIANTS.clone(),
            activity_tables: self.activity_tables.clone(),
            legacy_diplotypes: self.legacy_diplotypes.clone(),
            drug_aliases: Drug::aliases(),
            risk_rules,
            guidance: GUIDANCE_RECORDS.iter()
                .map(|(&(drug, phenotype), record)| GuidanceExport { drug, phenotype, record: record.clone() })
                .collect()
        }
    }

    // getters
    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    pub fn activity_tables(&self) -> &BTreeMap<Gene, AlleleActivityTable> {
        &self.activity_tables
    }

    pub fn activity_table(&self, gene: Gene) -> Option<&AlleleActivityTable> {
        self.activity_tables.get(&gene)
    }

    pub fn legacy_diplotypes(&self) -> &LegacyDiplotypeTable {
        &self.legacy_diplotypes
    }

    pub fn known_variants(&self) -> &'static [KnownVariant] {
        &KNOWN_VARIANTS
    }
}

/// Serializable snapshot of the reference tables
#[derive(Clone, Debug, Serialize)]
pub struct TableExport {
    pub metadata: TableMetadata,
    pub gene_chromosomes: Vec<(Gene, &'static str)>,
    pub known_variants: Vec<KnownVariant>,
    pub activity_tables: BTreeMap<Gene, AlleleActivityTable>,
    pub legacy_diplotypes: LegacyDiplotypeTable,
    pub drug_aliases: Vec<(&'static str, Drug)>,
    pub risk_rules: Vec<RiskRuleExport>,
    pub guidance: Vec<GuidanceExport>
}

/// A single drug rule in the export
#[derive(Clone, Debug, Serialize)]
pub struct RiskRuleExport {
    pub drug: Drug,
    pub governing_genes: Vec<Gene>,
    pub tables: BTreeMap<Gene, Vec<(Phenotype, RiskLevel)>>
}

/// A single guidance record in the export
#[derive(Clone, Debug, Serialize)]
pub struct GuidanceExport {
    pub drug: Drug,
    pub phenotype: Phenotype,
    pub record: GuidanceRecord
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_validate() {
        DEFAULT_TABLES.validate().unwrap();
        assert_eq!(DEFAULT_TABLES.metadata().algorithm_version, "CPIC-aligned-v2");
        assert_eq!(DEFAULT_TABLES.activity_tables().len(), 8);
    }

    #[test]
    fn test_without_activity_model() {
        let tables = PgxTables::default().without_activity_model(Gene::Tpmt);
        assert!(tables.activity_table(Gene::Tpmt).is_none());
        assert!(tables.activity_table(Gene::Cyp2d6).is_some());
        // removing a model keeps everything consistent
        tables.validate().unwrap();
    }

    #[test]
    fn test_export() {
        let export = DEFAULT_TABLES.export();
        assert_eq!(export.risk_rules.len(), 11);
        assert_eq!(export.guidance.len(), 25);
        let codeine = export.risk_rules.iter().find(|r| r.drug == Drug::Codeine).unwrap();
        assert_eq!(codeine.tables[&Gene::Cyp2d6].len(), 6);
        let tacrolimus = export.risk_rules.iter().find(|r| r.drug == Drug::Tacrolimus).unwrap();
        assert!(tacrolimus.tables.is_empty());
        let json = serde_json::to_string(&export).unwrap();
        assert!(json.contains("\"rs4244285\""));
    }
}
