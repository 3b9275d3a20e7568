use serde::Serialize;
use simple_error::bail;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry::{Occupied, Vacant};

use crate::data_types::gene::Gene;
use crate::data_types::risk_level::{Severity, Verdict};
use crate::database::pgx_tables::TableMetadata;
use crate::explanation::ExplanationBlock;

/// Placeholder for any string field without data
pub const UNKNOWN_FIELD: &str = "Unknown";
/// Placeholder for missing evidence or scores
pub const NO_DATA_FIELD: &str = "No data";

/// Whether an assessment relied on defaults or lacked data
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCompleteness {
    /// Every governing gene was classified from known alleles
    Complete,
    /// At least one allele was scored with the wildtype default
    DefaultedAlleles,
    /// At least one governing gene had no phenotype, or the drug has no gene coverage
    MissingGeneData
}

/// Intended to be serialized to JSON as the final result
#[derive(Clone, Debug, Serialize)]
pub struct PgxRiskReport {
    /// Version of the tool that generated the report
    pgxguard_version: String,
    /// Metadata for the reference tables
    tables_metadata: TableMetadata,
    /// Parsing and data quality summary
    quality_metrics: QualityMetrics,
    /// Map from gene to its phenotype summary
    gene_summaries: BTreeMap<Gene, GeneSummary>,
    /// One assessment per requested drug, in request order
    assessments: Vec<DrugRiskAssessment>
}

impl PgxRiskReport {
    /// Basic constructor
    pub fn new(tables_metadata: TableMetadata, quality_metrics: QualityMetrics) -> PgxRiskReport {
        PgxRiskReport {
            pgxguard_version: crate::cli::core::FULL_VERSION.to_string(),
            tables_metadata,
            quality_metrics,
            gene_summaries: Default::default(),
            assessments: vec![]
        }
    }

    /// Simple wrapper for our gene summary insertion to make sure we do not double insert
    /// # Arguments
    /// * `gene` - the gene we are saving the summary for
    /// * `summary` - the summary getting saved
    /// # Errors
    /// * if the gene already has a summary
    pub fn insert_gene_summary(&mut self, gene: Gene, summary: GeneSummary) -> Result<(), Box<dyn std::error::Error>> {
        match self.gene_summaries.entry(gene) {
            Vacant(entry) => entry.insert(summary),
            Occupied(entry) => bail!("Entry for {} is already occupied.", entry.key())
        };
        Ok(())
    }

    /// Sets the assessments and refreshes the overall completeness
    pub fn set_assessments(&mut self, assessments: Vec<DrugRiskAssessment>) {
        self.quality_metrics.data_completeness = assessments.iter()
            .map(|a| a.data_completeness)
            .max()
            .unwrap_or(DataCompleteness::Complete);
        self.assessments = assessments;
    }

    pub fn pgxguard_version(&self) -> &str {
        &self.pgxguard_version
    }

    pub fn tables_metadata(&self) -> &TableMetadata {
        &self.tables_metadata
    }

    pub fn quality_metrics(&self) -> &QualityMetrics {
        &self.quality_metrics
    }

    pub fn gene_summaries(&self) -> &BTreeMap<Gene, GeneSummary> {
        &self.gene_summaries
    }

    pub fn assessments(&self) -> &[DrugRiskAssessment] {
        &self.assessments
    }
}

/// Summary of the parsed input
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QualityMetrics {
    pub vcf_format_version: String,
    pub total_data_lines: usize,
    pub skipped_lines: usize,
    pub unassigned_records: usize,
    pub variant_count: usize,
    pub genes_analyzed: Vec<Gene>,
    pub data_completeness: DataCompleteness,
    pub algorithm_version: String
}

/// Phenotype summary for one gene found in the input
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneSummary {
    pub diplotype: String,
    pub phenotype: String,
    pub phenotype_abbreviation: String,
    pub phenotype_source: String,
    pub activity_score: String,
    pub defaulted_alleles: bool,
    pub variant_count: usize
}

/// The verdict block
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub risk_label: Verdict,
    pub severity: Severity,
    pub confidence_score: f64
}

/// A variant record that contributed to a drug's genes
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DetectedVariant {
    pub gene: Gene,
    pub variant_id: String,
    pub genotype: String,
    pub diplotype: String,
    pub phenotype: String
}

/// Genotype and phenotype details for the drug's primary gene
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PharmacogenomicProfile {
    pub primary_gene: String,
    pub governing_genes: Vec<Gene>,
    pub diplotype: String,
    pub phenotype: String,
    pub phenotype_abbreviation: String,
    pub activity_score: String,
    /// Worst phenotype across the classified governing genes
    pub combined_phenotype: String,
    pub detected_variants: Vec<DetectedVariant>
}

impl PharmacogenomicProfile {
    /// Profile with every field set to its placeholder
    pub fn unknown(governing_genes: Vec<Gene>) -> PharmacogenomicProfile {
        PharmacogenomicProfile {
            primary_gene: UNKNOWN_FIELD.to_string(),
            governing_genes,
            diplotype: UNKNOWN_FIELD.to_string(),
            phenotype: UNKNOWN_FIELD.to_string(),
            phenotype_abbreviation: UNKNOWN_FIELD.to_string(),
            activity_score: NO_DATA_FIELD.to_string(),
            combined_phenotype: UNKNOWN_FIELD.to_string(),
            detected_variants: vec![]
        }
    }
}

/// Dosing guidance and the verdict rationale
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClinicalRecommendation {
    pub dosing_recommendation: String,
    pub monitoring: String,
    pub clinical_guidance: String,
    pub strength: String,
    pub evidence_level: String,
    pub reference: String,
    pub rationale: String
}

/// The assessment for one requested drug
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DrugRiskAssessment {
    /// Canonical drug name, or the request text when unrecognized
    drug: String,
    risk_assessment: RiskAssessment,
    pharmacogenomic_profile: PharmacogenomicProfile,
    clinical_recommendation: ClinicalRecommendation,
    explanation: ExplanationBlock,
    data_completeness: DataCompleteness
}

impl DrugRiskAssessment {
    pub fn new(
        drug: String, risk_assessment: RiskAssessment, pharmacogenomic_profile: PharmacogenomicProfile,
        clinical_recommendation: ClinicalRecommendation, explanation: ExplanationBlock, data_completeness: DataCompleteness
    ) -> DrugRiskAssessment {
        DrugRiskAssessment {
            drug,
            risk_assessment,
            pharmacogenomic_profile,
            clinical_recommendation,
            explanation,
            data_completeness
        }
    }

    /// Assessment for a drug that failed to resolve; only this drug is affected
    /// # Arguments
    /// * `drug` - the drug as requested
    /// * `message` - the failure description
    pub fn error(drug: &str, message: &str) -> DrugRiskAssessment {
        DrugRiskAssessment {
            drug: drug.to_string(),
            risk_assessment: RiskAssessment {
                risk_label: Verdict::Error,
                severity: Verdict::Error.severity(),
                confidence_score: ERROR_CONFIDENCE
            },
            pharmacogenomic_profile: PharmacogenomicProfile::unknown(vec![]),
            clinical_recommendation: ClinicalRecommendation {
                dosing_recommendation: "Consult pharmacist".to_string(),
                monitoring: "Manual review required".to_string(),
                clinical_guidance: message.to_string(),
                strength: "Weak".to_string(),
                evidence_level: NO_DATA_FIELD.to_string(),
                reference: "Manual review required".to_string(),
                rationale: message.to_string()
            },
            explanation: ExplanationBlock::unavailable(None),
            data_completeness: DataCompleteness::MissingGeneData
        }
    }

    // getters
    pub fn drug(&self) -> &str {
        &self.drug
    }

    pub fn risk_assessment(&self) -> &RiskAssessment {
        &self.risk_assessment
    }

    pub fn pharmacogenomic_profile(&self) -> &PharmacogenomicProfile {
        &self.pharmacogenomic_profile
    }

    pub fn clinical_recommendation(&self) -> &ClinicalRecommendation {
        &self.clinical_recommendation
    }

    pub fn explanation(&self) -> &ExplanationBlock {
        &self.explanation
    }

    pub fn data_completeness(&self) -> DataCompleteness {
        self.data_completeness
    }
}

/// Confidence reported for unknown and failed verdicts
pub const ERROR_CONFIDENCE: f64 = 0.3;
