use log::{debug, info, warn};
use rayon::prelude::*;
use rustc_hash::FxHashSet as HashSet;
use simple_error::bail;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use crate::data_types::assessment::{
    ClinicalRecommendation, DataCompleteness, DetectedVariant, DrugRiskAssessment, GeneSummary,
    NO_DATA_FIELD, PgxRiskReport, PharmacogenomicProfile, QualityMetrics, RiskAssessment, UNKNOWN_FIELD
};
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::{Phenotype, merge_worst_phenotype};
use crate::data_types::risk_level::Verdict;
use crate::data_types::variant_record::VariantRecord;
use crate::database::guidance::resolve_guidance;
use crate::database::pgx_tables::PgxTables;
use crate::explanation::{ExplanationBlock, ExplanationService, RiskExplanationRequest, VariantExplanationRequest, explain_with_fallback};
use crate::phenotyper::{GenePhenotype, PhenotypeCall, phenotype_genes};
use crate::risk_resolver::{DrugRiskResolution, calculate_confidence, resolve_drug_risk};
use crate::util::file_io::load_file_lines;
use crate::vcf_parser::{ParsedVcf, parse_vcf_file, parse_vcf_text};

/// Restricts which genes are classified
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GeneFilter {
    /// every gene is classified
    #[default]
    All,
    /// only these genes are classified
    Include(HashSet<Gene>),
    /// these genes are ignored
    Exclude(HashSet<Gene>)
}

impl GeneFilter {
    /// Loads a filter from optional include or exclude gene lists, one gene per line
    /// # Arguments
    /// * `include_fn` - genes to keep
    /// * `exclude_fn` - genes to remove
    /// # Errors
    /// * if both files are given
    /// * if a file cannot be read or names a gene that is not modeled
    pub fn from_files(include_fn: Option<&Path>, exclude_fn: Option<&Path>) -> Result<GeneFilter, Box<dyn std::error::Error>> {
        match (include_fn, exclude_fn) {
            (Some(_), Some(_)) => bail!("Only one of the include and exclude sets can be provided"),
            (Some(ifn), None) => Ok(GeneFilter::Include(load_gene_set(ifn)?)),
            (None, Some(efn)) => Ok(GeneFilter::Exclude(load_gene_set(efn)?)),
            (None, None) => Ok(GeneFilter::All)
        }
    }

    pub fn allows(&self, gene: Gene) -> bool {
        match self {
            GeneFilter::All => true,
            GeneFilter::Include(genes) => genes.contains(&gene),
            GeneFilter::Exclude(genes) => !genes.contains(&gene)
        }
    }
}

/// Loads a set of genes from file
fn load_gene_set(filename: &Path) -> Result<HashSet<Gene>, Box<dyn std::error::Error>> {
    let mut genes: HashSet<Gene> = Default::default();
    for name in load_file_lines(filename)?.iter() {
        match Gene::from_str(name) {
            Ok(gene) => {
                genes.insert(gene);
            },
            Err(_) => bail!("Unrecognized gene in {filename:?}: {name:?}")
        };
    }
    Ok(genes)
}

/// Runs the full pipeline on a variant file.
/// # Arguments
/// * `tables` - the reference tables
/// * `filename` - the variant file, optionally gzipped
/// * `drugs` - the requested drugs, one assessment is produced per entry in this order
/// * `gene_filter` - restricts which genes are classified
/// * `explainer` - optional explanation service, templates are used otherwise
/// # Errors
/// * if the file cannot be read or is not a variant file; per-drug failures never fail the pipeline
pub fn assess_vcf_file(
    tables: &PgxTables, filename: &Path, drugs: &[String], gene_filter: &GeneFilter,
    explainer: Option<&dyn ExplanationService>
) -> Result<PgxRiskReport, Box<dyn std::error::Error>> {
    info!("Parsing variant file {filename:?}...");
    let parsed = parse_vcf_file(filename)?;
    assess_parsed(tables, &parsed, drugs, gene_filter, explainer)
}

/// Runs the full pipeline on in-memory variant file content.
/// # Arguments
/// * `tables` - the reference tables
/// * `text` - the variant file content
/// * `drugs` - the requested drugs
/// * `gene_filter` - restricts which genes are classified
/// * `explainer` - optional explanation service
/// # Errors
/// * if the content is not a variant file
pub fn assess_vcf_text(
    tables: &PgxTables, text: &str, drugs: &[String], gene_filter: &GeneFilter,
    explainer: Option<&dyn ExplanationService>
) -> Result<PgxRiskReport, Box<dyn std::error::Error>> {
    let parsed = parse_vcf_text(text)?;
    assess_parsed(tables, &parsed, drugs, gene_filter, explainer)
}

/// Classifies genes and assesses every drug for an already parsed file.
/// # Arguments
/// * `tables` - the reference tables
/// * `parsed` - the parsed variant file
/// * `drugs` - the requested drugs
/// * `gene_filter` - restricts which genes are classified
/// * `explainer` - optional explanation service
/// # Errors
/// * if the report cannot be assembled
pub fn assess_parsed(
    tables: &PgxTables, parsed: &ParsedVcf, drugs: &[String], gene_filter: &GeneFilter,
    explainer: Option<&dyn ExplanationService>
) -> Result<PgxRiskReport, Box<dyn std::error::Error>> {
    // CLASSIFY
    let records_by_gene: BTreeMap<Gene, Vec<VariantRecord>> = parsed.records_by_gene().iter()
        .filter(|&(&gene, _)| {
            let allowed = gene_filter.allows(gene);
            if !allowed {
                debug!("Skipping {gene}, removed by gene filter");
            }
            allowed
        })
        .map(|(&gene, records)| (gene, records.clone()))
        .collect();
    let gene_results: BTreeMap<Gene, GenePhenotype> = phenotype_genes(tables, &records_by_gene);
    let phenotypes: BTreeMap<Gene, Phenotype> = gene_results.iter()
        .filter_map(|(&gene, result)| result.phenotype().map(|p| (gene, p)))
        .collect();
    info!("Classified {} of {} genes", phenotypes.len(), gene_results.len());

    // RESOLVE, in parallel; collect keeps request order
    let context = AssessmentContext {
        records_by_gene: &records_by_gene,
        gene_results: &gene_results,
        phenotypes: &phenotypes,
        explainer
    };
    let assessments: Vec<DrugRiskAssessment> = drugs.par_iter()
        .map(|drug| context.assess_drug(drug))
        .collect();

    // ASSEMBLE
    let quality_metrics = QualityMetrics {
        vcf_format_version: parsed.file_format_version().to_string(),
        total_data_lines: parsed.total_data_lines(),
        skipped_lines: parsed.skipped_lines(),
        unassigned_records: parsed.unassigned_records(),
        variant_count: records_by_gene.values().map(|r| r.len()).sum(),
        genes_analyzed: gene_results.keys().copied().collect(),
        data_completeness: DataCompleteness::Complete,
        algorithm_version: tables.metadata().algorithm_version.clone()
    };
    let mut report = PgxRiskReport::new(tables.metadata().clone(), quality_metrics);
    for (&gene, result) in gene_results.iter() {
        report.insert_gene_summary(gene, summarize_gene(result))?;
    }
    report.set_assessments(assessments);
    Ok(report)
}

/// Everything shared across the per-drug assessments
struct AssessmentContext<'a> {
    records_by_gene: &'a BTreeMap<Gene, Vec<VariantRecord>>,
    gene_results: &'a BTreeMap<Gene, GenePhenotype>,
    phenotypes: &'a BTreeMap<Gene, Phenotype>,
    explainer: Option<&'a dyn ExplanationService>
}

impl AssessmentContext<'_> {
    /// Assesses a single drug; failures become an error assessment for this drug only
    fn assess_drug(&self, drug_input: &str) -> DrugRiskAssessment {
        match resolve_drug_risk(drug_input, self.phenotypes) {
            Ok(resolution) => self.build_assessment(&resolution),
            Err(e) => {
                warn!("Error while assessing {drug_input:?}: {e}");
                DrugRiskAssessment::error(drug_input, &e.to_string())
            }
        }
    }

    fn build_assessment(&self, resolution: &DrugRiskResolution) -> DrugRiskAssessment {
        let drug_name: &str = resolution.drug_name().display_name();
        let risk_level = resolution.risk_level();
        let primary_gene: Option<Gene> = resolution.primary_gene();
        let primary: Option<&GenePhenotype> = primary_gene.and_then(|g| self.gene_results.get(&g));
        let primary_phenotype: Option<Phenotype> = primary.and_then(|p| p.phenotype());
        let activity: Option<f64> = primary.and_then(gene_activity);

        let verdict = Verdict::Resolved(risk_level);
        let risk_assessment = RiskAssessment {
            risk_label: verdict,
            severity: verdict.severity(),
            confidence_score: calculate_confidence(risk_level, primary_gene, primary_phenotype, activity)
        };

        let guidance = resolve_guidance(resolution.drug_name().drug(), drug_name, primary_phenotype, risk_level);

        let mut profile = PharmacogenomicProfile::unknown(resolution.governing_genes().to_vec());
        if let Some(gene) = primary_gene {
            profile.primary_gene = gene.to_string();
        }
        if let Some(diplotype) = primary.and_then(|p| p.diplotype()) {
            profile.diplotype = diplotype.to_string();
        }
        if let Some(phenotype) = primary_phenotype {
            profile.phenotype = phenotype.label().to_string();
            profile.phenotype_abbreviation = phenotype.abbreviation().to_string();
        }
        if let Some(a) = activity {
            profile.activity_score = format!("{a:.2}");
        }
        let classified: Vec<&Phenotype> = resolution.governing_genes().iter()
            .filter_map(|g| self.phenotypes.get(g))
            .collect();
        if !classified.is_empty() {
            profile.combined_phenotype = merge_worst_phenotype(classified).label().to_string();
        }
        profile.detected_variants = self.detected_variants(resolution.governing_genes());

        let explanation = match (primary_gene, primary_phenotype) {
            (Some(gene), Some(phenotype)) => {
                let risk_request = RiskExplanationRequest {
                    drug: drug_name.to_string(),
                    gene,
                    phenotype,
                    risk_level,
                    clinical_guidance: guidance.clinical_guidance.clone()
                };
                let variant_request = VariantExplanationRequest {
                    gene,
                    diplotype: profile.diplotype.clone(),
                    phenotype,
                    activity_score: activity
                };
                explain_with_fallback(self.explainer, &risk_request, &variant_request)
            },
            _ => ExplanationBlock::unavailable(Some(risk_level))
        };

        let clinical_recommendation = ClinicalRecommendation {
            dosing_recommendation: guidance.dosing_recommendation,
            monitoring: guidance.monitoring,
            clinical_guidance: guidance.clinical_guidance,
            strength: guidance.strength,
            evidence_level: guidance.evidence_level,
            reference: guidance.reference,
            rationale: resolution.rationale().to_string()
        };

        DrugRiskAssessment::new(
            drug_name.to_string(),
            risk_assessment,
            profile,
            clinical_recommendation,
            explanation,
            self.completeness(resolution.governing_genes())
        )
    }

    /// Every record on the governing genes, in gene order then file order
    fn detected_variants(&self, genes: &[Gene]) -> Vec<DetectedVariant> {
        genes.iter()
            .flat_map(|gene| {
                let phenotype: String = self.gene_results.get(gene)
                    .and_then(|r| r.phenotype())
                    .map(|p| p.label().to_string())
                    .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
                self.records_by_gene.get(gene)
                    .map(|records| records.as_slice())
                    .unwrap_or_default()
                    .iter()
                    .map(move |record| DetectedVariant {
                        gene: *gene,
                        variant_id: record.variant_id().unwrap_or(UNKNOWN_FIELD).to_string(),
                        genotype: record.genotype().raw().to_string(),
                        diplotype: record.diplotype()
                            .map(|d| d.to_string())
                            .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
                        phenotype: phenotype.clone()
                    })
            })
            .collect()
    }

    /// Missing data on any governing gene outranks defaulted alleles
    fn completeness(&self, genes: &[Gene]) -> DataCompleteness {
        if genes.is_empty() || genes.iter().any(|g| !self.phenotypes.contains_key(g)) {
            DataCompleteness::MissingGeneData
        } else if genes.iter().any(|g| self.gene_results.get(g).map(|r| r.defaulted_alleles()).unwrap_or(false)) {
            DataCompleteness::DefaultedAlleles
        } else {
            DataCompleteness::Complete
        }
    }
}

/// The activity score total if the activity model classified the gene
fn gene_activity(result: &GenePhenotype) -> Option<f64> {
    result.call().classification()
        .and_then(|c| c.activity_score())
        .map(|s| s.total)
}

/// Builds the report summary for a gene
fn summarize_gene(result: &GenePhenotype) -> GeneSummary {
    let phenotype = result.phenotype();
    let source: String = match result.call() {
        PhenotypeCall::Classified(c) => c.source().as_str().to_string(),
        PhenotypeCall::Defaulted { .. } => "defaulted".to_string(),
        PhenotypeCall::NotClassified { .. } => "not_classified".to_string()
    };
    GeneSummary {
        diplotype: result.diplotype()
            .map(|d| d.to_string())
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string()),
        phenotype: phenotype.map(|p| p.label()).unwrap_or(UNKNOWN_FIELD).to_string(),
        phenotype_abbreviation: phenotype.map(|p| p.abbreviation()).unwrap_or(UNKNOWN_FIELD).to_string(),
        phenotype_source: source,
        activity_score: gene_activity(result)
            .map(|a| format!("{a:.2}"))
            .unwrap_or_else(|| NO_DATA_FIELD.to_string()),
        defaulted_alleles: result.defaulted_alleles(),
        variant_count: result.variant_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::risk_level::{RiskLevel, Severity};
    use crate::database::pgx_tables::DEFAULT_TABLES;
    use crate::errors::ParseError;
    use std::path::PathBuf;

    const HEADER: &str = "##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n";

    fn drugs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn assess(body: &str, names: &[&str]) -> PgxRiskReport {
        assess_vcf_text(&DEFAULT_TABLES, &format!("{HEADER}{body}"), &drugs(names), &GeneFilter::All, None).unwrap()
    }

    #[test]
    fn test_basic_file() {
        let report = assess_vcf_file(
            &DEFAULT_TABLES, &PathBuf::from("test_data/sample_basic.vcf"),
            &drugs(&["codeine", "clopidogrel", "warfarin", "simvastatin", "azathioprine", "fluorouracil"]),
            &GeneFilter::All, None
        ).unwrap();
        let labels: Vec<&str> = report.assessments().iter()
            .map(|a| a.risk_assessment().risk_label.label())
            .collect();
        // CYP2D6 *1/*1 -> UR, CYP2C19 *1/*2 -> IM, CYP2C9 *2/*2 -> 1.6 -> IM, SLCO1B1 *1A/*2 -> IM, TPMT and DPYD normal
        assert_eq!(labels, vec!["Toxic", "Adjust Dosage", "Adjust Dosage", "Adjust Dosage", "Safe", "Safe"]);

        let codeine = &report.assessments()[0];
        assert_eq!(codeine.drug(), "Codeine");
        assert_eq!(codeine.risk_assessment().severity, Severity::Critical);
        assert_eq!(codeine.risk_assessment().confidence_score, 0.85);
        let profile = codeine.pharmacogenomic_profile();
        assert_eq!(profile.primary_gene, "CYP2D6");
        assert_eq!(profile.diplotype, "*1/*1");
        assert_eq!(profile.phenotype, "Ultra-Rapid Metabolizer");
        assert_eq!(profile.phenotype_abbreviation, "URM");
        assert_eq!(profile.activity_score, "2.00");
        assert_eq!(profile.detected_variants.len(), 2);
        assert_eq!(codeine.clinical_recommendation().evidence_level, "1A");
        assert_eq!(codeine.data_completeness(), DataCompleteness::Complete);

        assert_eq!(report.quality_metrics().variant_count, 8);
        assert_eq!(report.quality_metrics().genes_analyzed.len(), 6);
        assert_eq!(report.gene_summaries()[&Gene::Cyp2c9].phenotype, "Intermediate Metabolizer");

        let warfarin = &report.assessments()[2];
        assert_eq!(warfarin.pharmacogenomic_profile().diplotype, "*2/*2");
        assert_eq!(warfarin.pharmacogenomic_profile().activity_score, "1.60");

        // CYP3A4 leads, so the profile has no primary data while SLCO1B1 still drives the verdict
        let simvastatin = &report.assessments()[3];
        let profile = simvastatin.pharmacogenomic_profile();
        assert_eq!(profile.primary_gene, "CYP3A4");
        assert_eq!(profile.governing_genes, vec![Gene::Cyp3a4, Gene::Slco1b1]);
        assert_eq!(profile.phenotype, "Unknown");
        assert_eq!(profile.combined_phenotype, "Intermediate Metabolizer");
        assert_eq!(simvastatin.clinical_recommendation().rationale,
            "CYP3A4: No variant data available | SLCO1B1 (Intermediate Metabolizer): Adjust Dosage");
        assert_eq!(simvastatin.data_completeness(), DataCompleteness::MissingGeneData);
    }

    #[test]
    fn test_alternate_alleles_are_star_two() {
        let body = "10\t94942758\trs1057910\tA\tC\t50\tPASS\t.\tGT:DP\t1/1:30\n";
        let report = assess(body, &["warfarin"]);
        let warfarin = &report.assessments()[0];
        assert_eq!(warfarin.pharmacogenomic_profile().diplotype, "*2/*2");
        assert_eq!(warfarin.pharmacogenomic_profile().phenotype, "Intermediate Metabolizer");
        assert_eq!(warfarin.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::AdjustDosage));

        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t1/1:30\n";
        let report = assess(body, &["codeine"]);
        let codeine = &report.assessments()[0];
        assert_eq!(codeine.pharmacogenomic_profile().diplotype, "*2/*2");
        assert_eq!(codeine.pharmacogenomic_profile().activity_score, "0.00");
        assert_eq!(codeine.pharmacogenomic_profile().phenotype, "Poor Metabolizer");
        assert_eq!(codeine.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Ineffective));
    }

    #[test]
    fn test_first_record_represents_gene() {
        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t0/0:30\n\
            22\t42128945\trs3892097\tC\tT\t60\tPASS\t.\tGT:DP\t1/1:30\n";
        let report = assess(body, &["codeine"]);
        let codeine = &report.assessments()[0];
        assert_eq!(codeine.pharmacogenomic_profile().diplotype, "*1/*1");
        assert_eq!(codeine.pharmacogenomic_profile().phenotype, "Ultra-Rapid Metabolizer");
        assert_eq!(codeine.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Toxic));
        assert_eq!(codeine.pharmacogenomic_profile().detected_variants.len(), 2);
    }

    #[test]
    fn test_clopidogrel_ultra_rapid_unmapped() {
        // CYP2C19 *1/*1 -> 2.0 -> UR
        let body = "10\t96541616\trs4244285\tG\tA\t55\tPASS\t.\tGT:DP\t0/0:40\n";
        let report = assess(body, &["clopidogrel"]);
        let clopidogrel = &report.assessments()[0];
        assert_eq!(clopidogrel.pharmacogenomic_profile().phenotype, "Ultra-Rapid Metabolizer");
        assert_eq!(clopidogrel.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Unknown));
        assert_eq!(clopidogrel.clinical_recommendation().reference, "Manual review required");
    }

    #[test]
    fn test_combined_phenotype() {
        // CYP2D6 *1/*1 -> UR and CYP2C19 *1/*1 -> UR for amitriptyline
        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t0/0:30\n\
            10\t96541616\trs4244285\tG\tA\t55\tPASS\t.\tGT:DP\t0/0:40\n";
        let report = assess(body, &["amitriptyline"]);
        assert_eq!(report.assessments()[0].pharmacogenomic_profile().combined_phenotype, "Ultra-Rapid Metabolizer");

        // CYP2C19 *1/*2 -> IM outranks CYP2D6 UR
        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t0/0:30\n\
            10\t96541616\trs4244285\tG\tA\t55\tPASS\t.\tGT:DP\t0/1:40\n";
        let report = assess(body, &["amitriptyline"]);
        assert_eq!(report.assessments()[0].pharmacogenomic_profile().combined_phenotype, "Intermediate Metabolizer");

        let report = assess("", &["amitriptyline"]);
        assert_eq!(report.assessments()[0].pharmacogenomic_profile().combined_phenotype, "Unknown");
    }

    #[test]
    fn test_unknown_drug_isolated() {
        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t1/1:30\n";
        let report = assess(body, &["Aspirin", "codeine"]);
        let aspirin = &report.assessments()[0];
        assert_eq!(aspirin.drug(), "Aspirin");
        assert_eq!(aspirin.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Unknown));
        assert_eq!(aspirin.risk_assessment().confidence_score, 0.3);
        assert_eq!(aspirin.data_completeness(), DataCompleteness::MissingGeneData);

        // *2/*2 -> 0.0 -> poor
        let codeine = &report.assessments()[1];
        assert_eq!(codeine.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Ineffective));
        assert_eq!(codeine.pharmacogenomic_profile().diplotype, "*2/*2");
    }

    #[test]
    fn test_error_isolated() {
        let body = "22\t42126499\trs1065852\tG\tA\t60\tPASS\t.\tGT:DP\t0/0:30\n";
        let report = assess(body, &["", "codeine"]);
        assert_eq!(report.assessments()[0].risk_assessment().risk_label, Verdict::Error);
        assert_eq!(report.assessments()[0].clinical_recommendation().rationale, "drug name is empty");
        assert_eq!(report.assessments()[1].risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Toxic));
    }

    #[test]
    fn test_missing_data_placeholders() {
        let report = assess("", &["codeine", "warfarin", "Aspirin", "tacrolimus"]);
        for assessment in report.assessments() {
            let json = serde_json::to_value(assessment).unwrap();
            let profile = &json["pharmacogenomic_profile"];
            for field in ["primary_gene", "diplotype", "phenotype", "phenotype_abbreviation", "activity_score", "combined_phenotype"] {
                assert!(profile[field].is_string(), "{field} missing for {}", assessment.drug());
            }
            let recommendation = &json["clinical_recommendation"];
            for field in ["dosing_recommendation", "monitoring", "clinical_guidance", "strength", "evidence_level", "reference", "rationale"] {
                assert!(recommendation[field].is_string());
                assert!(!recommendation[field].as_str().unwrap().is_empty());
            }
            assert!(json["explanation"]["risk_explanation"].is_string());
            assert_eq!(assessment.risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Unknown));
        }
        let codeine = &report.assessments()[0];
        assert_eq!(codeine.pharmacogenomic_profile().primary_gene, "CYP2D6");
        assert_eq!(codeine.pharmacogenomic_profile().diplotype, "Unknown");
        assert_eq!(codeine.clinical_recommendation().dosing_recommendation, "Consult pharmacist for dosing guidance");
    }

    #[test]
    fn test_idempotent() {
        let filename = PathBuf::from("test_data/sample_basic.vcf");
        let names = drugs(&["codeine", "warfarin", "amitriptyline", "bogus"]);
        let r1 = assess_vcf_file(&DEFAULT_TABLES, &filename, &names, &GeneFilter::All, None).unwrap();
        let r2 = assess_vcf_file(&DEFAULT_TABLES, &filename, &names, &GeneFilter::All, None).unwrap();
        assert_eq!(serde_json::to_string_pretty(&r1).unwrap(), serde_json::to_string_pretty(&r2).unwrap());
    }

    #[test]
    fn test_parse_failure() {
        let err = assess_vcf_text(&DEFAULT_TABLES, "not a vcf", &drugs(&["codeine"]), &GeneFilter::All, None).unwrap_err();
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn test_gene_filter() {
        let filename = PathBuf::from("test_data/sample_basic.vcf");
        let exclude = GeneFilter::Exclude([Gene::Cyp2d6].into_iter().collect());
        let report = assess_vcf_file(&DEFAULT_TABLES, &filename, &drugs(&["codeine"]), &exclude, None).unwrap();
        assert!(!report.gene_summaries().contains_key(&Gene::Cyp2d6));
        assert_eq!(report.assessments()[0].clinical_recommendation().rationale, "CYP2D6: No variant data available");

        let include = GeneFilter::Include([Gene::Tpmt].into_iter().collect());
        let report = assess_vcf_file(&DEFAULT_TABLES, &filename, &drugs(&["azathioprine"]), &include, None).unwrap();
        assert_eq!(report.gene_summaries().len(), 1);
        assert_eq!(report.assessments()[0].risk_assessment().risk_label, Verdict::Resolved(RiskLevel::Safe));
    }

    #[test]
    fn test_gene_filter_files() {
        let include = PathBuf::from("test_data/include_genes.txt");
        let filter = GeneFilter::from_files(Some(&include), None).unwrap();
        assert!(filter.allows(Gene::Cyp2d6));
        assert!(filter.allows(Gene::Cyp2c19));
        assert!(!filter.allows(Gene::Tpmt));

        let filter = GeneFilter::from_files(None, Some(&include)).unwrap();
        assert!(!filter.allows(Gene::Cyp2d6));
        assert!(filter.allows(Gene::Tpmt));

        assert_eq!(GeneFilter::from_files(None, None).unwrap(), GeneFilter::All);
        assert!(GeneFilter::from_files(Some(&include), Some(&include)).is_err());
        // not a gene list
        assert!(GeneFilter::from_files(Some(&PathBuf::from("test_data/drug_list.txt")), None).is_err());
    }

    #[test]
    fn test_defaulted_alleles() {
        let body = "6\t18000000\trs123\tA\tG\t60\tPASS\t.\tGT:DP\t0/1:30\n";
        let report = assess(body, &["azathioprine"]);
        // TPMT *1/*2 -> 1.0 -> intermediate, nothing defaulted
        assert_eq!(report.assessments()[0].data_completeness(), DataCompleteness::Complete);

        let body = "1\t98403947\trs67376798\tT\tA\t60\tPASS\t.\tGT:DP\t0/1:30\n";
        let report = assess(body, &["fluorouracil"]);
        // DPYD has no plain *2 entry, so the wildtype default applies
        let fluorouracil = &report.assessments()[0];
        assert_eq!(fluorouracil.data_completeness(), DataCompleteness::DefaultedAlleles);
        assert_eq!(fluorouracil.pharmacogenomic_profile().phenotype, "Normal Metabolizer");
        assert_eq!(report.quality_metrics().data_completeness, DataCompleteness::DefaultedAlleles);
    }
}
