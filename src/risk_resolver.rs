use itertools::Itertools;
use log::debug;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::assessment::ERROR_CONFIDENCE;
use crate::data_types::drug::DrugName;
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::risk_level::RiskLevel;
use crate::database::risk_rules::{DrugRiskRule, table_verdict};
use crate::errors::ResolveError;

/// The contribution of a single governing gene to a drug verdict
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GeneVerdict {
    /// The governing gene
    pub gene: Gene,
    /// The gene phenotype, None if the gene had no usable data
    pub phenotype: Option<Phenotype>,
    /// The table verdict, None if the gene did not contribute one
    pub risk_level: Option<RiskLevel>,
    /// Human readable summary for the rationale
    pub message: String
}

/// The resolved risk for one requested drug
#[derive(Clone, Debug, PartialEq)]
pub struct DrugRiskResolution {
    /// The normalized drug name
    drug_name: DrugName,
    /// Genes that govern the drug, empty for unrecognized drugs
    governing_genes: Vec<Gene>,
    /// Per-gene outcomes in governing order
    gene_verdicts: Vec<GeneVerdict>,
    /// The aggregated verdict
    risk_level: RiskLevel,
    /// Per-gene messages joined together
    rationale: String
}

impl DrugRiskResolution {
    pub fn drug_name(&self) -> &DrugName {
        &self.drug_name
    }

    pub fn governing_genes(&self) -> &[Gene] {
        &self.governing_genes
    }

    pub fn gene_verdicts(&self) -> &[GeneVerdict] {
        &self.gene_verdicts
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// The first governing gene, which drives guidance lookup
    pub fn primary_gene(&self) -> Option<Gene> {
        self.governing_genes.first().copied()
    }
}

/// Combines verdicts by severity precedence, Unknown when there are none
/// # Arguments
/// * `verdicts` - the per-gene verdicts
pub fn aggregate_risk(verdicts: impl IntoIterator<Item = RiskLevel>) -> RiskLevel {
    verdicts.into_iter()
        .max()
        .unwrap_or(RiskLevel::Unknown)
}

/// Evaluates a rule against the phenotypes for each of its governing genes
/// # Arguments
/// * `rule` - the drug rule
/// * `phenotypes` - gene -> phenotype for every classified gene
/// # Errors
/// * if the rule has no governing genes
/// * if the rule has a table for a gene that does not govern the drug
pub fn evaluate_rule(rule: &dyn DrugRiskRule, phenotypes: &BTreeMap<Gene, Phenotype>) -> Result<Vec<GeneVerdict>, ResolveError> {
    let drug_name = rule.drug().to_string();
    let governing_genes = rule.governing_genes();
    if governing_genes.is_empty() {
        return Err(ResolveError::NoGoverningGenes { drug: drug_name });
    }
    if let Some(gene) = rule.table_genes().into_iter().find(|g| !governing_genes.contains(g)) {
        return Err(ResolveError::UngovernedGeneTable { drug: drug_name, gene: gene.to_string() });
    }

    let verdicts = governing_genes.iter()
        .map(|&gene| {
            match (phenotypes.get(&gene), rule.gene_table(gene)) {
                (None, _) => GeneVerdict {
                    gene,
                    phenotype: None,
                    risk_level: None,
                    message: format!("{gene}: No variant data available")
                },
                (Some(&phenotype), None) => GeneVerdict {
                    gene,
                    phenotype: Some(phenotype),
                    risk_level: None,
                    message: format!("{gene}: No CPIC mapping for {drug_name} - manual review recommended")
                },
                (Some(&phenotype), Some(table)) => {
                    let risk_level = table_verdict(table, phenotype);
                    GeneVerdict {
                        gene,
                        phenotype: Some(phenotype),
                        risk_level: Some(risk_level),
                        message: format!("{gene} ({}): {}", phenotype.label(), risk_level.label())
                    }
                }
            }
        })
        .collect();
    Ok(verdicts)
}

/// Normalizes a drug name and resolves its risk from the gene phenotypes.
/// Unrecognized drugs resolve to Unknown rather than failing.
/// # Arguments
/// * `drug_input` - the drug name as requested
/// * `phenotypes` - gene -> phenotype for every classified gene
/// # Errors
/// * if the drug name is empty
/// * if the drug rule is inconsistent, see `evaluate_rule`
pub fn resolve_drug_risk(drug_input: &str, phenotypes: &BTreeMap<Gene, Phenotype>) -> Result<DrugRiskResolution, ResolveError> {
    if drug_input.trim().is_empty() {
        return Err(ResolveError::EmptyDrugName);
    }

    let drug_name = DrugName::normalize(drug_input);
    let drug = match drug_name.drug() {
        Some(d) => d,
        None => {
            debug!("No pharmacogenomic coverage for {drug_input:?}");
            let rationale = format!("No pharmacogenomic data available for '{}'. Consult clinical pharmacist or CPIC guidelines.", drug_name.display_name());
            return Ok(DrugRiskResolution {
                drug_name,
                governing_genes: vec![],
                gene_verdicts: vec![],
                risk_level: RiskLevel::Unknown,
                rationale
            });
        }
    };

    let rule = drug.risk_rule();
    let gene_verdicts = evaluate_rule(rule, phenotypes)?;
    let risk_level = aggregate_risk(gene_verdicts.iter().filter_map(|v| v.risk_level));
    let rationale = gene_verdicts.iter().map(|v| v.message.as_str()).join(" | ");
    debug!("{drug}: {risk_level:?} ({rationale})");

    Ok(DrugRiskResolution {
        drug_name,
        governing_genes: rule.governing_genes().to_vec(),
        gene_verdicts,
        risk_level,
        rationale
    })
}

/// Confidence in a verdict, lowered for extreme phenotypes and very low activity in the major CYP genes
/// # Arguments
/// * `risk_level` - the resolved verdict
/// * `primary_gene` - the drug's primary gene
/// * `phenotype` - the primary gene phenotype, if classified
/// * `activity` - the primary gene activity score, if the activity model was used
pub fn calculate_confidence(risk_level: RiskLevel, primary_gene: Option<Gene>, phenotype: Option<Phenotype>, activity: Option<f64>) -> f64 {
    if risk_level == RiskLevel::Unknown {
        return ERROR_CONFIDENCE;
    }

    let mut confidence: f64 = 0.9;
    if matches!(primary_gene, Some(Gene::Cyp2d6) | Some(Gene::Cyp2c19)) && activity.map(|a| a < 0.3).unwrap_or(false) {
        confidence -= 0.05;
    }
    if matches!(phenotype, Some(Phenotype::UltraRapid) | Some(Phenotype::NoFunction)) {
        confidence -= 0.05;
    }
    // two decimals keeps the output stable
    (confidence.clamp(0.5, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::drug::Drug;
    use crate::database::risk_rules::GeneRiskTable;

    fn phenotypes(entries: &[(Gene, Phenotype)]) -> BTreeMap<Gene, Phenotype> {
        entries.iter().cloned().collect()
    }

    #[test]
    fn test_codeine() {
        let resolve = |p: Phenotype| resolve_drug_risk("codeine", &phenotypes(&[(Gene::Cyp2d6, p)])).unwrap().risk_level();
        assert_eq!(resolve(Phenotype::UltraRapid), RiskLevel::Toxic);
        assert_eq!(resolve(Phenotype::Poor), RiskLevel::Ineffective);
        assert_eq!(resolve(Phenotype::Normal), RiskLevel::Safe);
    }

    #[test]
    fn test_warfarin_poor() {
        let resolution = resolve_drug_risk("Warfarin", &phenotypes(&[(Gene::Cyp2c9, Phenotype::Poor)])).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::AdjustDosage);
        assert_eq!(resolution.rationale(), "CYP2C9 (Poor Metabolizer): Adjust Dosage | VKORC1: No variant data available");
        assert_eq!(resolution.primary_gene(), Some(Gene::Cyp2c9));
    }

    #[test]
    fn test_unknown_drug() {
        let resolution = resolve_drug_risk("Aspirin", &phenotypes(&[(Gene::Cyp2d6, Phenotype::Poor)])).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::Unknown);
        assert_eq!(resolution.rationale(), "No pharmacogenomic data available for 'Aspirin'. Consult clinical pharmacist or CPIC guidelines.");
        assert!(resolution.governing_genes().is_empty());
        assert_eq!(resolution.primary_gene(), None);
    }

    #[test]
    fn test_missing_gene_data() {
        let resolution = resolve_drug_risk("azathioprine", &BTreeMap::new()).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::Unknown);
        assert_eq!(resolution.rationale(), "TPMT: No variant data available");
    }

    #[test]
    fn test_no_mapping() {
        let resolution = resolve_drug_risk("tacrolimus", &phenotypes(&[(Gene::Cyp3a5, Phenotype::Poor)])).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::Unknown);
        assert_eq!(resolution.rationale(), "CYP3A5: No CPIC mapping for Tacrolimus - manual review recommended");
        assert_eq!(resolution.gene_verdicts()[0].phenotype, Some(Phenotype::Poor));
        assert_eq!(resolution.gene_verdicts()[0].risk_level, None);
    }

    #[test]
    fn test_phenotype_missing_from_table() {
        let resolution = resolve_drug_risk("metoprolol", &phenotypes(&[(Gene::Cyp2d6, Phenotype::Intermediate)])).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::Unknown);
        assert_eq!(resolution.rationale(), "CYP2D6 (Intermediate Metabolizer): Unknown");
    }

    #[test]
    fn test_multi_gene_aggregation() {
        let resolution = resolve_drug_risk("Amitriptyline", &phenotypes(&[
            (Gene::Cyp2d6, Phenotype::Normal),
            (Gene::Cyp2c19, Phenotype::Poor)
        ])).unwrap();
        assert_eq!(resolution.risk_level(), RiskLevel::AdjustDosage);
        assert_eq!(resolution.rationale(), "CYP2D6 (Normal Metabolizer): Safe | CYP2C19 (Poor Metabolizer): Adjust Dosage");

        assert_eq!(aggregate_risk([RiskLevel::Safe, RiskLevel::Toxic]), RiskLevel::Toxic);
        assert_eq!(aggregate_risk([RiskLevel::Unknown, RiskLevel::Safe]), RiskLevel::Safe);
        assert_eq!(aggregate_risk(Vec::<RiskLevel>::new()), RiskLevel::Unknown);
    }

    struct SafeToxicRule;

    const SAFE_TABLE: GeneRiskTable = &[(Phenotype::Normal, RiskLevel::Safe)];
    const TOXIC_TABLE: GeneRiskTable = &[(Phenotype::Poor, RiskLevel::Toxic)];

    impl DrugRiskRule for SafeToxicRule {
        fn drug(&self) -> Drug {
            Drug::Amitriptyline
        }

        fn governing_genes(&self) -> &'static [Gene] {
            &[Gene::Cyp2d6, Gene::Tpmt]
        }

        fn gene_table(&self, gene: Gene) -> Option<GeneRiskTable> {
            match gene {
                Gene::Cyp2d6 => Some(SAFE_TABLE),
                Gene::Tpmt => Some(TOXIC_TABLE),
                _ => None
            }
        }
    }

    #[test]
    fn test_safe_plus_toxic() {
        let verdicts = evaluate_rule(&SafeToxicRule, &phenotypes(&[
            (Gene::Cyp2d6, Phenotype::Normal),
            (Gene::Tpmt, Phenotype::Poor)
        ])).unwrap();
        assert_eq!(aggregate_risk(verdicts.iter().filter_map(|v| v.risk_level)), RiskLevel::Toxic);
    }

    struct BrokenRule;

    impl DrugRiskRule for BrokenRule {
        fn drug(&self) -> Drug {
            Drug::Codeine
        }

        fn governing_genes(&self) -> &'static [Gene] {
            &[Gene::Cyp2d6]
        }

        fn gene_table(&self, gene: Gene) -> Option<GeneRiskTable> {
            match gene {
                Gene::Tpmt => Some(TOXIC_TABLE),
                _ => None
            }
        }
    }

    #[test]
    fn test_inconsistent_rule() {
        let err = evaluate_rule(&BrokenRule, &BTreeMap::new()).unwrap_err();
        assert_eq!(err, ResolveError::UngovernedGeneTable { drug: "Codeine".to_string(), gene: "TPMT".to_string() });
    }

    #[test]
    fn test_confidence() {
        assert_eq!(calculate_confidence(RiskLevel::Safe, Some(Gene::Tpmt), Some(Phenotype::Normal), Some(2.0)), 0.9);
        assert_eq!(calculate_confidence(RiskLevel::Toxic, Some(Gene::Cyp2d6), Some(Phenotype::UltraRapid), Some(2.0)), 0.85);
        assert_eq!(calculate_confidence(RiskLevel::AdjustDosage, Some(Gene::Cyp2c19), Some(Phenotype::Poor), Some(0.0)), 0.85);
        assert_eq!(calculate_confidence(RiskLevel::AdjustDosage, Some(Gene::Tpmt), Some(Phenotype::Poor), Some(0.0)), 0.9);
        assert_eq!(calculate_confidence(RiskLevel::Unknown, Some(Gene::Cyp2d6), Some(Phenotype::Normal), None), 0.3);
        assert_eq!(calculate_confidence(RiskLevel::Safe, None, None, None), 0.9);
    }

    #[test]
    fn test_empty_drug() {
        assert_eq!(resolve_drug_risk("  ", &BTreeMap::new()).unwrap_err(), ResolveError::EmptyDrugName);
    }
}
