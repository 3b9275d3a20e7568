use log::warn;
use serde::Serialize;

use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::risk_level::RiskLevel;

/// Source label used when the built-in templates produce the text
pub const TEMPLATE_SOURCE: &str = "Rule-based fallback";

/// Request for a drug risk explanation
#[derive(Clone, Debug, PartialEq)]
pub struct RiskExplanationRequest {
    pub drug: String,
    pub gene: Gene,
    pub phenotype: Phenotype,
    pub risk_level: RiskLevel,
    pub clinical_guidance: String
}

/// Request for a variant (genotype) interpretation
#[derive(Clone, Debug, PartialEq)]
pub struct VariantExplanationRequest {
    pub gene: Gene,
    pub diplotype: String,
    pub phenotype: Phenotype,
    pub activity_score: Option<f64>
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationStatus {
    Success,
    Failure
}

/// Text returned by an explanation service
#[derive(Clone, Debug, PartialEq)]
pub struct ExplanationResponse {
    pub text: String,
    pub status: ExplanationStatus,
    pub cache_hit: bool
}

/// An external collaborator that turns structured results into prose.
/// Implementations must be usable from multiple threads since drugs are assessed in parallel.
pub trait ExplanationService: Send + Sync {
    /// Label reported in the output, e.g. a provider and model name
    fn source(&self) -> String;

    /// # Errors
    /// * any failure, which the caller replaces with template text
    fn explain_risk(&self, request: &RiskExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>>;

    /// # Errors
    /// * any failure, which the caller replaces with template text
    fn explain_variant(&self, request: &VariantExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>>;
}

/// The built-in template explainer, always available and deterministic
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateExplainer;

impl ExplanationService for TemplateExplainer {
    fn source(&self) -> String {
        TEMPLATE_SOURCE.to_string()
    }

    fn explain_risk(&self, request: &RiskExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
        Ok(ExplanationResponse {
            text: risk_template(request.gene, request.phenotype, request.risk_level),
            status: ExplanationStatus::Success,
            cache_hit: false
        })
    }

    fn explain_variant(&self, request: &VariantExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
        let relevance = clinical_relevance(request.gene, request.phenotype);
        let text = match request.activity_score {
            Some(score) => format!("{} diplotype {} (activity score {score:.2}). {relevance}", request.gene, request.diplotype),
            None => format!("{} diplotype {}. {relevance}", request.gene, request.diplotype)
        };
        Ok(ExplanationResponse {
            text,
            status: ExplanationStatus::Success,
            cache_hit: false
        })
    }
}

/// Template sentence for a verdict
/// # Arguments
/// * `gene` - the primary gene
/// * `phenotype` - the primary gene phenotype
/// * `risk_level` - the resolved verdict
pub fn risk_template(gene: Gene, phenotype: Phenotype, risk_level: RiskLevel) -> String {
    let phenotype = phenotype.label();
    match risk_level {
        RiskLevel::Safe => format!("No special precautions needed based on {gene} ({phenotype})"),
        RiskLevel::AdjustDosage => format!("Dose adjustment recommended based on {gene} {phenotype} status"),
        RiskLevel::Toxic => format!("Drug may cause toxicity in {gene} {phenotype} patients; consider alternatives"),
        RiskLevel::Ineffective => format!("Drug may be ineffective in {gene} {phenotype} patients; consider alternatives"),
        RiskLevel::Unknown => "Consult with pharmacist".to_string()
    }
}

/// Clinical relevance statement for a gene phenotype
pub fn clinical_relevance(gene: Gene, phenotype: Phenotype) -> String {
    let detail = match phenotype {
        Phenotype::UltraRapid => "Very high enzyme activity - may require higher drug doses or alternative therapy",
        Phenotype::Rapid => "High enzyme activity - may require higher doses than normal",
        Phenotype::Normal => "Standard enzyme activity - use typical dosing",
        Phenotype::Intermediate => "Reduced enzyme activity - may require dose reduction or monitoring",
        Phenotype::Poor => "Very low/no enzyme activity - avoid many substrates or use very low doses",
        Phenotype::NoFunction => "Complete loss of function - avoid all substrates"
    };
    format!("{gene} {}: {detail}", phenotype.short_label())
}

/// Explanation block attached to every assessment
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExplanationBlock {
    pub risk_explanation: String,
    pub variant_interpretation: String,
    pub source: String,
    pub cache_hit: bool
}

impl ExplanationBlock {
    /// Block used when there is no phenotype to explain
    pub fn unavailable(risk_level: Option<RiskLevel>) -> ExplanationBlock {
        let risk_explanation = match risk_level {
            Some(RiskLevel::Unknown) | None => "Consult with pharmacist".to_string(),
            Some(r) => format!("{} - no genotype-specific explanation available", r.label())
        };
        ExplanationBlock {
            risk_explanation,
            variant_interpretation: "No variant data available".to_string(),
            source: TEMPLATE_SOURCE.to_string(),
            cache_hit: false
        }
    }
}

/// Runs the explanation service, replacing any failure with the template text.
/// # Arguments
/// * `service` - the external service, None to use templates only
/// * `risk_request` - the risk explanation request
/// * `variant_request` - the variant explanation request
pub fn explain_with_fallback(
    service: Option<&dyn ExplanationService>,
    risk_request: &RiskExplanationRequest,
    variant_request: &VariantExplanationRequest
) -> ExplanationBlock {
    let template = TemplateExplainer;
    let service: &dyn ExplanationService = match service {
        Some(s) => s,
        None => &template
    };

    let risk = successful(service.explain_risk(risk_request), &service.source());
    let variant = successful(service.explain_variant(variant_request), &service.source());
    let used_service: bool = risk.is_some() || variant.is_some();
    let cache_hit: bool = risk.as_ref().map(|r| r.cache_hit).unwrap_or(false) ||
        variant.as_ref().map(|r| r.cache_hit).unwrap_or(false);

    let risk_explanation = match risk {
        Some(r) => r.text,
        None => risk_template(risk_request.gene, risk_request.phenotype, risk_request.risk_level)
    };
    let variant_interpretation = match variant {
        Some(r) => r.text,
        None => clinical_relevance(variant_request.gene, variant_request.phenotype)
    };

    ExplanationBlock {
        risk_explanation,
        variant_interpretation,
        source: if used_service { service.source() } else { TEMPLATE_SOURCE.to_string() },
        cache_hit
    }
}

/// Keeps only successful responses, logging the rest
fn successful(result: Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>>, source: &str) -> Option<ExplanationResponse> {
    match result {
        Ok(response) if response.status == ExplanationStatus::Success => Some(response),
        Ok(_) => {
            warn!("Explanation service {source:?} reported a failure, using template text");
            None
        },
        Err(e) => {
            warn!("Explanation service {source:?} failed, using template text: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests() -> (RiskExplanationRequest, VariantExplanationRequest) {
        (
            RiskExplanationRequest {
                drug: "Codeine".to_string(),
                gene: Gene::Cyp2d6,
                phenotype: Phenotype::UltraRapid,
                risk_level: RiskLevel::Toxic,
                clinical_guidance: "guidance".to_string()
            },
            VariantExplanationRequest {
                gene: Gene::Cyp2d6,
                diplotype: "*1/*1".to_string(),
                phenotype: Phenotype::UltraRapid,
                activity_score: Some(2.0)
            }
        )
    }

    #[test]
    fn test_templates() {
        let (risk, variant) = requests();
        let block = explain_with_fallback(None, &risk, &variant);
        assert_eq!(block.risk_explanation, "Drug may cause toxicity in CYP2D6 Ultra-Rapid Metabolizer patients; consider alternatives");
        assert_eq!(block.variant_interpretation, "CYP2D6 diplotype *1/*1 (activity score 2.00). CYP2D6 Ultra-Rapid: Very high enzyme activity - may require higher drug doses or alternative therapy");
        assert_eq!(block.source, TEMPLATE_SOURCE);
        assert!(!block.cache_hit);
    }

    struct FailingService;

    impl ExplanationService for FailingService {
        fn source(&self) -> String {
            "Failing LLM".to_string()
        }

        fn explain_risk(&self, _request: &RiskExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
            Err("connection refused".into())
        }

        fn explain_variant(&self, _request: &VariantExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
            Ok(ExplanationResponse { text: String::new(), status: ExplanationStatus::Failure, cache_hit: false })
        }
    }

    #[test]
    fn test_failure_falls_back() {
        let (risk, variant) = requests();
        let block = explain_with_fallback(Some(&FailingService), &risk, &variant);
        assert_eq!(block.risk_explanation, risk_template(Gene::Cyp2d6, Phenotype::UltraRapid, RiskLevel::Toxic));
        assert_eq!(block.variant_interpretation, clinical_relevance(Gene::Cyp2d6, Phenotype::UltraRapid));
        assert_eq!(block.source, TEMPLATE_SOURCE);
    }

    struct CachedService;

    impl ExplanationService for CachedService {
        fn source(&self) -> String {
            "Cached LLM".to_string()
        }

        fn explain_risk(&self, request: &RiskExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
            Ok(ExplanationResponse { text: format!("{} risk", request.drug), status: ExplanationStatus::Success, cache_hit: true })
        }

        fn explain_variant(&self, _request: &VariantExplanationRequest) -> Result<ExplanationResponse, Box<dyn std::error::Error + Send + Sync>> {
            Err("timeout".into())
        }
    }

    #[test]
    fn test_partial_service() {
        let (risk, variant) = requests();
        let block = explain_with_fallback(Some(&CachedService), &risk, &variant);
        assert_eq!(block.risk_explanation, "Codeine risk");
        assert_eq!(block.variant_interpretation, clinical_relevance(Gene::Cyp2d6, Phenotype::UltraRapid));
        assert_eq!(block.source, "Cached LLM");
        assert!(block.cache_hit);
    }

    #[test]
    fn test_unknown_template() {
        assert_eq!(risk_template(Gene::Tpmt, Phenotype::Normal, RiskLevel::Unknown), "Consult with pharmacist");
        assert_eq!(ExplanationBlock::unavailable(None).variant_interpretation, "No variant data available");
    }
}
