use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::drug::Drug;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::risk_level::RiskLevel;

/// A curated dosing record for a (drug, phenotype) pair
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GuidanceRecord {
    pub dosing_recommendation: &'static str,
    pub strength: &'static str,
    pub clinical_guidance: &'static str,
    pub monitoring: &'static str,
    pub evidence_level: &'static str,
    pub reference: &'static str
}

/// Guidance attached to an assessment, either copied from a record or the generic fallback
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClinicalGuidance {
    pub dosing_recommendation: String,
    pub strength: String,
    pub clinical_guidance: String,
    pub monitoring: String,
    pub evidence_level: String,
    pub reference: String,
    /// true if this came from a curated record
    pub curated: bool
}

impl ClinicalGuidance {
    /// The generic "consult pharmacist" block used when no record exists
    /// # Arguments
    /// * `drug_name` - the display name of the drug
    /// * `risk_level` - the resolved verdict, which controls the recommendation strength
    pub fn generic(drug_name: &str, risk_level: RiskLevel) -> ClinicalGuidance {
        ClinicalGuidance {
            dosing_recommendation: "Consult pharmacist for dosing guidance".to_string(),
            strength: risk_level.fallback_strength().to_string(),
            clinical_guidance: format!("Standard CPIC guidance for {drug_name}"),
            monitoring: "Monitor for adverse effects; adjust if needed".to_string(),
            evidence_level: "No data".to_string(),
            reference: "Manual review required".to_string(),
            curated: false
        }
    }
}

impl From<&GuidanceRecord> for ClinicalGuidance {
    fn from(record: &GuidanceRecord) -> Self {
        ClinicalGuidance {
            dosing_recommendation: record.dosing_recommendation.to_string(),
            strength: record.strength.to_string(),
            clinical_guidance: record.clinical_guidance.to_string(),
            monitoring: record.monitoring.to_string(),
            evidence_level: record.evidence_level.to_string(),
            reference: record.reference.to_string(),
            curated: true
        }
    }
}

const CODEINE_REF: &str = "PharmGKB CPIC Codeine/CYP2D6";
const WARFARIN_REF: &str = "CPIC Warfarin/CYP2C9/VKORC1 Guidelines";
const CLOPIDOGREL_REF: &str = "CPIC Clopidogrel/CYP2C19 Guidelines";
const SIMVASTATIN_REF: &str = "CPIC Simvastatin/SLCO1B1 Guidelines";
const AZATHIOPRINE_REF: &str = "CPIC Azathioprine/TPMT Guidelines";
const FLUOROURACIL_REF: &str = "CPIC Fluorouracil/DPYD Guidelines";
const METOPROLOL_REF: &str = "PharmGKB CYP2D6 Metabolizers";
const AMITRIPTYLINE_REF: &str = "PharmGKB Tricyclic Antidepressants Metabolism";

lazy_static! {
    /// Every curated guidance record
    pub static ref GUIDANCE_RECORDS: BTreeMap<(Drug, Phenotype), GuidanceRecord> = {
        // (drug, phenotype, dosing, strength, clinical guidance, monitoring, evidence level, reference)
        let records: Vec<(Drug, Phenotype, &str, &str, &str, &str, &str, &str)> = vec![
            // Codeine / CYP2D6
            (Drug::Codeine, Phenotype::UltraRapid,
                "NOT RECOMMENDED - Risk of toxicity at normal doses. Use alternative analgesic.", "Strong",
                "Ultra-rapid metabolizers produce high amounts of morphine from codeine, increasing risk of overdose and side effects.",
                "If must use: Monitor closely for respiratory depression, oversedation, and toxicity signs.", "1A", CODEINE_REF),
            (Drug::Codeine, Phenotype::Rapid,
                "Normal dose with consideration for increased effect. Monitor response closely.", "Moderate",
                "Rapid metabolizers may achieve therapeutic levels faster. Standard dosing may produce higher drug effects.",
                "Monitor for increased side effects; dose reduction may be considered.", "2A", CODEINE_REF),
            (Drug::Codeine, Phenotype::Normal,
                "Use normal recommended dose (15-60 mg every 4-6 hours as needed).", "Strong",
                "Normal metabolizers: Standard dosing expected to produce therapeutic effect.",
                "Standard opioid monitoring for pain control and side effects.", "1A", CODEINE_REF),
            (Drug::Codeine, Phenotype::Intermediate,
                "Consider higher than normal dose or shorter dosing intervals. Standard dose may be inadequate.", "Moderate",
                "Reduced metabolism leads to lower morphine conversion (10-20% reduction).",
                "Monitor pain control; increase dose if inadequate response.", "2A", CODEINE_REF),
            (Drug::Codeine, Phenotype::Poor,
                "NOT RECOMMENDED - Ineffective at standard doses. Use alternative analgesic.", "Strong",
                "Poor metabolizers have little-to-no morphine formation, making codeine ineffective for pain relief.",
                "If used despite recommendation: Monitor for lack of pain relief.", "1A", CODEINE_REF),
            (Drug::Codeine, Phenotype::NoFunction,
                "NOT RECOMMENDED - Completely ineffective. Use alternative analgesic.", "Strong",
                "Complete loss of CYP2D6 function prevents morphine formation.",
                "Not applicable - use alternative pain management.", "1A", CODEINE_REF),
            // Warfarin / CYP2C9 + VKORC1
            (Drug::Warfarin, Phenotype::Normal,
                "Standard initiation: 5-10 mg daily. Adjust based on INR response.", "Strong",
                "Normal metabolizers: Use standard dosing protocol with frequent INR monitoring.",
                "INR monitoring at baseline, 2-7 days after initiation, then weekly x 1-2 weeks, then at 1-4 week intervals.", "1A", WARFARIN_REF),
            (Drug::Warfarin, Phenotype::Intermediate,
                "Consider 25-50% dose reduction. Initiate lower dose (2.5-5 mg daily).", "Moderate",
                "Intermediate metabolizers require dose adjustment; increased sensitivity to warfarin.",
                "More frequent INR monitoring (2-3x weekly initially).", "2A", WARFARIN_REF),
            (Drug::Warfarin, Phenotype::Poor,
                "Avoid or use with extreme caution - 40-60% dose reduction. Start 0.5-2 mg daily.", "Strong",
                "Poor metabolizers have high bleeding risk at standard doses.",
                "Very frequent INR monitoring (daily-every other day) until stable.", "1A", WARFARIN_REF),
            // Clopidogrel / CYP2C19
            (Drug::Clopidogrel, Phenotype::Normal,
                "Standard loading: 300-600 mg; Maintenance: 75 mg daily.", "Strong",
                "Normal metabolizers: Standard dosing provides therapeutic antiplatelet effect.",
                "Monitor for bleeding; assessment of antiplatelet response if high-risk patient.", "1A", CLOPIDOGREL_REF),
            (Drug::Clopidogrel, Phenotype::Intermediate,
                "Consider alternative P2Y12 inhibitor (prasugrel, ticagrelor) or increase maintenance dose to 150 mg daily.", "Moderate",
                "Intermediate metabolizers have reduced antiplatelet effect; may not achieve therapeutic levels.",
                "Assess response; consider platelet function testing.", "2B", CLOPIDOGREL_REF),
            (Drug::Clopidogrel, Phenotype::Poor,
                "NOT RECOMMENDED - Use alternative P2Y12 inhibitor (prasugrel 5-10 mg, ticagrelor 60-90 mg).", "Strong",
                "Poor metabolizers have minimal antiplatelet effect; increased stent thrombosis risk.",
                "If unable to use alternatives: High-intensity antiplatelet monitoring required.", "1A", CLOPIDOGREL_REF),
            // Simvastatin / SLCO1B1
            (Drug::Simvastatin, Phenotype::Normal,
                "Standard dosing: 10-40 mg daily. Maximum: 80 mg daily.", "Strong",
                "Normal transporters allow standard statin dosing.",
                "Monitor lipid levels at 4-12 weeks, then annually. Assess for muscle symptoms.", "1A", SIMVASTATIN_REF),
            (Drug::Simvastatin, Phenotype::Intermediate,
                "Consider dose reduction or alternative statin. Max 20 mg daily.", "Moderate",
                "Reduced transporter function increases statin levels; myopathy risk increased.",
                "Monitor CK levels baseline; assess for muscle pain/weakness.", "2A", SIMVASTATIN_REF),
            (Drug::Simvastatin, Phenotype::Poor,
                "Avoid simvastatin or use with extreme caution at lowest dose. Consider pravastatin/rosuvastatin.", "Strong",
                "Impaired transporter = significantly elevated statin levels = high myopathy risk.",
                "If used: Baseline CK, monthly monitoring x 3 months, then quarterly.", "1A", SIMVASTATIN_REF),
            // Azathioprine / TPMT
            (Drug::Azathioprine, Phenotype::Normal,
                "Standard dose dosing: 1-2.5 mg/kg/day in divided doses.", "Strong",
                "Normal TPMT activity allows standard immunosuppressive dosing.",
                "CBC with differential weekly x 8-12 weeks, then monthly. Monitor for myelosuppression.", "1A", AZATHIOPRINE_REF),
            (Drug::Azathioprine, Phenotype::Intermediate,
                "Reduce dose to 25-50% of normal. Start low and titrate based on response.", "Strong",
                "Intermediate activity: Increased accumulation of toxic 6-TGN metabolites.",
                "CBC weekly x 4-6 weeks; monitor for infections, bleeding, severe anemia.", "1A", AZATHIOPRINE_REF),
            (Drug::Azathioprine, Phenotype::Poor,
                "Strongly consider AVOIDING or use at 10% of normal dose if no alternatives.", "Strong",
                "Very high risk of severe bone marrow toxicity and life-threatening infections.",
                "If absolutely necessary: Daily CBC monitoring, consider G-CSF support.", "1A", AZATHIOPRINE_REF),
            // Fluorouracil / DPYD
            (Drug::Fluorouracil, Phenotype::Normal,
                "Standard chemotherapy dosing per protocol (typically 400-500 mg/m² IV).", "Strong",
                "Normal DPYD activity allows standard 5-FU dosing.",
                "Standard oncology monitoring: CBC weekly, blood cultures if febrile.", "1A", FLUOROURACIL_REF),
            (Drug::Fluorouracil, Phenotype::Intermediate,
                "Reduce dose by 25-50%. Start at 50-75% of standard dose.", "Moderate",
                "Partial DPYD deficiency increases 5-FU toxicity risk.",
                "Close monitoring for severe toxicity: mucositis, myelosuppression, diarrhea.", "2A", FLUOROURACIL_REF),
            (Drug::Fluorouracil, Phenotype::Poor,
                "NOT RECOMMENDED - Consider alternative chemotherapy if possible.", "Strong",
                "High risk of severe, potentially fatal toxicity (mucositis, cardiotoxicity, sepsis).",
                "If unavoidable: Intensive monitoring; consider dose reduction to 25-50% with close daily monitoring.", "1A", FLUOROURACIL_REF),
            // Metoprolol / CYP2D6
            (Drug::Metoprolol, Phenotype::Normal,
                "Standard dosing: 25-190 mg daily in divided doses.", "Strong",
                "Normal metabolizers: Standard beta-blocker dosing effective.",
                "Monitor heart rate, blood pressure, exercise tolerance.", "2B", METOPROLOL_REF),
            (Drug::Metoprolol, Phenotype::Poor,
                "Reduce dose by 25-50%. Consider alternative beta-blocker (atenolol, bisoprolol).", "Moderate",
                "Poor metabolizers may accumulate metoprolol; increased side effects.",
                "Monitor for bradycardia, hypotension, fatigue.", "2B", METOPROLOL_REF),
            // Amitriptyline / CYP2D6 + CYP2C19
            (Drug::Amitriptyline, Phenotype::Normal,
                "Standard initiation: 25-50 mg at bedtime. Typical maintenance: 75-150 mg daily.", "Strong",
                "Normal metabolizers via both CYP2D6 and CYP2C19; standard dosing appropriate.",
                "Monitor for anticholinergic effects, cardiac conduction, therapeutic response.", "2B", AMITRIPTYLINE_REF),
            (Drug::Amitriptyline, Phenotype::Poor,
                "Start low (10-25 mg) at bedtime. Titrate slowly.", "Moderate",
                "Poor metabolism in CYP2D6/CYP2C19 increases drug accumulation and side effects.",
                "Close monitoring for anticholinergic effects, sedation, orthostatic hypotension, arrhythmias.", "2B", AMITRIPTYLINE_REF)
        ];

        records.into_iter()
            .map(|(drug, phenotype, dosing_recommendation, strength, clinical_guidance, monitoring, evidence_level, reference)| {
                ((drug, phenotype), GuidanceRecord {
                    dosing_recommendation, strength, clinical_guidance, monitoring, evidence_level, reference
                })
            })
            .collect()
    };
}

/// Looks up curated guidance for a drug and phenotype
/// # Arguments
/// * `drug` - the canonical drug
/// * `phenotype` - the phenotype of the drug's primary gene
pub fn lookup_guidance(drug: Drug, phenotype: Phenotype) -> Option<&'static GuidanceRecord> {
    GUIDANCE_RECORDS.get(&(drug, phenotype))
}

/// Resolves the guidance block for an assessment, falling back to the generic block on any miss
/// # Arguments
/// * `drug` - the canonical drug, None if the name was not recognized
/// * `drug_name` - the display name of the drug
/// * `phenotype` - the phenotype of the primary gene, if it was classified
/// * `risk_level` - the resolved verdict
pub fn resolve_guidance(drug: Option<Drug>, drug_name: &str, phenotype: Option<Phenotype>, risk_level: RiskLevel) -> ClinicalGuidance {
    match (drug, phenotype) {
        (Some(d), Some(p)) => match lookup_guidance(d, p) {
            Some(record) => record.into(),
            None => ClinicalGuidance::generic(drug_name, risk_level)
        },
        _ => ClinicalGuidance::generic(drug_name, risk_level)
    }
}
