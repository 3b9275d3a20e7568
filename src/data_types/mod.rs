
/// Contains the report types written for each assessment
pub mod assessment;
/// Contains the representation of a diplotype
pub mod diplotype;
/// Contains the supported drugs and drug name normalization
pub mod drug;
/// Contains the closed set of modeled genes
pub mod gene;
/// Contains the metabolizer phenotypes
pub mod phenotype;
/// Contains the risk verdicts and severity tiers
pub mod risk_level;
/// Contains the parsed VCF records and genotype calls
pub mod variant_record;
