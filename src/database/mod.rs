
/// Contains the per-gene allele activity tables and phenotype thresholds
pub mod allele_activity;
/// Constants that are hard-coded into the reference tables
pub mod db_const;
/// Contains the curated clinical guidance records
pub mod guidance;
/// Contains the legacy diplotype to phenotype table
pub mod legacy_diplotypes;
/// Contains the bundle of reference tables used by the pipeline
pub mod pgx_tables;
/// Contains the per-drug risk rules
pub mod risk_rules;
