
/// Contains all the CLI related functionality
pub mod cli;
/// Contains the built-in reference tables: alleles, activities, drug rules, and guidance
pub mod database;
/// Contains any specialized data types that are shared across the tooling
pub mod data_types;
/// Typed errors for parsing and drug resolution
pub mod errors;
/// Contains the explanation service interface and template fallback
pub mod explanation;
/// Contains the diplotype to phenotype classification
pub mod phenotyper;
/// Contains the end-to-end VCF to risk report pipeline
pub mod pipeline;
/// Contains the per-drug risk resolution
pub mod risk_resolver;
/// Contains functionality for displaying reference table statistics
pub mod table_stat;
/// Contains generic utilities that are handy wrappers
pub mod util;
/// Contains the VCF reader and gene assignment
pub mod vcf_parser;
