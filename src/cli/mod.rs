
/// the main CLI module
pub mod core;
/// the assess CLI subcommand for producing drug risk reports from a VCF
pub mod assess;
/// the table-stat CLI subcommand for summarizing the built-in reference tables
pub mod table_stat;
