use clap::Args;
use log::{debug, info};
use simple_error::bail;
use std::path::PathBuf;

use crate::cli::core::{AFTER_HELP, check_optional_filename, check_required_filename};

#[derive(Args, Clone, Default)]
#[clap(author, about, 
    after_help = &**AFTER_HELP)]
pub struct AssessSettings {
    /// Input variant file in VCF format, optionally gzipped
    #[clap(required = true)]
    #[clap(short = 'c')]
    #[clap(long = "vcf")]
    #[clap(value_name = "VCF")]
    #[clap(help_heading = Some("Input/Output"))]
    pub vcf_filename: PathBuf,

    /// Drug to assess, can be specified multiple times or as a comma-separated list
    #[clap(short = 'd')]
    #[clap(long = "drug")]
    #[clap(value_name = "DRUG")]
    #[clap(help_heading = Some("Input/Output"))]
    pub drugs: Vec<String>,

    /// Optional file with drugs to assess, one per line
    #[clap(long = "drug-file")]
    #[clap(value_name = "TXT")]
    #[clap(help_heading = Some("Input/Output"))]
    pub drug_file: Option<PathBuf>,

    /// Output risk report file (JSON)
    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output-json")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_json: PathBuf,

    /// Optional summary file with one row per drug
    #[clap(long = "output-tsv")]
    #[clap(value_name = "TSV")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_tsv: Option<PathBuf>,

    /// Optional file indicating the list of genes to include in classification, one per line
    #[clap(long = "include-set")]
    #[clap(value_name = "TXT")]
    #[clap(help_heading = Some("Gene selection"))]
    pub include_fn: Option<PathBuf>,

    /// Optional file indicating the list of genes to exclude from classification, one per line
    #[clap(long = "exclude-set")]
    #[clap(value_name = "TXT")]
    #[clap(help_heading = Some("Gene selection"))]
    pub exclude_fn: Option<PathBuf>,

    /// Classifies the given gene with the legacy diplotype table only
    #[clap(hide = true)]
    #[clap(long = "disable-activity-model")]
    #[clap(value_name = "GENE")]
    #[clap(help_heading = Some("Gene selection"))]
    pub disable_activity_model: Vec<String>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_assess_settings(settings: AssessSettings) -> Result<AssessSettings, Box<dyn std::error::Error>> {
    info!("Inputs:");

    check_required_filename(&settings.vcf_filename, "VCF file");
    check_optional_filename(settings.drug_file.as_deref(), "Drug file");
    info!("\tVCF: {:?}", settings.vcf_filename);
    if !settings.drugs.is_empty() {
        info!("\tDrugs: {:?}", settings.drugs);
    }
    if let Some(dfn) = settings.drug_file.as_ref() {
        info!("\tDrug file: {dfn:?}");
    }

    if settings.drugs.is_empty() && settings.drug_file.is_none() {
        bail!("Must provide at least one drug with --drug and/or --drug-file.");
    }

    if settings.include_fn.is_some() && settings.exclude_fn.is_some() {
        bail!("Only one of --exclude-set and --include-set can be specified.");
    }
    if let Some(ifn) = settings.include_fn.as_ref() {
        check_required_filename(ifn, "Include set");
        info!("\tInclude set file: {ifn:?}");
    }
    if let Some(efn) = settings.exclude_fn.as_ref() {
        check_required_filename(efn, "Exclude set");
        info!("\tExclude set file: {efn:?}");
    }
    if !settings.disable_activity_model.is_empty() {
        debug!("\tActivity model disabled for: {:?}", settings.disable_activity_model);
    }

    // outputs
    info!("Outputs:");
    info!("\tRisk report: {:?}", settings.output_json);
    if let Some(filename) = settings.output_tsv.as_ref() {
        info!("\tSummary TSV: {:?}", filename);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_settings() -> AssessSettings {
        AssessSettings {
            vcf_filename: PathBuf::from("test_data/sample_basic.vcf"),
            output_json: PathBuf::from("report.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_requires_drugs() {
        assert!(check_assess_settings(base_settings()).is_err());

        let settings = AssessSettings {
            drugs: vec!["codeine".to_string()],
            ..base_settings()
        };
        assert!(check_assess_settings(settings).is_ok());

        let settings = AssessSettings {
            drug_file: Some(PathBuf::from("test_data/drug_list.txt")),
            ..base_settings()
        };
        assert!(check_assess_settings(settings).is_ok());
    }

    #[test]
    fn test_exclusive_gene_sets() {
        let settings = AssessSettings {
            drugs: vec!["codeine".to_string()],
            include_fn: Some(PathBuf::from("test_data/include_genes.txt")),
            exclude_fn: Some(PathBuf::from("test_data/include_genes.txt")),
            ..base_settings()
        };
        assert!(check_assess_settings(settings).is_err());
    }
}
