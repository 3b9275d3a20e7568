
use log::{LevelFilter, error, info, warn};
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use pgxguard::cli::assess::{AssessSettings, check_assess_settings};
use pgxguard::cli::core::{Commands, get_cli};
use pgxguard::cli::table_stat::{TableStatSettings, check_table_stat_settings};
use pgxguard::data_types::assessment::{DataCompleteness, PgxRiskReport};
use pgxguard::data_types::drug::parse_drug_list;
use pgxguard::data_types::gene::Gene;
use pgxguard::data_types::risk_level::Severity;
use pgxguard::database::pgx_tables::PgxTables;
use pgxguard::errors::ParseError;
use pgxguard::pipeline::GeneFilter;
use pgxguard::util::file_io::{load_file_list, save_json};

/// Sets up logging for the given verbosity
fn init_logging(verbosity: u8) {
    let filter_level: LevelFilter = match verbosity {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace
    };

    env_logger::builder()
        .format_timestamp_millis()
        .filter_level(filter_level)
        .init();
}

/// This will run the "assess" mode of the tool
/// # Arguments
/// * `settings` - the AssessSettings object
fn run_assess(settings: AssessSettings) {
    // immediately setup logging first
    init_logging(settings.verbosity);

    // okay, now we can check all the other settings
    let cli_settings: AssessSettings = match check_assess_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            error!("Error while processing CLI settings: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    // collect the requested drugs, command line first
    let mut drug_inputs: Vec<String> = cli_settings.drugs.clone();
    if let Some(drug_file) = cli_settings.drug_file.as_ref() {
        match load_file_list(drug_file) {
            Ok(lines) => drug_inputs.extend(lines),
            Err(e) => {
                error!("Error while loading drug file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
    let drugs: Vec<String> = parse_drug_list(&drug_inputs);
    if drugs.is_empty() {
        error!("No drugs were provided after parsing the drug inputs");
        std::process::exit(exitcode::USAGE);
    }
    info!("Assessing {} drugs: {drugs:?}", drugs.len());

    let gene_filter: GeneFilter = match GeneFilter::from_files(
        cli_settings.include_fn.as_deref(),
        cli_settings.exclude_fn.as_deref()
    ) {
        Ok(gf) => gf,
        Err(e) => {
            error!("Error while loading gene sets: {e}");
            std::process::exit(exitcode::USAGE);
        }
    };

    // build the tables, dropping any activity models that were disabled
    let mut tables = PgxTables::default();
    for gene_name in cli_settings.disable_activity_model.iter() {
        match Gene::from_str(gene_name) {
            Ok(gene) => {
                warn!("Activity model disabled for {gene}, only the legacy table will be used");
                tables = tables.without_activity_model(gene);
            },
            Err(_) => {
                error!("Unrecognized gene for --disable-activity-model: {gene_name:?}");
                std::process::exit(exitcode::USAGE);
            }
        };
    }
    if let Err(e) = tables.validate() {
        error!("Error while validating reference tables: {e}");
        std::process::exit(exitcode::SOFTWARE);
    }

    // all the work
    let report: PgxRiskReport = match pgxguard::pipeline::assess_vcf_file(
        &tables,
        &cli_settings.vcf_filename,
        &drugs,
        &gene_filter,
        None
    ) {
        Ok(r) => r,
        Err(e) => {
            if e.downcast_ref::<ParseError>().is_some() {
                error!("Error while parsing VCF file: {e}");
                std::process::exit(exitcode::DATAERR);
            }
            error!("Error while reading VCF file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    info!("Saving risk report to {:?}", cli_settings.output_json);
    match save_json(&report, &cli_settings.output_json) {
        Ok(()) => {},
        Err(e) => {
            error!("Error while writing risk report to file: {e}");
            std::process::exit(exitcode::IOERR);
        }
    };

    if let Some(filename) = cli_settings.output_tsv.as_ref() {
        info!("Saving summary TSV to {:?}", filename);
        match save_summary_tsv(&report, filename) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while writing summary TSV to file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
}

/// Wrapper for the summary output
#[derive(Serialize)]
struct SummaryRow {
    #[serde(rename = "#drug")]
    drug: String,
    risk_label: String,
    severity: Severity,
    confidence_score: f64,
    primary_gene: String,
    diplotype: String,
    phenotype: String,
    data_completeness: DataCompleteness
}

/// Helper function to save a one-row-per-drug TSV summary
/// # Arguments
/// * `report` - the full risk report
/// * `filename` - the output filename, TSV
/// # Errors
/// * if we have any errors opening or writing to the file
fn save_summary_tsv(report: &PgxRiskReport, filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let delimiter: u8 = b'\t';
    let mut csv_writer: csv::Writer<File> = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(filename)?;

    // request order
    for assessment in report.assessments().iter() {
        let risk = assessment.risk_assessment();
        let profile = assessment.pharmacogenomic_profile();
        let row = SummaryRow {
            drug: assessment.drug().to_string(),
            risk_label: risk.risk_label.to_string(),
            severity: risk.severity,
            confidence_score: risk.confidence_score,
            primary_gene: profile.primary_gene.clone(),
            diplotype: profile.diplotype.clone(),
            phenotype: profile.phenotype.clone(),
            data_completeness: assessment.data_completeness()
        };
        csv_writer.serialize(&row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// This will run the "table-stat" mode of the tool
/// # Arguments
/// * `settings` - the TableStatSettings object
fn run_table_stat(settings: TableStatSettings) {
    init_logging(settings.verbosity);
    let cli_settings: TableStatSettings = check_table_stat_settings(settings);

    let tables = PgxTables::default();
    if let Err(e) = tables.validate() {
        error!("Error while validating reference tables: {e}");
        std::process::exit(exitcode::SOFTWARE);
    }
    info!("Reference tables validated successfully.");

    pgxguard::table_stat::print_stats(&tables);

    if let Some(filename) = cli_settings.output_json.as_ref() {
        info!("Saving reference tables to {filename:?}");
        match save_json(&tables.export(), filename) {
            Ok(()) => {},
            Err(e) => {
                error!("Error while writing reference tables to file: {e}");
                std::process::exit(exitcode::IOERR);
            }
        };
    }
}

fn main() {
    let cli = get_cli();
    match cli.command {
        Commands::Assess(settings) => {
            run_assess(*settings);
        },
        Commands::TableStat(settings) => {
            run_table_stat(*settings);
        }
    }

    info!("Process finished successfully.");
}
