use clap::Args;
use log::info;
use std::path::PathBuf;

use crate::cli::core::AFTER_HELP;

#[derive(Clone, Args, Default)]
#[clap(author, about, 
    after_help = &**AFTER_HELP)]
pub struct TableStatSettings {
    /// Optional output file with the full reference tables (JSON)
    #[clap(short = 'o')]
    #[clap(long = "output-json")]
    #[clap(value_name = "JSON")]
    #[clap(help_heading = Some("Input/Output"))]
    pub output_json: Option<PathBuf>,

    /// Enable verbose output.
    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

pub fn check_table_stat_settings(settings: TableStatSettings) -> TableStatSettings {
    // dump stuff to the logger
    if let Some(filename) = settings.output_json.as_ref() {
        info!("Table export: {filename:?}");
    }
    settings
}
