use lazy_static::lazy_static;
use log::{debug, info, trace};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;

use crate::data_types::gene::Gene;
use crate::data_types::variant_record::{GenotypeCall, VariantRecord};
use crate::database::db_const::{gene_for_chromosome, known_variant};
use crate::errors::ParseError;
use crate::util::file_io::read_text_file;

lazy_static! {
    /// The required first line of a variant file
    static ref FILE_FORMAT_REGEX: Regex = Regex::new(r"^##fileformat=VCFv(\S*)").unwrap();
}

/// Minimum number of tab-separated columns for a single-sample data line
const MIN_DATA_COLUMNS: usize = 10;

/// Everything extracted from a single variant file
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedVcf {
    /// Version string after "VCFv"
    file_format_version: String,
    /// Meta lines, key -> values in file order
    header: BTreeMap<String, Vec<String>>,
    /// Column names from the "#CHROM" line
    column_names: Vec<String>,
    /// Assigned records grouped by gene, file order within a gene
    records_by_gene: BTreeMap<Gene, Vec<VariantRecord>>,
    /// Number of data lines seen
    total_data_lines: usize,
    /// Data lines that were malformed
    skipped_lines: usize,
    /// Well-formed records that did not match any gene
    unassigned_records: usize
}

impl ParsedVcf {
    pub fn file_format_version(&self) -> &str {
        &self.file_format_version
    }

    pub fn header(&self) -> &BTreeMap<String, Vec<String>> {
        &self.header
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn records_by_gene(&self) -> &BTreeMap<Gene, Vec<VariantRecord>> {
        &self.records_by_gene
    }

    /// Total number of records assigned to a gene
    pub fn variant_count(&self) -> usize {
        self.records_by_gene.values().map(|v| v.len()).sum()
    }

    pub fn total_data_lines(&self) -> usize {
        self.total_data_lines
    }

    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    pub fn unassigned_records(&self) -> usize {
        self.unassigned_records
    }
}

/// Reads and parses a variant file, transparently decompressing ".gz" inputs.
/// # Arguments
/// * `filename` - the file to load
/// # Errors
/// * if the file cannot be opened or read
/// * if the file is not a recognized variant file, see `ParseError`
pub fn parse_vcf_file(filename: &Path) -> Result<ParsedVcf, Box<dyn std::error::Error>> {
    let text = read_text_file(filename)?;
    let parsed = parse_vcf_text(&text)?;
    Ok(parsed)
}

/// Parses variant file content into gene-assigned records.
/// Malformed data lines are skipped and counted rather than failing the whole file.
/// # Arguments
/// * `text` - the full content of the file
/// # Errors
/// * if the input has no content
/// * if the first non-blank line is not a "##fileformat=VCFv" declaration
pub fn parse_vcf_text(text: &str) -> Result<ParsedVcf, ParseError> {
    let mut lines = text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty());

    let first_line: &str = lines.next().ok_or(ParseError::EmptyInput)?;
    let file_format_version: String = match FILE_FORMAT_REGEX.captures(first_line) {
        Some(captures) => captures.get(1).map(|m| m.as_str().to_string()).unwrap_or_default(),
        None => {
            return Err(ParseError::UnrecognizedFormat {
                first_line: first_line.chars().take(80).collect()
            });
        }
    };
    info!("Detected VCF version: {file_format_version:?}");

    let mut parsed = ParsedVcf {
        file_format_version,
        ..Default::default()
    };

    for line in lines {
        if let Some(meta) = line.strip_prefix("##") {
            let (key, value) = meta.split_once('=').unwrap_or((meta, ""));
            parsed.header.entry(key.to_string()).or_default().push(value.to_string());
        } else if let Some(columns) = line.strip_prefix('#') {
            parsed.column_names = columns.split('\t').map(|c| c.to_string()).collect();
        } else {
            parsed.total_data_lines += 1;
            match parse_data_line(line) {
                Some(LineOutcome::Assigned(record)) => {
                    parsed.records_by_gene.entry(record.gene()).or_default().push(record);
                },
                Some(LineOutcome::Unassigned) => {
                    parsed.unassigned_records += 1;
                },
                None => {
                    trace!("Skipping malformed line: {line:?}");
                    parsed.skipped_lines += 1;
                }
            };
        }
    }

    if parsed.skipped_lines > 0 {
        debug!("Skipped {} malformed data lines", parsed.skipped_lines);
    }
    debug!("Parsed {} data lines: {} assigned, {} unassigned",
        parsed.total_data_lines, parsed.variant_count(), parsed.unassigned_records);
    Ok(parsed)
}

/// Result of parsing a well-formed data line
enum LineOutcome {
    Assigned(VariantRecord),
    Unassigned
}

/// Parses a single data line, None if it is malformed
fn parse_data_line(line: &str) -> Option<LineOutcome> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_DATA_COLUMNS {
        return None;
    }

    let chrom: &str = fields[0];
    let position: u64 = fields[1].parse().ok()?;
    let variant_id: Option<&str> = match fields[2] {
        "." | "" => None,
        id => Some(id)
    };
    let quality: f64 = match fields[5] {
        "." => 0.0,
        q => q.parse().ok()?
    };
    let info = parse_info(fields[7]);
    let genotype = extract_genotype(fields[8], fields[9]);

    // identifier first, then chromosome
    let gene: Gene = match variant_id.and_then(known_variant) {
        Some(kv) => kv.gene,
        None => match gene_for_chromosome(chrom) {
            Some(gene) => gene,
            None => return Some(LineOutcome::Unassigned)
        }
    };

    Some(LineOutcome::Assigned(VariantRecord::new(
        chrom.to_string(), position, fields[3].to_string(), fields[4].to_string(),
        variant_id.map(|s| s.to_string()), genotype, gene, quality, info
    )))
}

/// Parses the INFO column; flags are stored with the value "true"
fn parse_info(info: &str) -> BTreeMap<String, String> {
    if info == "." {
        return Default::default();
    }
    info.split(';')
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (entry.to_string(), "true".to_string())
        })
        .collect()
}

/// Pulls the GT value from the sample column.
/// Only used when both columns are colon-delimited and GT is the first FORMAT key, otherwise the call is reference.
fn extract_genotype(format: &str, sample: &str) -> GenotypeCall {
    if format.contains(':') && sample.contains(':') && format.split(':').next() == Some("GT") {
        match sample.split(':').next() {
            Some(gt) => GenotypeCall::new(gt),
            None => GenotypeCall::reference()
        }
    } else {
        GenotypeCall::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = "##fileformat=VCFv4.2\n##source=test\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE\n";

    #[test]
    fn test_rejects_bad_header() {
        let err = parse_vcf_text("#CHROM\tPOS\n").unwrap_err();
        assert!(matches!(err, ParseError::UnrecognizedFormat { .. }));
        assert_eq!(parse_vcf_text("\n\n  \n").unwrap_err(), ParseError::EmptyInput);
    }

    #[test]
    fn test_leading_blank_lines() {
        let parsed = parse_vcf_text(&format!("\n\n{HEADER}")).unwrap();
        assert_eq!(parsed.file_format_version(), "4.2");
        assert_eq!(parsed.header()["source"], vec!["test".to_string()]);
        assert_eq!(parsed.column_names().len(), 10);
        assert_eq!(parsed.column_names()[0], "CHROM");
    }

    #[test]
    fn test_gene_assignment() {
        let text = format!("{HEADER}\
            10\t96541616\trs4244285\tG\tA\t50\tPASS\tDP=30\tGT:DP\t0/1:30\n\
            chr22\t42126000\t.\tC\tT\t.\tPASS\t.\tGT:DP\t1/1:20\n\
            10\t94942758\trs1057910\tA\tC\t40\tPASS\tDB\tGT:DP\t1/1:12\n\
            3\t100\trs999\tA\tG\t40\tPASS\t.\tGT:DP\t0/1:12\n");
        let parsed = parse_vcf_text(&text).unwrap();
        assert_eq!(parsed.total_data_lines(), 4);
        assert_eq!(parsed.variant_count(), 3);
        assert_eq!(parsed.unassigned_records(), 1);
        assert_eq!(parsed.skipped_lines(), 0);

        let cyp2c19 = &parsed.records_by_gene()[&Gene::Cyp2c19][0];
        assert_eq!(cyp2c19.genotype().raw(), "0/1");
        assert_eq!(cyp2c19.quality(), 50.0);
        assert_eq!(cyp2c19.info()["DP"], "30");

        let cyp2d6 = &parsed.records_by_gene()[&Gene::Cyp2d6][0];
        assert_eq!(cyp2d6.variant_id(), None);
        assert_eq!(cyp2d6.quality(), 0.0);
        assert!(cyp2d6.info().is_empty());

        // chromosome 10 alone would go to CYP2C19
        let cyp2c9 = &parsed.records_by_gene()[&Gene::Cyp2c9][0];
        assert_eq!(cyp2c9.variant_id(), Some("rs1057910"));
        assert_eq!(cyp2c9.info()["DB"], "true");
    }

    #[test]
    fn test_malformed_lines() {
        let text = format!("{HEADER}\
            10\t96541616\trs4244285\tG\tA\t50\tPASS\n\
            10\tabc\trs4244285\tG\tA\t50\tPASS\t.\tGT:DP\t0/1:30\n\
            10\t96541857\trs4986893\tG\tA\t50\tPASS\t.\tGT:DP\t0/1:30\n");
        let parsed = parse_vcf_text(&text).unwrap();
        assert_eq!(parsed.skipped_lines(), 2);
        assert_eq!(parsed.variant_count(), 1);
    }

    #[test]
    fn test_extract_genotype() {
        assert_eq!(extract_genotype("GT:DP", "1|0:30").raw(), "1|0");
        assert_eq!(extract_genotype("DP:GT", "30:0/1").raw(), "0/0");
        // a lone GT column does not satisfy the colon rule
        assert_eq!(extract_genotype("GT", "0/1").raw(), "0/0");
    }

    #[test]
    fn test_parse_file() {
        let filename = PathBuf::from("test_data/sample_basic.vcf");
        let parsed = parse_vcf_file(&filename).unwrap();
        assert_eq!(parsed.file_format_version(), "4.2");
        assert!(parsed.records_by_gene().contains_key(&Gene::Cyp2d6));
        assert!(parsed.records_by_gene().contains_key(&Gene::Cyp2c19));
    }

    #[test]
    fn test_parse_malformed_file() {
        let parsed = parse_vcf_file(&PathBuf::from("test_data/sample_malformed.vcf")).unwrap();
        assert_eq!(parsed.file_format_version(), "4.1");
        assert_eq!(parsed.total_data_lines(), 4);
        // short line and non-numeric POS
        assert_eq!(parsed.skipped_lines(), 2);
        // chromosome X matches no gene
        assert_eq!(parsed.unassigned_records(), 1);
        assert_eq!(parsed.variant_count(), 1);

        let tpmt = &parsed.records_by_gene()[&Gene::Tpmt];
        assert_eq!(tpmt.len(), 1);
        assert_eq!(tpmt[0].variant_id(), Some("rs1800460"));
        assert_eq!(tpmt[0].position(), 18131875);
        assert_eq!(tpmt[0].genotype().raw(), "1/1");
        assert_eq!(tpmt[0].quality(), 70.0);
    }

    #[test]
    fn test_parse_gz_file() {
        let plain = parse_vcf_file(&PathBuf::from("test_data/sample_basic.vcf")).unwrap();
        let gz = parse_vcf_file(&PathBuf::from("test_data/sample_basic.vcf.gz")).unwrap();
        assert_eq!(plain, gz);
    }

    #[test]
    fn test_parse_file_rejected() {
        let err = parse_vcf_file(&PathBuf::from("test_data/not_a_vcf.txt")).unwrap_err();
        assert!(err.downcast_ref::<ParseError>().is_some());
    }
}
