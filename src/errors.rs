/// Errors that reject a variant file as a whole, these stop the pipeline before any drug is assessed
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("input is empty")]
    EmptyInput,
    #[error("unrecognized file format, expected a \"##fileformat=VCFv\" declaration but found: {first_line:?}")]
    UnrecognizedFormat { first_line: String }
}

/// Errors produced while resolving a single drug, these are converted into an ERROR verdict for that drug only
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ResolveError {
    #[error("drug name is empty")]
    EmptyDrugName,
    #[error("risk rule for {drug} defines a table for {gene}, which does not govern the drug")]
    UngovernedGeneTable { drug: String, gene: String },
    #[error("risk rule for {drug} does not list any governing genes")]
    NoGoverningGenes { drug: String }
}
