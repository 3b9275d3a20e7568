use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The closed set of pharmacogenes that the pipeline knows about
#[derive(AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[strum(ascii_case_insensitive)]
pub enum Gene {
    #[strum(serialize = "CYP2D6")]
    #[serde(rename = "CYP2D6")]
    Cyp2d6,
    #[strum(serialize = "CYP2C19")]
    #[serde(rename = "CYP2C19")]
    Cyp2c19,
    #[strum(serialize = "CYP2C9")]
    #[serde(rename = "CYP2C9")]
    Cyp2c9,
    #[strum(to_string = "SLCO1B1", serialize = "SLC01B1")]
    #[serde(rename = "SLCO1B1", alias = "SLC01B1")]
    Slco1b1,
    #[strum(serialize = "TPMT")]
    #[serde(rename = "TPMT")]
    Tpmt,
    #[strum(serialize = "DPYD")]
    #[serde(rename = "DPYD")]
    Dpyd,
    #[strum(serialize = "CYP3A4")]
    #[serde(rename = "CYP3A4")]
    Cyp3a4,
    #[strum(serialize = "CYP3A5")]
    #[serde(rename = "CYP3A5")]
    Cyp3a5,
    #[strum(serialize = "VKORC1")]
    #[serde(rename = "VKORC1")]
    Vkorc1,
    #[strum(serialize = "HLA-B")]
    #[serde(rename = "HLA-B")]
    HlaB
}

impl Gene {
    /// The allele label reported for a reference (index 0) genotype allele
    pub fn reference_allele(&self) -> &'static str {
        match self {
            Gene::Slco1b1 => "*1A",
            _ => "*1"
        }
    }

    /// The label reported for any alternate (non-zero index) genotype allele
    pub fn alternate_allele(&self) -> &'static str {
        "*2"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_gene_names() {
        assert_eq!(Gene::Cyp2d6.to_string(), "CYP2D6");
        assert_eq!(Gene::HlaB.to_string(), "HLA-B");
        assert_eq!(Gene::Slco1b1.to_string(), "SLCO1B1");
        assert_eq!(Gene::from_str("cyp2c19").unwrap(), Gene::Cyp2c19);
        assert_eq!(Gene::from_str("SLC01B1").unwrap(), Gene::Slco1b1);
        assert!(Gene::from_str("BRCA1").is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for gene in Gene::iter() {
            assert_eq!(Gene::from_str(&gene.to_string()).unwrap(), gene);
        }
    }

    #[test]
    fn test_reference_allele() {
        assert_eq!(Gene::Cyp2d6.reference_allele(), "*1");
        assert_eq!(Gene::Slco1b1.reference_allele(), "*1A");
    }
}
