use lazy_static::lazy_static;
use rustc_hash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The closed set of drugs with pharmacogenomic coverage
#[derive(AsRefStr, Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[strum(ascii_case_insensitive)]
pub enum Drug {
    Codeine,
    Warfarin,
    Clopidogrel,
    Simvastatin,
    Azathioprine,
    Fluorouracil,
    Metoprolol,
    Amitriptyline,
    Tacrolimus,
    Phenytoin,
    Tramadol
}

lazy_static! {
    /// Lower-case aliases, misspellings, and brand names that map onto a canonical drug
    static ref DRUG_ALIASES: HashMap<&'static str, Drug> = {
        let aliases: [(&str, Drug); 30] = [
            ("warfarin", Drug::Warfarin),
            ("warfarine", Drug::Warfarin),
            ("coumarin", Drug::Warfarin),
            ("coumarine", Drug::Warfarin),
            ("codeine", Drug::Codeine),
            ("tylenol 3", Drug::Codeine),
            ("clopidogrel", Drug::Clopidogrel),
            ("clopidogel", Drug::Clopidogrel),
            ("plavix", Drug::Clopidogrel),
            ("simvastatin", Drug::Simvastatin),
            ("simvastine", Drug::Simvastatin),
            ("zocor", Drug::Simvastatin),
            ("azathioprine", Drug::Azathioprine),
            ("imuran", Drug::Azathioprine),
            ("aza", Drug::Azathioprine),
            ("fluorouracil", Drug::Fluorouracil),
            ("fluorouracile", Drug::Fluorouracil),
            ("5fu", Drug::Fluorouracil),
            ("5-fu", Drug::Fluorouracil),
            ("adrucil", Drug::Fluorouracil),
            ("metoprolol", Drug::Metoprolol),
            ("metaprolol", Drug::Metoprolol),
            ("lopressor", Drug::Metoprolol),
            ("amitriptyline", Drug::Amitriptyline),
            ("amitrityline", Drug::Amitriptyline),
            ("elavil", Drug::Amitriptyline),
            ("tacrolimus", Drug::Tacrolimus),
            ("prograf", Drug::Tacrolimus),
            ("phenytoin", Drug::Phenytoin),
            ("dilantin", Drug::Phenytoin)
        ];
        aliases.into_iter().collect()
    };
}

impl Drug {
    /// Returns the full alias table, sorted by alias, mostly for reporting
    pub fn aliases() -> Vec<(&'static str, Drug)> {
        let mut aliases: Vec<(&'static str, Drug)> = DRUG_ALIASES.iter()
            .map(|(&alias, &drug)| (alias, drug))
            .collect();
        aliases.sort();
        aliases
    }

    /// Iterates over every supported drug in declaration order
    pub fn all() -> impl Iterator<Item = Drug> {
        Drug::iter()
    }
}

/// Result of normalizing a user provided drug name
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DrugName {
    /// Resolved to a canonical drug
    Known(Drug),
    /// Not recognized, the original text is kept unchanged
    Unrecognized(String)
}

impl DrugName {
    /// Normalizes a drug name: trimmed lower-case alias lookup, then case-insensitive canonical name match.
    /// Anything else passes through unchanged.
    /// # Arguments
    /// * `name` - the user provided drug name
    pub fn normalize(name: &str) -> DrugName {
        let key: String = name.trim().to_lowercase();
        if let Some(&drug) = DRUG_ALIASES.get(key.as_str()) {
            DrugName::Known(drug)
        } else if let Ok(drug) = Drug::from_str(name.trim()) {
            DrugName::Known(drug)
        } else {
            DrugName::Unrecognized(name.to_string())
        }
    }

    /// The canonical name if known, otherwise the original input
    pub fn display_name(&self) -> &str {
        match self {
            DrugName::Known(drug) => drug.as_ref(),
            DrugName::Unrecognized(name) => name
        }
    }

    pub fn drug(&self) -> Option<Drug> {
        match self {
            DrugName::Known(drug) => Some(*drug),
            DrugName::Unrecognized(_) => None
        }
    }
}

/// Splits comma separated drug lists, trims every entry, and drops empty entries.
/// Order is preserved.
/// # Arguments
/// * `inputs` - raw drug strings, each of which may contain a comma separated list
pub fn parse_drug_list<S: AsRef<str>>(inputs: &[S]) -> Vec<String> {
    inputs.iter()
        .flat_map(|s| s.as_ref().split(','))
        .map(|d| d.trim())
        .filter(|d| !d.is_empty())
        .map(|d| d.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_aliases() {
        assert_eq!(DrugName::normalize("warfarin"), DrugName::Known(Drug::Warfarin));
        assert_eq!(DrugName::normalize("  Coumarin "), DrugName::Known(Drug::Warfarin));
        assert_eq!(DrugName::normalize("PLAVIX"), DrugName::Known(Drug::Clopidogrel));
        assert_eq!(DrugName::normalize("5-FU"), DrugName::Known(Drug::Fluorouracil));
        assert_eq!(DrugName::normalize("Tylenol 3"), DrugName::Known(Drug::Codeine));
    }

    #[test]
    fn test_normalize_canonical() {
        assert_eq!(DrugName::normalize("TRAMADOL"), DrugName::Known(Drug::Tramadol));
        assert_eq!(DrugName::normalize("Tacrolimus").display_name(), "Tacrolimus");
    }

    #[test]
    fn test_normalize_unrecognized() {
        let name = DrugName::normalize(" Aspirin");
        assert_eq!(name, DrugName::Unrecognized(" Aspirin".to_string()));
        assert_eq!(name.display_name(), " Aspirin");
        assert_eq!(name.drug(), None);
    }

    #[test]
    fn test_aliases_sorted() {
        let aliases = Drug::aliases();
        assert_eq!(aliases.len(), 30);
        assert!(aliases.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_parse_drug_list() {
        let parsed = parse_drug_list(&["codeine, warfarin", " ", "CLOPIDOGREL,,"]);
        assert_eq!(parsed, vec!["codeine", "warfarin", "CLOPIDOGREL"]);
        let empty: Vec<String> = vec![];
        assert!(parse_drug_list(&empty).is_empty());
    }
}
