use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};

/// Metabolizer (or transporter) phenotype categories
#[derive(Clone, Copy, Debug, Deserialize, EnumIter, EnumString, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phenotype {
    UltraRapid,
    Rapid,
    Normal,
    Intermediate,
    Poor,
    NoFunction
}

impl Phenotype {
    /// The human readable label, e.g. "Poor Metabolizer"
    pub fn label(&self) -> &'static str {
        match self {
            Phenotype::UltraRapid => "Ultra-Rapid Metabolizer",
            Phenotype::Rapid => "Rapid Metabolizer",
            Phenotype::Normal => "Normal Metabolizer",
            Phenotype::Intermediate => "Intermediate Metabolizer",
            Phenotype::Poor => "Poor Metabolizer",
            Phenotype::NoFunction => "No Function"
        }
    }

    /// Short form for tables, e.g. "PM"
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Phenotype::UltraRapid => "URM",
            Phenotype::Rapid => "RM",
            Phenotype::Normal => "NM",
            Phenotype::Intermediate => "IM",
            Phenotype::Poor => "PM",
            Phenotype::NoFunction => "NF"
        }
    }

    /// Label without the "Metabolizer" suffix, used in clinical relevance statements
    pub fn short_label(&self) -> &'static str {
        match self {
            Phenotype::UltraRapid => "Ultra-Rapid",
            Phenotype::Rapid => "Rapid",
            Phenotype::Normal => "Normal",
            Phenotype::Intermediate => "Intermediate",
            Phenotype::Poor => "Poor",
            Phenotype::NoFunction => "No Function"
        }
    }

    /// Merge rank, lowest wins: no function, poor, intermediate, rapid, normal, then ultra-rapid
    fn merge_rank(&self) -> u8 {
        match self {
            Phenotype::NoFunction => 0,
            Phenotype::Poor => 1,
            Phenotype::Intermediate => 2,
            Phenotype::Rapid => 3,
            Phenotype::Normal => 4,
            Phenotype::UltraRapid => 5
        }
    }
}

impl std::fmt::Display for Phenotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Returns the worst phenotype from a collection.
/// Ultra-rapid ranks below normal, so it only wins when every entry is ultra-rapid.
/// An empty collection merges to Normal.
/// # Arguments
/// * `phenotypes` - the phenotypes to merge
pub fn merge_worst_phenotype<'a>(phenotypes: impl IntoIterator<Item = &'a Phenotype>) -> Phenotype {
    phenotypes.into_iter()
        .min_by_key(|p| p.merge_rank())
        .copied()
        .unwrap_or(Phenotype::Normal)
}
