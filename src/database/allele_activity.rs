use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::database::db_const::WILDTYPE_ACTIVITY;

// allele -> activity units per gene
const CYP2D6_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*2", 0.0), ("*3", 0.0), ("*4", 0.0), ("*5", 0.0), ("*6", 0.0),
    ("*7", 0.0), ("*8", 0.0), ("*9", 0.5), ("*10", 0.5), ("*11", 0.0), ("*12", 1.0),
    ("*14", 0.5), ("*15", 0.0), ("*17", 0.5), ("*19", 0.0), ("*20", 0.5), ("*29", 0.5),
    ("*35", 0.0), ("*36", 0.5), ("*37", 0.0), ("*38", 0.0), ("*39", 0.5), ("*40", 0.0),
    ("*41", 0.5), ("*42", 0.0), ("*43", 0.0), ("*44", 0.0), ("*45", 0.0), ("*46", 0.0),
    ("*47", 0.0), ("*48", 0.0), ("*49", 0.0), ("*50", 0.5)
];

const CYP2C19_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*2", 0.0), ("*3", 0.0), ("*4", 0.0), ("*5", 0.0), ("*6", 0.0),
    ("*7", 0.0), ("*8", 1.0), ("*9", 1.0), ("*10", 1.0), ("*11", 1.0), ("*12", 0.0),
    ("*13", 1.0), ("*14", 1.0), ("*15", 0.0), ("*16", 1.0), ("*17", 1.0), ("*18", 1.0),
    ("*19", 1.0), ("*20", 1.0)
];

const CYP2C9_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*2", 0.8), ("*3", 0.05), ("*4", 0.5), ("*5", 0.2), ("*6", 0.0),
    ("*7", 0.88), ("*8", 0.7), ("*9", 1.0), ("*10", 1.0), ("*11", 0.8), ("*12", 0.5),
    ("*13", 0.5)
];

const TPMT_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*2", 0.0), ("*3A", 0.0), ("*3B", 0.0), ("*3C", 0.0), ("*4", 1.0),
    ("*5", 0.0), ("*6", 0.0), ("*7", 0.0), ("*8", 0.5), ("*9", 1.0), ("*10", 1.0),
    ("*11", 1.0), ("*12", 1.0), ("*13", 0.0)
];

const SLCO1B1_ACTIVITY: &[(&str, f64)] = &[
    ("*1A", 1.0), ("*1B", 1.0), ("*1C", 0.8), ("*1D", 0.7), ("*1E", 0.9), ("*2", 0.5),
    ("*3", 0.5), ("*4", 0.3), ("*5", 0.0), ("*15", 0.5), ("*17", 0.5)
];

const DPYD_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*1A", 1.0), ("*1B", 1.0), ("*2A", 0.0), ("*2B", 0.0), ("*3", 0.0),
    ("*4", 0.0), ("*5", 0.0), ("*6", 0.0), ("*7", 0.0), ("*8", 0.0), ("*9A", 0.0),
    ("*9B", 0.0), ("*13", 0.0)
];

const CYP3A4_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*1A", 1.0), ("*1B", 1.0), ("*1D", 1.0), ("*2", 0.5), ("*3", 0.7),
    ("*4", 1.0), ("*5", 0.0), ("*6", 0.0)
];

const CYP3A5_ACTIVITY: &[(&str, f64)] = &[
    ("*1", 1.0), ("*2", 0.0), ("*3", 0.0), ("*4", 0.0), ("*5", 0.0), ("*6", 0.0),
    ("*7", 0.0), ("*9", 0.0), ("*10", 0.5)
];

/// Activity of a single allele, tracking whether the wildtype default was applied
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AlleleActivity {
    /// activity units
    pub value: f64,
    /// true if the allele was missing from the table
    pub defaulted: bool
}

/// Ordered activity cut-offs that convert a total score into a phenotype
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ThresholdLadder {
    /// CYP2D6 and CYP2C19: >=1.75 UR, >=1.25 R, >1.0 N, >=0.25 I, else P
    FiveBand,
    /// CYP2C9: >=1.8 N, >=1.2 I, >=0.3 P, else NF
    Cyp2c9,
    /// TPMT: >=1.6 N, >=0.5 I, else P
    Tpmt,
    /// DPYD, SLCO1B1, CYP3A4, CYP3A5: >=1.8 N, >=0.9 I, else P
    ThreeBand
}

impl ThresholdLadder {
    /// Converts a total activity score into a phenotype
    /// # Arguments
    /// * `activity` - the summed activity of both alleles
    pub fn classify(&self, activity: f64) -> Phenotype {
        match self {
            ThresholdLadder::FiveBand => {
                if activity >= 1.75 {
                    Phenotype::UltraRapid
                } else if activity >= 1.25 {
                    Phenotype::Rapid
                } else if activity > 1.0 {
                    Phenotype::Normal
                } else if activity >= 0.25 {
                    Phenotype::Intermediate
                } else {
                    Phenotype::Poor
                }
            },
            ThresholdLadder::Cyp2c9 => {
                if activity >= 1.8 {
                    Phenotype::Normal
                } else if activity >= 1.2 {
                    Phenotype::Intermediate
                } else if activity >= 0.3 {
                    Phenotype::Poor
                } else {
                    Phenotype::NoFunction
                }
            },
            ThresholdLadder::Tpmt => {
                if activity >= 1.6 {
                    Phenotype::Normal
                } else if activity >= 0.5 {
                    Phenotype::Intermediate
                } else {
                    Phenotype::Poor
                }
            },
            ThresholdLadder::ThreeBand => {
                if activity >= 1.8 {
                    Phenotype::Normal
                } else if activity >= 0.9 {
                    Phenotype::Intermediate
                } else {
                    Phenotype::Poor
                }
            }
        }
    }
}

/// The allele activity table and threshold ladder for a single gene
#[derive(Clone, Debug, Serialize)]
pub struct AlleleActivityTable {
    /// The gene this table describes
    gene: Gene,
    /// allele label -> activity units
    activities: BTreeMap<String, f64>,
    /// converts the total score into a phenotype
    ladder: ThresholdLadder
}

impl AlleleActivityTable {
    /// Creates a new table from static allele data
    /// # Arguments
    /// * `gene` - the gene
    /// * `activities` - allele label and activity pairs
    /// * `ladder` - the threshold ladder for the gene
    pub fn new(gene: Gene, activities: &[(&str, f64)], ladder: ThresholdLadder) -> AlleleActivityTable {
        AlleleActivityTable {
            gene,
            activities: activities.iter()
                .map(|&(allele, value)| (allele.to_string(), value))
                .collect(),
            ladder
        }
    }

    /// Looks up an allele, applying the wildtype default if it is not in the table
    pub fn activity(&self, allele: &str) -> AlleleActivity {
        match self.activities.get(allele) {
            Some(&value) => AlleleActivity { value, defaulted: false },
            None => AlleleActivity { value: WILDTYPE_ACTIVITY, defaulted: true }
        }
    }

    // getters
    pub fn gene(&self) -> Gene {
        self.gene
    }

    pub fn activities(&self) -> &BTreeMap<String, f64> {
        &self.activities
    }

    pub fn ladder(&self) -> ThresholdLadder {
        self.ladder
    }
}

/// Builds the default activity tables for every gene that has an activity model
pub fn default_activity_tables() -> BTreeMap<Gene, AlleleActivityTable> {
    let tables = [
        AlleleActivityTable::new(Gene::Cyp2d6, CYP2D6_ACTIVITY, ThresholdLadder::FiveBand),
        AlleleActivityTable::new(Gene::Cyp2c19, CYP2C19_ACTIVITY, ThresholdLadder::FiveBand),
        AlleleActivityTable::new(Gene::Cyp2c9, CYP2C9_ACTIVITY, ThresholdLadder::Cyp2c9),
        AlleleActivityTable::new(Gene::Tpmt, TPMT_ACTIVITY, ThresholdLadder::Tpmt),
        AlleleActivityTable::new(Gene::Slco1b1, SLCO1B1_ACTIVITY, ThresholdLadder::ThreeBand),
        AlleleActivityTable::new(Gene::Dpyd, DPYD_ACTIVITY, ThresholdLadder::ThreeBand),
        AlleleActivityTable::new(Gene::Cyp3a4, CYP3A4_ACTIVITY, ThresholdLadder::ThreeBand),
        AlleleActivityTable::new(Gene::Cyp3a5, CYP3A5_ACTIVITY, ThresholdLadder::ThreeBand)
    ];
    tables.into_iter()
        .map(|t| (t.gene(), t))
        .collect()
}
