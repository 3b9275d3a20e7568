use strum::IntoEnumIterator;

use crate::data_types::drug::Drug;
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::risk_level::RiskLevel;

use Phenotype::{Intermediate, NoFunction, Normal, Poor, Rapid, UltraRapid};
use RiskLevel::{AdjustDosage, Ineffective, Safe, Toxic};

/// Phenotype -> verdict entries for one gene of one drug
pub type GeneRiskTable = &'static [(Phenotype, RiskLevel)];

/// The risk rule for a single drug.
/// Every drug in the closed drug set has exactly one rule, see `Drug::risk_rule`.
pub trait DrugRiskRule: Send + Sync {
    /// The drug this rule governs
    fn drug(&self) -> Drug;

    /// Genes that influence the drug, in priority order; the first gene is the primary gene
    fn governing_genes(&self) -> &'static [Gene];

    /// The verdict table for a gene, None if no curated mapping exists
    fn gene_table(&self, gene: Gene) -> Option<GeneRiskTable>;

    /// All genes that carry a verdict table
    fn table_genes(&self) -> Vec<Gene> {
        Gene::iter()
            .filter(|&g| self.gene_table(g).is_some())
            .collect()
    }

    /// The primary gene, used for guidance lookup
    fn primary_gene(&self) -> Option<Gene> {
        self.governing_genes().first().copied()
    }
}

/// A rule with curated phenotype tables for some or all governing genes
pub struct CuratedRule {
    drug: Drug,
    genes: &'static [Gene],
    tables: &'static [(Gene, GeneRiskTable)]
}

impl DrugRiskRule for CuratedRule {
    fn drug(&self) -> Drug {
        self.drug
    }

    fn governing_genes(&self) -> &'static [Gene] {
        self.genes
    }

    fn gene_table(&self, gene: Gene) -> Option<GeneRiskTable> {
        self.tables.iter()
            .find(|(g, _)| *g == gene)
            .map(|(_, table)| *table)
    }
}

/// A rule for a drug with known governing genes but no curated verdicts; every gene is reported for manual review
pub struct UncuratedRule {
    drug: Drug,
    genes: &'static [Gene]
}

impl DrugRiskRule for UncuratedRule {
    fn drug(&self) -> Drug {
        self.drug
    }

    fn governing_genes(&self) -> &'static [Gene] {
        self.genes
    }

    fn gene_table(&self, _gene: Gene) -> Option<GeneRiskTable> {
        None
    }
}

/// Looks up the verdict for a phenotype in a table, Unknown if the phenotype is not listed
pub fn table_verdict(table: GeneRiskTable, phenotype: Phenotype) -> RiskLevel {
    table.iter()
        .find(|(p, _)| *p == phenotype)
        .map(|(_, r)| *r)
        .unwrap_or(RiskLevel::Unknown)
}

const CODEINE_CYP2D6: GeneRiskTable = &[
    (UltraRapid, Toxic),
    (Rapid, AdjustDosage),
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, Ineffective),
    (NoFunction, Ineffective)
];

const WARFARIN_CYP2C9: GeneRiskTable = &[
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, AdjustDosage)
];

const CLOPIDOGREL_CYP2C19: GeneRiskTable = &[
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, Ineffective)
];

const SIMVASTATIN_SLCO1B1: GeneRiskTable = &[
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, AdjustDosage)
];

const AZATHIOPRINE_TPMT: GeneRiskTable = &[
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, Toxic)
];

const FLUOROURACIL_DPYD: GeneRiskTable = &[
    (Normal, Safe),
    (Intermediate, AdjustDosage),
    (Poor, Toxic)
];

const CYP2D6_SUBSTRATE: GeneRiskTable = &[
    (Normal, Safe),
    (Poor, AdjustDosage)
];

static CODEINE_RULE: CuratedRule = CuratedRule {
    drug: Drug::Codeine,
    genes: &[Gene::Cyp2d6],
    tables: &[(Gene::Cyp2d6, CODEINE_CYP2D6)]
};

static WARFARIN_RULE: CuratedRule = CuratedRule {
    drug: Drug::Warfarin,
    genes: &[Gene::Cyp2c9, Gene::Vkorc1],
    tables: &[(Gene::Cyp2c9, WARFARIN_CYP2C9)]
};

static CLOPIDOGREL_RULE: CuratedRule = CuratedRule {
    drug: Drug::Clopidogrel,
    genes: &[Gene::Cyp2c19],
    tables: &[(Gene::Cyp2c19, CLOPIDOGREL_CYP2C19)]
};

static SIMVASTATIN_RULE: CuratedRule = CuratedRule {
    drug: Drug::Simvastatin,
    genes: &[Gene::Cyp3a4, Gene::Slco1b1],
    tables: &[(Gene::Slco1b1, SIMVASTATIN_SLCO1B1)]
};

static AZATHIOPRINE_RULE: CuratedRule = CuratedRule {
    drug: Drug::Azathioprine,
    genes: &[Gene::Tpmt],
    tables: &[(Gene::Tpmt, AZATHIOPRINE_TPMT)]
};

static FLUOROURACIL_RULE: CuratedRule = CuratedRule {
    drug: Drug::Fluorouracil,
    genes: &[Gene::Dpyd],
    tables: &[(Gene::Dpyd, FLUOROURACIL_DPYD)]
};

static METOPROLOL_RULE: CuratedRule = CuratedRule {
    drug: Drug::Metoprolol,
    genes: &[Gene::Cyp2d6],
    tables: &[(Gene::Cyp2d6, CYP2D6_SUBSTRATE)]
};

static AMITRIPTYLINE_RULE: CuratedRule = CuratedRule {
    drug: Drug::Amitriptyline,
    genes: &[Gene::Cyp2d6, Gene::Cyp2c19],
    tables: &[(Gene::Cyp2d6, CYP2D6_SUBSTRATE), (Gene::Cyp2c19, CYP2D6_SUBSTRATE)]
};

static TACROLIMUS_RULE: UncuratedRule = UncuratedRule {
    drug: Drug::Tacrolimus,
    genes: &[Gene::Cyp3a5]
};

static PHENYTOIN_RULE: UncuratedRule = UncuratedRule {
    drug: Drug::Phenytoin,
    genes: &[Gene::Cyp2c9, Gene::HlaB]
};

static TRAMADOL_RULE: UncuratedRule = UncuratedRule {
    drug: Drug::Tramadol,
    genes: &[Gene::Cyp2d6]
};

impl Drug {
    /// Returns the risk rule for this drug
    pub fn risk_rule(&self) -> &'static dyn DrugRiskRule {
        match self {
            Drug::Codeine => &CODEINE_RULE,
            Drug::Warfarin => &WARFARIN_RULE,
            Drug::Clopidogrel => &CLOPIDOGREL_RULE,
            Drug::Simvastatin => &SIMVASTATIN_RULE,
            Drug::Azathioprine => &AZATHIOPRINE_RULE,
            Drug::Fluorouracil => &FLUOROURACIL_RULE,
            Drug::Metoprolol => &METOPROLOL_RULE,
            Drug::Amitriptyline => &AMITRIPTYLINE_RULE,
            Drug::Tacrolimus => &TACROLIMUS_RULE,
            Drug::Phenytoin => &PHENYTOIN_RULE,
            Drug::Tramadol => &TRAMADOL_RULE
        }
    }
}
