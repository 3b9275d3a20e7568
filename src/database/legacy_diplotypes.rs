use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::diplotype::Diplotype;
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;

/// Exact diplotype -> phenotype calls that predate the activity model
#[derive(Clone, Debug, Default, Serialize)]
pub struct LegacyDiplotypeTable {
    /// gene -> diplotype string -> phenotype
    entries: BTreeMap<Gene, BTreeMap<String, Phenotype>>
}

impl LegacyDiplotypeTable {
    /// Adds a single entry, overwriting any prior entry with the same orientation
    pub fn insert(&mut self, gene: Gene, diplotype: &Diplotype, phenotype: Phenotype) {
        self.entries.entry(gene).or_default()
            .insert(diplotype.diplotype().to_string(), phenotype);
    }

    /// Looks up a diplotype as written, then with the alleles swapped
    /// # Arguments
    /// * `gene` - the gene to search
    /// * `diplotype` - the diplotype to search for
    pub fn lookup(&self, gene: Gene, diplotype: &Diplotype) -> Option<Phenotype> {
        let gene_entries = self.entries.get(&gene)?;
        gene_entries.get(diplotype.diplotype())
            .or_else(|| gene_entries.get(diplotype.swapped().diplotype()))
            .copied()
    }

    /// Number of entries per gene
    pub fn gene_counts(&self) -> BTreeMap<Gene, usize> {
        self.entries.iter()
            .map(|(&gene, e)| (gene, e.len()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(|e| e.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the default legacy table
pub fn default_legacy_table() -> LegacyDiplotypeTable {
    use Phenotype::{Intermediate, Normal, Poor};
    let entries: [(Gene, &str, &str, Phenotype); 27] = [
        (Gene::Cyp2d6, "*1", "*1", Normal),
        (Gene::Cyp2d6, "*1", "*2", Normal),
        (Gene::Cyp2d6, "*1", "*40", Intermediate),
        (Gene::Cyp2d6, "*1", "*5", Intermediate),
        (Gene::Cyp2d6, "*1", "*41", Intermediate),
        (Gene::Cyp2d6, "*2", "*2", Normal),
        (Gene::Cyp2d6, "*4", "*4", Poor),
        (Gene::Cyp2d6, "*5", "*5", Poor),
        (Gene::Cyp2d6, "*1", "*4", Intermediate),
        (Gene::Cyp2c19, "*1", "*1", Normal),
        (Gene::Cyp2c19, "*1", "*2", Intermediate),
        (Gene::Cyp2c19, "*1", "*3", Intermediate),
        (Gene::Cyp2c19, "*2", "*2", Poor),
        (Gene::Cyp2c19, "*2", "*3", Poor),
        (Gene::Cyp2c19, "*3", "*3", Poor),
        (Gene::Cyp2c9, "*1", "*1", Normal),
        (Gene::Cyp2c9, "*1", "*2", Intermediate),
        (Gene::Cyp2c9, "*1", "*3", Intermediate),
        (Gene::Cyp2c9, "*2", "*2", Intermediate),
        (Gene::Cyp2c9, "*2", "*3", Poor),
        (Gene::Cyp2c9, "*3", "*3", Poor),
        (Gene::Tpmt, "*1", "*1", Normal),
        (Gene::Tpmt, "*1", "*2", Intermediate),
        (Gene::Tpmt, "*1", "*3A", Intermediate),
        (Gene::Tpmt, "*2", "*2", Poor),
        (Gene::Tpmt, "*2", "*3A", Poor),
        (Gene::Tpmt, "*3A", "*3A", Poor)
    ];

    let mut table = LegacyDiplotypeTable::default();
    for (gene, a1, a2, phenotype) in entries.into_iter() {
        table.insert(gene, &Diplotype::new(a1, a2), phenotype);
    }
    table
}
