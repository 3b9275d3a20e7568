use serde::Serialize;
use std::collections::BTreeMap;

use crate::data_types::diplotype::Diplotype;
use crate::data_types::gene::Gene;

/// A genotype call as written in the sample column, e.g. "0/1" or "1|1"
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenotypeCall {
    raw: String
}

impl GenotypeCall {
    pub fn new(raw: &str) -> GenotypeCall {
        GenotypeCall {
            raw: raw.to_string()
        }
    }

    /// The reference-homozygous call used when the sample column carries no GT field
    pub fn reference() -> GenotypeCall {
        GenotypeCall::new("0/0")
    }

    /// Returns the two allele indices if this is a diploid call with both alleles present.
    /// Missing alleles (".") and haploid calls return None.
    pub fn allele_indices(&self) -> Option<(usize, usize)> {
        let mut split = self.raw.split(['/', '|']);
        let a1: usize = split.next()?.parse().ok()?;
        let a2: usize = split.next()?.parse().ok()?;
        if split.next().is_some() {
            None
        } else {
            Some((a1, a2))
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// A single parsed line from a variant file, assigned to a gene
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VariantRecord {
    /// Chromosome as written in the file, e.g. "22" or "chr22"
    chrom: String,
    /// 1-based position
    position: u64,
    /// Reference allele sequence
    ref_allele: String,
    /// Alternate allele sequence
    alt_allele: String,
    /// Variant identifier, typically an rsID
    variant_id: Option<String>,
    /// The sample genotype call
    genotype: GenotypeCall,
    /// The gene this record was assigned to
    gene: Gene,
    /// QUAL column, 0.0 when missing
    quality: f64,
    /// INFO column, flags are stored with a value of "true"
    info: BTreeMap<String, String>
}

impl VariantRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chrom: String, position: u64, ref_allele: String, alt_allele: String,
        variant_id: Option<String>, genotype: GenotypeCall, gene: Gene,
        quality: f64, info: BTreeMap<String, String>
    ) -> VariantRecord {
        VariantRecord {
            chrom,
            position,
            ref_allele,
            alt_allele,
            variant_id,
            genotype,
            gene,
            quality,
            info
        }
    }

    /// Converts the genotype call into a diplotype.
    /// Index 0 maps to the gene reference allele and any other index maps to the gene alternate allele, whatever the variant.
    /// Returns None if the genotype call is not a complete diploid call.
    pub fn diplotype(&self) -> Option<Diplotype> {
        let (a1, a2) = self.genotype.allele_indices()?;
        let alt_label: &str = self.gene.alternate_allele();
        let reference_label: &str = self.gene.reference_allele();
        let label1 = if a1 == 0 { reference_label } else { alt_label };
        let label2 = if a2 == 0 { reference_label } else { alt_label };
        Some(Diplotype::new(label1, label2))
    }

    // getters
    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn ref_allele(&self) -> &str {
        &self.ref_allele
    }

    pub fn alt_allele(&self) -> &str {
        &self.alt_allele
    }

    pub fn variant_id(&self) -> Option<&str> {
        self.variant_id.as_deref()
    }

    pub fn genotype(&self) -> &GenotypeCall {
        &self.genotype
    }

    pub fn gene(&self) -> Gene {
        self.gene
    }

    pub fn quality(&self) -> f64 {
        self.quality
    }

    pub fn info(&self) -> &BTreeMap<String, String> {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(genotype: &str, gene: Gene) -> VariantRecord {
        VariantRecord::new(
            "10".to_string(), 96541616, "G".to_string(), "A".to_string(),
            Some("rs4244285".to_string()), GenotypeCall::new(genotype), gene,
            50.0, Default::default()
        )
    }

    #[test]
    fn test_allele_indices() {
        assert_eq!(GenotypeCall::new("0/1").allele_indices(), Some((0, 1)));
        assert_eq!(GenotypeCall::new("1|1").allele_indices(), Some((1, 1)));
        assert_eq!(GenotypeCall::new("0/2").allele_indices(), Some((0, 2)));
        assert_eq!(GenotypeCall::new("./.").allele_indices(), None);
        assert_eq!(GenotypeCall::new("1").allele_indices(), None);
        assert_eq!(GenotypeCall::new("0/1/1").allele_indices(), None);
        assert_eq!(GenotypeCall::reference().allele_indices(), Some((0, 0)));
    }

    #[test]
    fn test_diplotype_labels() {
        assert_eq!(record("0/1", Gene::Cyp2c19).diplotype(), Some(Diplotype::new("*1", "*2")));
        assert_eq!(record("0/0", Gene::Cyp2c19).diplotype(), Some(Diplotype::new("*1", "*1")));
        // every alternate index is *2, including multi-allelic calls
        assert_eq!(record("1/1", Gene::Cyp2c9).diplotype(), Some(Diplotype::new("*2", "*2")));
        assert_eq!(record("1/2", Gene::Cyp2d6).diplotype(), Some(Diplotype::new("*2", "*2")));
        // SLCO1B1 reference is *1A
        assert_eq!(record("0/1", Gene::Slco1b1).diplotype(), Some(Diplotype::new("*1A", "*2")));
        assert_eq!(record("./.", Gene::Cyp2c19).diplotype(), None);
    }
}
