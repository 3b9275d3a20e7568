use lazy_static::lazy_static;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;

use crate::data_types::gene::Gene;

/// Wildtype activity applied to any allele that is not in a gene activity table
pub const WILDTYPE_ACTIVITY: f64 = 1.0;

/// Version label for the phenotype and risk rule set
pub const ALGORITHM_VERSION: &str = "CPIC-aligned-v2";

/// A variant with a hard-coded gene assignment
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KnownVariant {
    /// The identifier, an rsID
    pub variant_id: &'static str,
    /// The gene the variant is assigned to
    pub gene: Gene,
    /// Chromosome without the "chr" prefix
    pub chrom: &'static str,
    /// 1-based position, if it is tracked
    pub position: Option<u64>
}

lazy_static! {
    /// Chromosome fallback for gene assignment, checked in this exact order.
    /// CYP2C19 and CYP2C9 share chromosome 10, so CYP2C19 wins any chromosome-only match.
    pub static ref GENE_CHROMOSOMES: Vec<(Gene, &'static str)> = vec![
        (Gene::Cyp2d6, "22"),
        (Gene::Cyp2c19, "10"),
        (Gene::Cyp2c9, "10"),
        (Gene::Slco1b1, "12"),
        (Gene::Tpmt, "6"),
        (Gene::Dpyd, "1")
    ];

    /// Every variant that is assigned by identifier; the identifier only picks the gene
    pub static ref KNOWN_VARIANTS: Vec<KnownVariant> = {
        // (rsID, gene, chrom, position)
        let known_variants: [(&str, Gene, &str, Option<u64>); 18] = [
            // CYP2D6
            ("rs1065852", Gene::Cyp2d6, "22", Some(42126499)),
            ("rs5030655", Gene::Cyp2d6, "22", Some(42130692)),
            ("rs5030867", Gene::Cyp2d6, "22", Some(42131889)),
            ("rs3892097", Gene::Cyp2d6, "22", None),
            ("rs1058164", Gene::Cyp2d6, "22", None),
            // CYP2C19
            ("rs4244285", Gene::Cyp2c19, "10", Some(96541616)),
            ("rs4986893", Gene::Cyp2c19, "10", Some(96541857)),
            ("rs12248560", Gene::Cyp2c19, "10", Some(96545410)),
            ("rs28399504", Gene::Cyp2c19, "10", None),
            // CYP2C9
            ("rs1799853", Gene::Cyp2c9, "10", Some(94938996)),
            ("rs1057910", Gene::Cyp2c9, "10", Some(94942758)),
            // SLCO1B1
            ("rs4149056", Gene::Slco1b1, "12", Some(21370535)),
            // TPMT
            ("rs1142345", Gene::Tpmt, "6", Some(18130722)),
            ("rs1800460", Gene::Tpmt, "6", Some(18131875)),
            ("rs1800462", Gene::Tpmt, "6", Some(18140475)),
            // DPYD
            ("rs3918290", Gene::Dpyd, "1", Some(97915614)),
            ("rs55886062", Gene::Dpyd, "1", Some(98348885)),
            ("rs67376798", Gene::Dpyd, "1", Some(98403947))
        ];
        known_variants.into_iter()
            .map(|(variant_id, gene, chrom, position)| KnownVariant {
                variant_id, gene, chrom, position
            })
            .collect()
    };

    /// Identifier lookup into KNOWN_VARIANTS
    pub static ref KNOWN_VARIANT_INDEX: HashMap<&'static str, usize> = {
        KNOWN_VARIANTS.iter().enumerate()
            .map(|(i, kv)| (kv.variant_id, i))
            .collect()
    };
}

/// Returns the known variant for an identifier, if any
/// # Arguments
/// * `variant_id` - the identifier from the ID column
pub fn known_variant(variant_id: &str) -> Option<&'static KnownVariant> {
    KNOWN_VARIANT_INDEX.get(variant_id)
        .map(|&i| &KNOWN_VARIANTS[i])
}

/// Assigns a chromosome to the first gene in the fallback order that lives on it.
/// Accepts both "22" and "chr22".
/// # Arguments
/// * `chrom` - the chromosome from the CHROM column
pub fn gene_for_chromosome(chrom: &str) -> Option<Gene> {
    let stripped: &str = chrom.strip_prefix("chr").unwrap_or(chrom);
    GENE_CHROMOSOMES.iter()
        .find(|(_, c)| *c == stripped)
        .map(|(gene, _)| *gene)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_variant() {
        let kv = known_variant("rs4244285").unwrap();
        assert_eq!(kv.gene, Gene::Cyp2c19);
        assert_eq!(kv.position, Some(96541616));
        // identifier wins over the chromosome 10 fallback
        assert_eq!(known_variant("rs1057910").unwrap().gene, Gene::Cyp2c9);
        assert!(known_variant("rs0").is_none());
        assert_eq!(KNOWN_VARIANT_INDEX.len(), KNOWN_VARIANTS.len());
    }

    #[test]
    fn test_gene_for_chromosome() {
        assert_eq!(gene_for_chromosome("22"), Some(Gene::Cyp2d6));
        assert_eq!(gene_for_chromosome("chr22"), Some(Gene::Cyp2d6));
        // shared chromosome goes to the first listed gene
        assert_eq!(gene_for_chromosome("10"), Some(Gene::Cyp2c19));
        assert_eq!(gene_for_chromosome("chr6"), Some(Gene::Tpmt));
        assert_eq!(gene_for_chromosome("7"), None);
        assert_eq!(gene_for_chromosome("X"), None);
    }
}
