use serde::Serialize;

/// The two star alleles called for one gene, e.g. "*1/*4".
/// Allele order is kept for display, but equality ignores it.
#[derive(Clone, Debug, Eq, Serialize)]
pub struct Diplotype {
    allele1: String,
    allele2: String,
    /// "allele1/allele2", the key used by the legacy table
    label: String
}

impl Diplotype {
    pub fn new(allele1: &str, allele2: &str) -> Diplotype {
        Diplotype {
            allele1: allele1.to_string(),
            allele2: allele2.to_string(),
            label: format!("{allele1}/{allele2}")
        }
    }

    /// The same diplotype written in the other orientation
    pub fn swapped(&self) -> Diplotype {
        Diplotype::new(&self.allele2, &self.allele1)
    }

    pub fn allele1(&self) -> &str {
        &self.allele1
    }

    pub fn allele2(&self) -> &str {
        &self.allele2
    }

    pub fn diplotype(&self) -> &str {
        &self.label
    }
}

impl PartialEq for Diplotype {
    fn eq(&self, other: &Self) -> bool {
        (self.allele1 == other.allele1 && self.allele2 == other.allele2) ||
            (self.allele1 == other.allele2 && self.allele2 == other.allele1)
    }
}

impl std::fmt::Display for Diplotype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}
