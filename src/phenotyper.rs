use log::{debug, trace};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::data_types::diplotype::Diplotype;
use crate::data_types::gene::Gene;
use crate::data_types::phenotype::Phenotype;
use crate::data_types::variant_record::VariantRecord;
use crate::database::allele_activity::AlleleActivityTable;
use crate::database::pgx_tables::PgxTables;

/// The summed activity for a diplotype
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ActivityScore {
    /// The gene that was scored
    pub gene: Gene,
    /// Activity of allele 1
    pub allele1_activity: f64,
    /// Activity of allele 2
    pub allele2_activity: f64,
    /// Sum of both alleles
    pub total: f64,
    /// True if either allele was missing from the table and given the wildtype default
    pub defaulted_alleles: bool
}

/// Computes the activity score for a diplotype
/// # Arguments
/// * `table` - the gene activity table
/// * `diplotype` - the diplotype to score
pub fn compute_activity_score(table: &AlleleActivityTable, diplotype: &Diplotype) -> ActivityScore {
    let a1 = table.activity(diplotype.allele1());
    let a2 = table.activity(diplotype.allele2());
    ActivityScore {
        gene: table.gene(),
        allele1_activity: a1.value,
        allele2_activity: a2.value,
        total: a1.value + a2.value,
        defaulted_alleles: a1.defaulted || a2.defaulted
    }
}

/// Where a phenotype call came from
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhenotypeSource {
    ActivityModel,
    LegacyTable
}

impl PhenotypeSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhenotypeSource::ActivityModel => "activity_model",
            PhenotypeSource::LegacyTable => "legacy_table"
        }
    }
}

/// A successful phenotype classification for a gene
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PhenotypeClassification {
    gene: Gene,
    diplotype: Diplotype,
    phenotype: Phenotype,
    source: PhenotypeSource,
    /// only populated by the activity model
    activity_score: Option<ActivityScore>
}

impl PhenotypeClassification {
    pub fn gene(&self) -> Gene {
        self.gene
    }

    pub fn diplotype(&self) -> &Diplotype {
        &self.diplotype
    }

    pub fn phenotype(&self) -> Phenotype {
        self.phenotype
    }

    pub fn source(&self) -> PhenotypeSource {
        self.source
    }

    pub fn activity_score(&self) -> Option<&ActivityScore> {
        self.activity_score.as_ref()
    }
}

/// The outcome of the phenotype lookup chain
#[derive(Clone, Debug, PartialEq)]
pub enum PhenotypeCall {
    /// Classified by the activity model or the legacy table
    Classified(PhenotypeClassification),
    /// The gene name is not modeled at all, so Normal is assumed
    Defaulted { gene_name: String },
    /// The gene is modeled but nothing could classify the diplotype
    NotClassified { gene: Gene }
}

impl PhenotypeCall {
    /// The phenotype, if one was assigned (including the Normal default)
    pub fn phenotype(&self) -> Option<Phenotype> {
        match self {
            PhenotypeCall::Classified(c) => Some(c.phenotype()),
            PhenotypeCall::Defaulted { .. } => Some(Phenotype::Normal),
            PhenotypeCall::NotClassified { .. } => None
        }
    }

    pub fn classification(&self) -> Option<&PhenotypeClassification> {
        match self {
            PhenotypeCall::Classified(c) => Some(c),
            _ => None
        }
    }
}

/// Reasons a single step of the lookup chain could not classify a diplotype
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LookupMiss {
    NoActivityModel,
    NotInLegacyTable
}

/// First step of the chain: the activity model
fn classify_by_activity(tables: &PgxTables, gene: Gene, diplotype: &Diplotype) -> Result<PhenotypeClassification, LookupMiss> {
    let table = tables.activity_table(gene).ok_or(LookupMiss::NoActivityModel)?;
    let score = compute_activity_score(table, diplotype);
    let phenotype = table.ladder().classify(score.total);
    trace!("{gene} {diplotype} activity {} -> {phenotype:?}", score.total);
    Ok(PhenotypeClassification {
        gene,
        diplotype: diplotype.clone(),
        phenotype,
        source: PhenotypeSource::ActivityModel,
        activity_score: Some(score)
    })
}

/// Second step of the chain: exact diplotype lookup in either orientation
fn classify_by_legacy(tables: &PgxTables, gene: Gene, diplotype: &Diplotype) -> Result<PhenotypeClassification, LookupMiss> {
    let phenotype = tables.legacy_diplotypes().lookup(gene, diplotype)
        .ok_or(LookupMiss::NotInLegacyTable)?;
    trace!("{gene} {diplotype} legacy -> {phenotype:?}");
    Ok(PhenotypeClassification {
        gene,
        diplotype: diplotype.clone(),
        phenotype,
        source: PhenotypeSource::LegacyTable,
        activity_score: None
    })
}

/// Classifies a diplotype: activity model first, then the legacy table, otherwise NotClassified.
/// # Arguments
/// * `tables` - the reference tables
/// * `gene` - the gene the diplotype belongs to
/// * `diplotype` - the diplotype to classify
pub fn classify_diplotype(tables: &PgxTables, gene: Gene, diplotype: &Diplotype) -> PhenotypeCall {
    match classify_by_activity(tables, gene, diplotype)
        .or_else(|_| classify_by_legacy(tables, gene, diplotype)) {
        Ok(classification) => PhenotypeCall::Classified(classification),
        Err(miss) => {
            debug!("{gene} {diplotype} was not classified: {miss:?}");
            PhenotypeCall::NotClassified { gene }
        }
    }
}

/// String entry point for classification; a gene name outside the closed gene set defaults to Normal.
/// # Arguments
/// * `tables` - the reference tables
/// * `gene_name` - the gene name, case-insensitive
/// * `diplotype` - the diplotype to classify
pub fn classify_gene_name(tables: &PgxTables, gene_name: &str, diplotype: &Diplotype) -> PhenotypeCall {
    match Gene::from_str(gene_name.trim()) {
        Ok(gene) => classify_diplotype(tables, gene, diplotype),
        Err(_) => {
            debug!("Unrecognized gene {gene_name:?}, defaulting to normal function");
            PhenotypeCall::Defaulted { gene_name: gene_name.to_string() }
        }
    }
}

/// Phenotype result for one gene observed in the variant file
#[derive(Clone, Debug, PartialEq)]
pub struct GenePhenotype {
    /// The first record for the gene, if it has any records
    representative: Option<VariantRecord>,
    /// The diplotype derived from the representative record
    diplotype: Option<Diplotype>,
    /// The chain outcome
    call: PhenotypeCall,
    /// Number of records assigned to the gene
    variant_count: usize
}

impl GenePhenotype {
    pub fn representative(&self) -> Option<&VariantRecord> {
        self.representative.as_ref()
    }

    pub fn diplotype(&self) -> Option<&Diplotype> {
        self.diplotype.as_ref()
    }

    pub fn call(&self) -> &PhenotypeCall {
        &self.call
    }

    pub fn phenotype(&self) -> Option<Phenotype> {
        self.call.phenotype()
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }

    /// True if any allele was scored with the wildtype default
    pub fn defaulted_alleles(&self) -> bool {
        self.call.classification()
            .and_then(|c| c.activity_score())
            .map(|s| s.defaulted_alleles)
            .unwrap_or(false)
    }
}

/// The first record in file order represents the gene, even when a later record carries the alternate allele
fn select_representative(records: &[VariantRecord]) -> Option<&VariantRecord> {
    records.first()
}

/// Classifies every gene that has records.
/// # Arguments
/// * `tables` - the reference tables
/// * `records_by_gene` - parsed records grouped by gene
pub fn phenotype_genes(tables: &PgxTables, records_by_gene: &BTreeMap<Gene, Vec<VariantRecord>>) -> BTreeMap<Gene, GenePhenotype> {
    let mut results: BTreeMap<Gene, GenePhenotype> = Default::default();
    for (&gene, records) in records_by_gene.iter() {
        let representative = select_representative(records);
        let diplotype: Option<Diplotype> = representative.and_then(|r| r.diplotype());
        let call = match diplotype.as_ref() {
            Some(d) => classify_diplotype(tables, gene, d),
            None => PhenotypeCall::NotClassified { gene }
        };
        debug!("{gene}: {} records, diplotype {:?}, phenotype {:?}",
            records.len(), diplotype.as_ref().map(|d| d.diplotype()), call.phenotype());
        results.insert(gene, GenePhenotype {
            representative: representative.cloned(),
            diplotype,
            call,
            variant_count: records.len()
        });
    }
    results
}
