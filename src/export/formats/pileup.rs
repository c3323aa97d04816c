use crate::pileup::{BaseCounts, PolymorphicPositionSet, PositionTally};
use crate::types::CutoffMetric;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PileupExport {
    pub positions: usize,
    pub min_depth_for_normalization: u64,
    pub nucleotide_diversity: Option<f64>,
    pub polymorphic_sites: PolymorphicExport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolymorphicExport {
    pub metric: CutoffMetric,
    pub cutoff: f64,
    pub count: usize,
    pub sites: Vec<SiteExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteExport {
    pub reference: String,
    pub position: u64,
    pub reference_base: char,
    pub depth: u64,
    pub a: u64,
    pub c: u64,
    pub g: u64,
    pub t: u64,
}

impl From<&PositionTally> for SiteExport {
    fn from(tally: &PositionTally) -> Self {
        let BaseCounts { a, c, g, t } = tally.counts;
        Self {
            reference: tally.reference.clone(),
            position: tally.position,
            reference_base: tally.reference_base,
            depth: tally.depth,
            a,
            c,
            g,
            t,
        }
    }
}

impl From<&PolymorphicPositionSet> for PolymorphicExport {
    fn from(set: &PolymorphicPositionSet) -> Self {
        Self {
            metric: set.metric,
            cutoff: set.cutoff,
            count: set.count(),
            sites: set.positions.iter().map(SiteExport::from).collect(),
        }
    }
}
