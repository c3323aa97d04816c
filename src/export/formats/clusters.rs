use crate::clusters::{ClusterDiversityEngine, HaplotypeCount};
use crate::types::CutoffMetric;
use serde::{Deserialize, Serialize};

/// Cluster indices as written to a JSON report. An index that is undefined
/// for the sample is `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterExport {
    pub clusters: usize,
    pub total_reads: u64,
    pub min_entropy_percentage: f64,
    pub shannon_entropy: Option<f64>,
    pub simpsons_index: Option<f64>,
    pub simpsons_index_of_diversity: Option<f64>,
    pub simpsons_reciprocal_index: Option<f64>,
    pub haplotypes: HaplotypeSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaplotypeSummary {
    pub metric: CutoffMetric,
    pub cutoff: f64,
    pub above_cutoff: usize,
    pub total: usize,
}

impl ClusterExport {
    pub fn new(
        engine: &ClusterDiversityEngine,
        min_entropy_percentage: f64,
        metric: CutoffMetric,
        cutoff: f64,
        haplotypes: HaplotypeCount,
    ) -> Self {
        Self {
            clusters: engine.len(),
            total_reads: engine.total_reads(),
            min_entropy_percentage,
            shannon_entropy: engine.shannon_entropy(min_entropy_percentage).ok(),
            simpsons_index: engine.simpsons_index().ok(),
            simpsons_index_of_diversity: engine.simpsons_index_of_diversity().ok(),
            simpsons_reciprocal_index: engine.simpsons_reciprocal_index().ok(),
            haplotypes: HaplotypeSummary {
                metric,
                cutoff,
                above_cutoff: haplotypes.above,
                total: haplotypes.total,
            },
        }
    }
}
