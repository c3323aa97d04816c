use serde::{Deserialize, Serialize};

/// Which attribute a cutoff is compared against.
///
/// The scale of a `Percentage` cutoff depends on the operation: haplotype
/// counting compares against the stored 0-100 percentage, polymorphic-site
/// detection takes a 0-1 fraction of the position depth.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffMetric {
    #[value(name = "percentage")]
    Percentage,
    #[value(name = "number_reads", alias = "reads")]
    NumberReads,
}

impl CutoffMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CutoffMetric::Percentage => "percentage",
            CutoffMetric::NumberReads => "number_reads",
        }
    }
}

/// What nucleotide diversity does with positions that have fewer than two
/// counted bases.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Leave the position out of the mean.
    #[default]
    #[value(name = "skip")]
    Skip,
    /// Fail on the first degenerate position.
    #[value(name = "abort")]
    Abort,
}
