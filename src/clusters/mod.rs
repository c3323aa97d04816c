pub mod parser;
pub mod record;

pub use parser::parse_clusters;
pub use record::ClusterRecord;

use crate::error::{check_cutoff, round_to, DiversityError, Result};
use crate::types::CutoffMetric;
use crate::utils::input::open_input;
use bio::io::fasta;
use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

/// Number of haplotypes meeting a cutoff, out of all loaded haplotypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaplotypeCount {
    pub above: usize,
    pub total: usize,
}

impl fmt::Display for HaplotypeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "From a total of {} haplotypes only {} are above the cutoff",
            self.total, self.above
        )
    }
}

/// Diversity indices over an immutable set of clusters.
#[derive(Debug, Clone)]
pub struct ClusterDiversityEngine {
    records: Vec<ClusterRecord>,
    total_reads: u64,
}

impl ClusterDiversityEngine {
    pub fn from_records(records: Vec<ClusterRecord>) -> Result<Self> {
        let mut names = HashSet::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            if record.read_count == 0 {
                return Err(DiversityError::malformed(
                    idx + 1,
                    format!("cluster '{}' has no reads", record.name),
                ));
            }
            if !names.insert(record.name.as_str()) {
                return Err(DiversityError::malformed(
                    idx + 1,
                    format!("duplicate cluster name '{}'", record.name),
                ));
            }
        }

        let total_reads = records.iter().map(|r| r.read_count).sum();
        Ok(Self {
            records,
            total_reads,
        })
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let records = parse_clusters(reader)?;
        let engine = Self::from_records(records)?;
        log::debug!(
            "Loaded {} clusters carrying {} reads",
            engine.len(),
            engine.total_reads
        );
        Ok(engine)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_reader(open_input(path)?)
    }

    pub fn records(&self) -> &[ClusterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    /// Normalized Shannon entropy (evenness) of the clusters whose percentage
    /// is at least `min_percentage`.
    ///
    /// `min_percentage` uses the same 0-100 scale as [`ClusterRecord::percentage`].
    /// The entropy is divided by `ln(k)` for the `k` retained clusters, so the
    /// result lies in `[0, 1]`. QuasiPycies divided by the log of the read
    /// total instead, so its values are smaller for the same input.
    /// Fewer than two retained clusters leave the index undefined and yield
    /// [`DiversityError::EmptyPopulation`].
    pub fn shannon_entropy(&self, min_percentage: f64) -> Result<f64> {
        check_cutoff("min_percentage", min_percentage, 0.0, 100.0, "a percentage in 0-100")?;

        let retained: Vec<u64> = self
            .records
            .iter()
            .filter(|r| r.percentage >= min_percentage)
            .map(|r| r.read_count)
            .collect();

        match retained.len() {
            0 => {
                return Err(DiversityError::EmptyPopulation(
                    "no cluster reaches the percentage cutoff",
                ))
            }
            1 => {
                return Err(DiversityError::EmptyPopulation(
                    "a single cluster leaves the entropy normalizer ln(1) at zero",
                ))
            }
            _ => {}
        }

        let reads: u64 = retained.iter().sum();
        let sum: f64 = retained
            .iter()
            .map(|&n| {
                let p = n as f64 / reads as f64;
                p * p.ln()
            })
            .sum();
        let entropy = -sum / (retained.len() as f64).ln();

        Ok(round_to(entropy, 3))
    }

    /// Simpson's index `D`: probability that two reads drawn at random belong
    /// to the same cluster.
    pub fn simpsons_index(&self) -> Result<f64> {
        Ok(round_to(self.dominance()?, 2))
    }

    /// `1 - D`.
    pub fn simpsons_index_of_diversity(&self) -> Result<f64> {
        Ok(round_to(1.0 - self.dominance()?, 2))
    }

    /// `1 / D`; 1 for a single cluster, growing with the number of even clusters.
    pub fn simpsons_reciprocal_index(&self) -> Result<f64> {
        Ok(round_to(1.0 / self.dominance()?, 2))
    }

    fn dominance(&self) -> Result<f64> {
        if self.total_reads == 0 {
            return Err(DiversityError::EmptyPopulation("no reads loaded"));
        }
        let total = self.total_reads as f64;
        Ok(self
            .records
            .iter()
            .map(|r| {
                let p = r.read_count as f64 / total;
                p * p
            })
            .sum())
    }

    /// Clusters holding at least `min_fraction` (0-1) of all reads.
    pub fn filter_by_relative_abundance(&self, min_fraction: f64) -> Result<Vec<ClusterRecord>> {
        check_cutoff("min_fraction", min_fraction, 0.0, 1.0, "a fraction in 0-1")?;

        let threshold = self.total_reads as f64 * min_fraction;
        Ok(self
            .records
            .iter()
            .filter(|r| r.read_count as f64 >= threshold)
            .cloned()
            .collect())
    }

    /// Counts clusters whose percentage (0-100) or read count meets `cutoff`.
    pub fn count_haplotypes_above_cutoff(
        &self,
        metric: CutoffMetric,
        cutoff: f64,
    ) -> Result<HaplotypeCount> {
        let above = match metric {
            CutoffMetric::Percentage => {
                check_cutoff("haplotype cutoff", cutoff, 0.0, 100.0, "a percentage in 0-100")?;
                self.records
                    .iter()
                    .filter(|r| r.percentage >= cutoff)
                    .count()
            }
            CutoffMetric::NumberReads => {
                check_cutoff("haplotype cutoff", cutoff, 0.0, f64::INFINITY, "a non-negative read count")?;
                self.records
                    .iter()
                    .filter(|r| r.read_count as f64 >= cutoff)
                    .count()
            }
        };

        Ok(HaplotypeCount {
            above,
            total: self.records.len(),
        })
    }

    /// Stamps each record with its share of this engine's full read total.
    pub fn restamp_percentages(&self, records: &[ClusterRecord]) -> Result<Vec<ClusterRecord>> {
        if self.total_reads == 0 {
            return Err(DiversityError::EmptyPopulation("no reads loaded"));
        }
        let total = self.total_reads as f64;
        Ok(records
            .iter()
            .map(|r| r.with_percentage(round_to(100.0 * r.read_count as f64 / total, 2)))
            .collect())
    }
}

/// `(label, sequence)` pairs in the annotated form [`parse_clusters`] reads.
pub fn export_as_labeled_sequences(records: &[ClusterRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .map(|r| (r.label(), r.sequence.clone()))
        .collect()
}

/// Recomputes percentages against the read total of `records` only, so a
/// filtered subset sums to 100 again.
pub fn renormalize_percentages(records: &[ClusterRecord]) -> Result<Vec<ClusterRecord>> {
    let reads: u64 = records.iter().map(|r| r.read_count).sum();
    if reads == 0 {
        return Err(DiversityError::EmptyPopulation(
            "cannot renormalize a collection without reads",
        ));
    }
    Ok(records
        .iter()
        .map(|r| r.with_percentage(round_to(100.0 * r.read_count as f64 / reads as f64, 2)))
        .collect())
}

pub fn write_clusters<W: Write>(records: &[ClusterRecord], writer: W) -> std::io::Result<()> {
    let mut fasta_writer = fasta::Writer::new(writer);
    for (label, sequence) in export_as_labeled_sequences(records) {
        fasta_writer.write(&label, None, sequence.as_bytes())?;
    }
    fasta_writer.flush()
}
