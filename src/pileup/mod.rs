pub mod tally;

pub use tally::{BaseCounts, PositionTally};

use crate::error::{check_cutoff, round_to, DiversityError, Result};
use crate::types::{CutoffMetric, DegeneratePolicy};
use crate::utils::input::open_input;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::io::BufRead;
use std::path::Path;

/// Positions whose second most abundant base passes a cutoff.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolymorphicPositionSet {
    pub metric: CutoffMetric,
    pub cutoff: f64,
    pub positions: Vec<PositionTally>,
}

impl PolymorphicPositionSet {
    pub fn count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PolymorphicQuery {
    metric: CutoffMetric,
    cutoff_bits: u64,
}

/// Within-sample diversity over the positions of one pileup.
#[derive(Debug)]
pub struct PileupDiversityEngine {
    positions: Vec<PositionTally>,
    polymorphic_cache: RefCell<HashMap<PolymorphicQuery, PolymorphicPositionSet>>,
}

impl PileupDiversityEngine {
    /// Builds an engine from tallies; a duplicate is reported by its 1-based
    /// index in `positions`.
    pub fn from_positions(positions: Vec<PositionTally>) -> Result<Self> {
        let line_numbers: Vec<usize> = (1..=positions.len()).collect();
        Self::from_numbered(positions, &line_numbers)
    }

    fn from_numbered(positions: Vec<PositionTally>, line_numbers: &[usize]) -> Result<Self> {
        let mut seen = HashSet::with_capacity(positions.len());
        for (tally, &line) in positions.iter().zip(line_numbers) {
            if !seen.insert((tally.reference.as_str(), tally.position)) {
                return Err(DiversityError::malformed(
                    line,
                    format!("duplicate position {}:{}", tally.reference, tally.position),
                ));
            }
        }

        Ok(Self {
            positions,
            polymorphic_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Loads every line of an mpileup; the first bad line aborts the load.
    pub fn from_reader<R: BufRead>(reader: R, min_depth_for_normalization: u64) -> Result<Self> {
        let mut positions = Vec::new();
        let mut line_numbers = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() {
                continue;
            }
            positions.push(PositionTally::from_pileup_line(
                line,
                idx + 1,
                min_depth_for_normalization,
            )?);
            line_numbers.push(idx + 1);
        }

        let engine = Self::from_numbered(positions, &line_numbers)?;
        log::debug!(
            "Loaded {} pileup positions (normalizing matches from depth {})",
            engine.len(),
            min_depth_for_normalization
        );
        Ok(engine)
    }

    pub fn from_path(path: &Path, min_depth_for_normalization: u64) -> Result<Self> {
        Self::from_reader(open_input(path)?, min_depth_for_normalization)
    }

    pub fn positions(&self) -> &[PositionTally] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Mean per-position pairwise diversity, skipping positions with fewer
    /// than two counted bases.
    pub fn nucleotide_diversity(&self) -> Result<f64> {
        self.nucleotide_diversity_with_policy(DegeneratePolicy::Skip)
    }

    pub fn nucleotide_diversity_with_policy(&self, policy: DegeneratePolicy) -> Result<f64> {
        let mut sum = 0.0;
        let mut defined = 0usize;

        for tally in &self.positions {
            match tally.pairwise_diversity() {
                Ok(di) => {
                    sum += di;
                    defined += 1;
                }
                Err(e) => match policy {
                    DegeneratePolicy::Abort => return Err(e),
                    DegeneratePolicy::Skip => {
                        log::debug!("Skipping {}", e);
                    }
                },
            }
        }

        if defined == 0 {
            return Err(DiversityError::EmptyPopulation(
                "no position has two or more counted bases",
            ));
        }
        if defined < self.positions.len() {
            log::info!(
                "Nucleotide diversity averaged over {} of {} positions",
                defined,
                self.positions.len()
            );
        }

        Ok(round_to(sum / defined as f64, 4))
    }

    /// Positions carrying a second allele above `cutoff`.
    ///
    /// With [`CutoffMetric::Percentage`] the cutoff is a 0-1 fraction of the
    /// counted bases at the position; with [`CutoffMetric::NumberReads`] it is
    /// an absolute read count. Both comparisons are strict.
    pub fn polymorphic_sites(
        &self,
        metric: CutoffMetric,
        cutoff: f64,
    ) -> Result<PolymorphicPositionSet> {
        match metric {
            CutoffMetric::Percentage => {
                check_cutoff("polymorphic cutoff", cutoff, 0.0, 1.0, "a fraction in 0-1")?
            }
            CutoffMetric::NumberReads => check_cutoff(
                "polymorphic cutoff",
                cutoff,
                0.0,
                f64::INFINITY,
                "a non-negative read count",
            )?,
        };

        // -0.0 and 0.0 share a cache slot
        let cutoff = cutoff + 0.0;
        let query = PolymorphicQuery {
            metric,
            cutoff_bits: cutoff.to_bits(),
        };
        if let Some(cached) = self.polymorphic_cache.borrow().get(&query) {
            return Ok(cached.clone());
        }

        let positions: Vec<PositionTally> = self
            .positions
            .iter()
            .filter(|tally| {
                let second = tally.counts.second_highest() as f64;
                match metric {
                    CutoffMetric::Percentage => second > tally.counts.total() as f64 * cutoff,
                    CutoffMetric::NumberReads => second > cutoff,
                }
            })
            .cloned()
            .collect();

        let set = PolymorphicPositionSet {
            metric,
            cutoff,
            positions,
        };
        self.polymorphic_cache
            .borrow_mut()
            .insert(query, set.clone());
        Ok(set)
    }
}
