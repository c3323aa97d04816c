pub mod cli;
pub mod clusters;
pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod pileup;
pub mod types;
pub mod utils;

pub use clusters::{ClusterDiversityEngine, ClusterRecord, HaplotypeCount};
pub use error::DiversityError;
pub use pileup::{PileupDiversityEngine, PolymorphicPositionSet, PositionTally};
pub use types::{CutoffMetric, DegeneratePolicy};
