pub mod clusters;
pub mod pileup;
