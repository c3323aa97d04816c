pub mod clusters;
pub mod config;
pub mod convert;
pub mod pileup;
