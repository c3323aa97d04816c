use thiserror::Error;

/// Failures raised while loading or querying the diversity engines.
///
/// All variants are terminal for the requested operation only; an engine that
/// returned an error stays usable for other queries.
#[derive(Debug, Error)]
pub enum DiversityError {
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("empty population: {0}")]
    EmptyPopulation(&'static str),

    #[error("degenerate position {reference}:{position} (depth {depth}), pairwise statistic is undefined")]
    DegeneratePosition {
        reference: String,
        position: u64,
        depth: u64,
    },

    #[error("invalid cutoff for {name}: {value} (expected {expected})")]
    InvalidCutoff {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DiversityError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DiversityError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DiversityError>;

/// Rejects NaN and values outside `[min, max]`.
pub(crate) fn check_cutoff(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    expected: &'static str,
) -> Result<f64> {
    if value.is_nan() || value < min || value > max {
        return Err(DiversityError::InvalidCutoff {
            name,
            value,
            expected,
        });
    }
    Ok(value)
}

/// Rounds half away from zero to `places` decimals.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
