use serde::{Deserialize, Serialize};

pub(crate) const SIZE_TAG: &str = ";size=";

/// One clustered haplotype: a representative sequence plus its abundance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub name: String,
    pub sequence: String,
    /// Relative abundance on the 0-100 scale.
    pub percentage: f64,
    pub read_count: u64,
}

impl ClusterRecord {
    pub fn new(
        name: impl Into<String>,
        sequence: impl Into<String>,
        percentage: f64,
        read_count: u64,
    ) -> Self {
        Self {
            name: name.into(),
            sequence: sequence.into(),
            percentage,
            read_count,
        }
    }

    /// Annotated header text without the leading `>`, e.g. `ReadA;size=180_90.00%`.
    pub fn label(&self) -> String {
        format!(
            "{}{}{}_{:.2}%",
            self.name, SIZE_TAG, self.read_count, self.percentage
        )
    }

    pub(crate) fn with_percentage(&self, percentage: f64) -> Self {
        Self {
            percentage,
            ..self.clone()
        }
    }
}
