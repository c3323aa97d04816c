pub mod formats;

use crate::export::formats::clusters::ClusterExport;
use crate::export::formats::pileup::PileupExport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::{Deserialize as DeserializeTrait, Deserializer, Error};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const REPORT_TYPE: &str = "org.quasispecies.diversity";
pub const REPORT_VERSION: &str = "1.0";

/// Root of every JSON report.
#[derive(Debug, Serialize, Deserialize)]
pub struct DiversityReport {
    #[serde(rename = "$type")]
    pub record_type: String,

    pub version: String,
    #[serde(serialize_with = "serialize_datetime", deserialize_with = "deserialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    #[serde(flatten)]
    pub data: ReportData,

    pub metadata: ReportMetadata,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ReportData {
    Clusters(ClusterExport),
    Pileup(PileupExport),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub sample_id: Option<String>,
    pub input_file: String,
}

impl DiversityReport {
    pub fn new(data: ReportData, metadata: ReportMetadata) -> Self {
        Self {
            record_type: REPORT_TYPE.to_string(),
            version: REPORT_VERSION.to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            data,
            metadata,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .context("Failed to serialize report")?;
        Ok(())
    }
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(D::Error::custom)
}
