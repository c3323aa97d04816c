use crate::types::{CutoffMetric, DegeneratePolicy};
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults applied when a command-line flag is not given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Shannon entropy cutoff, 0-100 scale.
    #[serde(default)]
    pub min_entropy_percentage: f64,
    #[serde(default)]
    pub min_depth_for_normalization: u64,
    #[serde(default = "default_percentage_metric")]
    pub haplotype_metric: CutoffMetric,
    #[serde(default = "default_haplotype_cutoff")]
    pub haplotype_cutoff: f64,
    #[serde(default = "default_percentage_metric")]
    pub polymorphic_metric: CutoffMetric,
    #[serde(default = "default_polymorphic_cutoff")]
    pub polymorphic_cutoff: f64,
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
}

fn default_percentage_metric() -> CutoffMetric {
    CutoffMetric::Percentage
}

fn default_haplotype_cutoff() -> f64 {
    1.0
}

fn default_polymorphic_cutoff() -> f64 {
    0.01
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_entropy_percentage: 0.0,
            min_depth_for_normalization: 0,
            haplotype_metric: default_percentage_metric(),
            haplotype_cutoff: default_haplotype_cutoff(),
            polymorphic_metric: default_percentage_metric(),
            polymorphic_cutoff: default_polymorphic_cutoff(),
            degenerate_policy: DegeneratePolicy::default(),
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("org", "quasispecies", "quasispecies-tools")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads the user config, falling back to defaults when it is missing or
    /// does not parse.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Ignoring config at {}: {}", path.display(), e);
                Config::default()
            }),
            _ => Config::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()
            .ok_or_else(|| anyhow::anyhow!("no home directory to store the config in"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            "min_depth_for_normalization = 20\npolymorphic_metric = \"number_reads\"\n",
        )
        .unwrap();
        assert_eq!(config.min_depth_for_normalization, 20);
        assert_eq!(config.polymorphic_metric, CutoffMetric::NumberReads);
        assert_eq!(config.polymorphic_cutoff, 0.01);
        assert_eq!(config.degenerate_policy, DegeneratePolicy::Skip);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            haplotype_cutoff: 2.5,
            degenerate_policy: DegeneratePolicy::Abort,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
