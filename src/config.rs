//! Dashboard settings.
//!
//! Read from `dashboard.json` in the working directory when present;
//! every field is optional.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Listings file (`.csv`, `.json` or `.parquet`).
    pub data_path: PathBuf,
    /// Initial number of odometer histogram bins.
    pub histogram_bins: usize,
    /// How many models, alphabetically, start selected.
    pub default_model_count: usize,
    pub show_histogram: bool,
    pub show_scatter: bool,
    pub show_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("vehicles_us_clean.csv"),
            histogram_bins: 80,
            default_model_count: 10,
            show_histogram: false,
            show_scatter: false,
            show_data: true,
        }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No {} found, using default settings", path.display());
            return Ok(Config::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.histogram_bins, 80);
        assert_eq!(config.default_model_count, 10);
        assert!(config.show_data && !config.show_histogram && !config.show_scatter);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_path": "listings.parquet", "histogram_bins": 40}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("listings.parquet"));
        assert_eq!(config.histogram_bins, 40);
        assert_eq!(config.default_model_count, 10);
    }

    #[test]
    fn unknown_or_malformed_settings_fail() {
        let mut typo = tempfile::NamedTempFile::new().unwrap();
        write!(typo, r#"{{"histogram_bin": 40}}"#).unwrap();
        assert!(Config::load(typo.path()).is_err());

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{ not json").unwrap();
        assert!(Config::load(broken.path()).is_err());
    }
}
