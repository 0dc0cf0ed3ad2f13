// ⚙️ Pipeline Configuration
// Where inputs live, where results go, and the reference year used for
// business ages. Defaults reproduce the fixed layout:
//
//   data/businesses.csv, data/new_businesses.csv,
//   data/countries.csv,  data/categories.csv  →  ./<result>.csv

use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const BUSINESSES_FILE: &str = "businesses.csv";
pub const NEW_BUSINESSES_FILE: &str = "new_businesses.csv";
pub const COUNTRIES_FILE: &str = "countries.csv";
pub const CATEGORIES_FILE: &str = "categories.csv";

pub const OLDEST_BUSINESS_CONTINENT_FILE: &str = "oldest_business_continent.csv";
pub const COUNT_MISSING_FILE: &str = "count_missing.csv";
pub const OLDEST_BY_CONTINENT_CATEGORY_FILE: &str = "oldest_by_continent_category.csv";

/// Year business ages are measured against.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2024;

pub const ENV_DATA_DIR: &str = "BUSINESSES_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "BUSINESSES_OUTPUT_DIR";
pub const ENV_REFERENCE_YEAR: &str = "BUSINESSES_REFERENCE_YEAR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub reference_year: i32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("."),
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `BUSINESSES_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PipelineConfig::default();

        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(year) = lookup(ENV_REFERENCE_YEAR) {
            config.reference_year = year
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_REFERENCE_YEAR, year))?;
        }

        Ok(config)
    }

    /// Builder pattern: read inputs from `dir`
    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Builder pattern: write results to `dir`
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = year;
        self
    }

    pub fn input_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_fixed_layout() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_path(BUSINESSES_FILE), PathBuf::from("data/businesses.csv"));
        assert_eq!(config.output_path(COUNT_MISSING_FILE), PathBuf::from("./count_missing.csv"));
        assert_eq!(config.reference_year, 2024);
    }

    #[test]
    fn test_overrides_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_DATA_DIR, "/tmp/in"),
            (ENV_OUTPUT_DIR, "/tmp/out"),
            (ENV_REFERENCE_YEAR, " 2030 "),
        ]);

        let config = PipelineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/in"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.reference_year, 2030);
    }

    #[test]
    fn test_invalid_reference_year_is_error() {
        let result = PipelineConfig::from_lookup(|k| {
            (k == ENV_REFERENCE_YEAR).then(|| "next year".to_string())
        });

        let err = result.unwrap_err();
        assert!(err.to_string().contains(ENV_REFERENCE_YEAR));
    }
}
