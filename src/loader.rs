// 📂 CSV Loader
// Reads the four input tables. Any missing, unreadable or malformed file is
// fatal: the whole run aborts before a single result is written.

use crate::config::{
    PipelineConfig, BUSINESSES_FILE, CATEGORIES_FILE, COUNTRIES_FILE, NEW_BUSINESSES_FILE,
};
use crate::entities::{Business, Category, Country, LookupTable};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// The four input tables, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub businesses: Vec<Business>,
    pub new_businesses: Vec<Business>,
    pub countries: LookupTable<Country>,
    pub categories: LookupTable<Category>,
}

impl Dataset {
    pub fn new(
        businesses: Vec<Business>,
        new_businesses: Vec<Business>,
        countries: Vec<Country>,
        categories: Vec<Category>,
    ) -> Self {
        Dataset {
            businesses,
            new_businesses,
            countries: LookupTable::new(countries),
            categories: LookupTable::new(categories),
        }
    }

    /// Load all four tables from `config.data_dir`.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let businesses = load_csv(&config.input_path(BUSINESSES_FILE))?;
        let new_businesses = load_csv(&config.input_path(NEW_BUSINESSES_FILE))?;
        let countries = load_csv(&config.input_path(COUNTRIES_FILE))?;
        let categories = load_csv(&config.input_path(CATEGORIES_FILE))?;

        Ok(Dataset::new(businesses, new_businesses, countries, categories))
    }

    /// businesses followed by new_businesses
    pub fn all_businesses(&self) -> impl Iterator<Item = &Business> {
        self.businesses.iter().chain(self.new_businesses.iter())
    }
}

/// Deserialize every row of a headered CSV file.
pub fn load_csv<T: DeserializeOwned>(csv_path: &Path) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        // +2: header line, 1-based
        let row: T = result.with_context(|| {
            format!("Failed to deserialize {} line {}", csv_path.display(), i + 2)
        })?;
        rows.push(row);
    }

    debug!(path = %csv_path.display(), rows = rows.len(), "loaded table");

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_inputs(dir: &Path) {
        fs::write(
            dir.join(BUSINESSES_FILE),
            "business,year_founded,category_code,country_code\nA,1850,cat1,US\nB,1820,cat1,FR\n",
        )
        .unwrap();
        fs::write(
            dir.join(NEW_BUSINESSES_FILE),
            "business,year_founded,category_code,country_code\nC,1990,cat1,US\n",
        )
        .unwrap();
        fs::write(
            dir.join(COUNTRIES_FILE),
            "country_code,country,continent\nUS,USA,North America\nFR,France,Europe\n",
        )
        .unwrap();
        fs::write(dir.join(CATEGORIES_FILE), "category_code,category\ncat1,Food\n").unwrap();
    }

    #[test]
    fn test_load_dataset() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        let config = PipelineConfig::default().with_data_dir(tmp.path());

        let dataset = Dataset::load(&config).unwrap();

        assert_eq!(dataset.businesses.len(), 2);
        assert_eq!(dataset.new_businesses.len(), 1);
        assert_eq!(dataset.countries.len(), 2);
        assert_eq!(dataset.categories.len(), 1);
        assert_eq!(dataset.all_businesses().count(), 3);
        assert_eq!(dataset.businesses[1], Business::new("B", 1820, "cat1", "FR"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let tmp = TempDir::new().unwrap();
        write_inputs(tmp.path());
        fs::remove_file(tmp.path().join(CATEGORIES_FILE)).unwrap();
        let config = PipelineConfig::default().with_data_dir(tmp.path());

        let err = Dataset::load(&config).unwrap_err();

        assert!(format!("{:#}", err).contains(CATEGORIES_FILE));
    }

    #[test]
    fn test_malformed_year_reports_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(BUSINESSES_FILE);
        fs::write(
            &path,
            "business,year_founded,category_code,country_code\nA,1850,cat1,US\nB,long ago,cat1,FR\n",
        )
        .unwrap();

        let err = load_csv::<Business>(&path).unwrap_err();

        assert!(err.to_string().contains("line 3"));
    }
}
