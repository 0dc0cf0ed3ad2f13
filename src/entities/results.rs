// 📊 Result Tables
// Rows of the three derived tables. Field order is the CSV column order,
// with the index column(s) first.

use serde::Serialize;

/// Row of `oldest_business_continent.csv` (index: business).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OldestBusiness {
    pub business: String,
    pub year_founded: i32,
    pub country: String,
    pub continent: String,
}

/// Row of `count_missing.csv` (index: continent).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub continent: String,
    pub countries_without_businesses: usize,
}

/// Row of `oldest_by_continent_category.csv` (index: continent, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OldestByCategory {
    pub continent: String,
    pub category: String,
    pub year_founded: i32,
}

impl OldestByCategory {
    pub fn new(continent: &str, category: &str, year_founded: i32) -> Self {
        OldestByCategory {
            continent: continent.to_string(),
            category: category.to_string(),
            year_founded,
        }
    }

    /// Age of the oldest business in this pair relative to `reference_year`.
    pub fn business_age(&self, reference_year: i32) -> i32 {
        reference_year - self.year_founded
    }
}
