// 🌍 Country Entity
// Lookup row from countries.csv, keyed by country_code.

use super::Keyed;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Country {
    pub country_code: String,
    pub country: String,
    pub continent: String,
}

impl Country {
    pub fn new(country_code: &str, country: &str, continent: &str) -> Self {
        Country {
            country_code: country_code.to_string(),
            country: country.to_string(),
            continent: continent.to_string(),
        }
    }
}

impl Keyed for Country {
    fn key(&self) -> &str {
        &self.country_code
    }
}
