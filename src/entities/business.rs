// 🏢 Business Entity
// One row of businesses.csv / new_businesses.csv, plus the shapes it takes
// after the country and category joins.

use super::{Category, Country};
use serde::Deserialize;

// ============================================================================
// BUSINESS (input row)
// ============================================================================

/// A business as recorded in the input files.
///
/// Both `businesses.csv` and `new_businesses.csv` share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Business {
    #[serde(rename = "business")]
    pub name: String,

    pub year_founded: i32,

    pub category_code: String,

    pub country_code: String,
}

impl Business {
    pub fn new(name: &str, year_founded: i32, category_code: &str, country_code: &str) -> Self {
        Business {
            name: name.to_string(),
            year_founded,
            category_code: category_code.to_string(),
            country_code: country_code.to_string(),
        }
    }
}

// ============================================================================
// JOINED SHAPES
// ============================================================================

/// Business joined with its country (inner join on country_code).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedBusiness {
    pub name: String,
    pub year_founded: i32,
    pub category_code: String,
    pub country_code: String,
    pub country: String,
    pub continent: String,
}

impl EnrichedBusiness {
    pub fn join(business: &Business, country: &Country) -> Self {
        EnrichedBusiness {
            name: business.name.clone(),
            year_founded: business.year_founded,
            category_code: business.category_code.clone(),
            country_code: business.country_code.clone(),
            country: country.country.clone(),
            continent: country.continent.clone(),
        }
    }
}

/// Business joined with both its category and its country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedBusiness {
    pub name: String,
    pub year_founded: i32,
    pub category: String,
    pub country: String,
    pub continent: String,
}

impl CategorizedBusiness {
    pub fn join(business: &Business, category: &Category, country: &Country) -> Self {
        CategorizedBusiness {
            name: business.name.clone(),
            year_founded: business.year_founded,
            category: category.category.clone(),
            country: country.country.clone(),
            continent: country.continent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorized_join_takes_category_name() {
        let business = Business::new("Kongō Gumi", 578, "CON", "JPN");
        let category = Category::new("CON", "Construction");
        let country = Country::new("JPN", "Japan", "Asia");

        let joined = CategorizedBusiness::join(&business, &category, &country);

        assert_eq!(joined.category, "Construction");
        assert_eq!(joined.continent, "Asia");
        assert_eq!(joined.year_founded, 578);
    }

    #[test]
    fn test_enriched_join_copies_country_fields() {
        let business = Business::new("Staffelter Hof", 862, "BAR", "DEU");
        let country = Country::new("DEU", "Germany", "Europe");

        let enriched = EnrichedBusiness::join(&business, &country);

        assert_eq!(enriched.name, "Staffelter Hof");
        assert_eq!(enriched.country, "Germany");
        assert_eq!(enriched.continent, "Europe");
        assert_eq!(enriched.category_code, "BAR");
    }

    #[test]
    fn test_deserialize_from_csv_header() {
        let data = "business,year_founded,category_code,country_code\nA,1850,cat1,US\n";
        let mut rdr = csv::Reader::from_reader(data.as_bytes());
        let rows: Vec<Business> = rdr.deserialize().collect::<Result<_, _>>().unwrap();

        assert_eq!(rows, vec![Business::new("A", 1850, "cat1", "US")]);
    }
}
