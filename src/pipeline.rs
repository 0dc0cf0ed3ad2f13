// 🔗 Tabular Transformation Pipeline
// Joins and group-by-minimum aggregations producing the three result tables.
//
// Join policy:
// - Inner joins (country, category) drop businesses whose code has no
//   lookup row. This is an intentional filter, not an error; the quality
//   report lists the dropped rows.
// - The missing-business count uses an outer join: countries no business
//   references survive the join with an empty business side, and those are
//   exactly the rows being counted.
//
// - An empty CSV field is a missing value. Rows whose grouping key
//   (continent, category) is missing belong to no group and never reach an
//   output table. A business row with a missing name counts as an absent
//   business in the missing-business count.
//
// Output ordering is deterministic so re-running on the same inputs writes
// byte-identical files.

use crate::entities::{
    Business, CategorizedBusiness, Category, Country, EnrichedBusiness, LookupTable,
    MissingCount, OldestBusiness, OldestByCategory,
};
use crate::loader::Dataset;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

// ============================================================================
// JOINS
// ============================================================================

/// Inner join of businesses with countries on country_code.
///
/// Keeps business input order. A duplicated country_code yields one row per
/// matching country.
pub fn join_countries(
    businesses: &[Business],
    countries: &LookupTable<Country>,
) -> Vec<EnrichedBusiness> {
    businesses
        .iter()
        .flat_map(|business| {
            countries
                .get(&business.country_code)
                .map(move |country| EnrichedBusiness::join(business, country))
        })
        .collect()
}

/// Inner join with categories on category_code, then with countries on
/// country_code.
pub fn join_categories_and_countries(
    businesses: &[Business],
    categories: &LookupTable<Category>,
    countries: &LookupTable<Country>,
) -> Vec<CategorizedBusiness> {
    businesses
        .iter()
        .flat_map(move |business| {
            categories
                .get(&business.category_code)
                .flat_map(move |category| {
                    countries
                        .get(&business.country_code)
                        .map(move |country| CategorizedBusiness::join(business, category, country))
                })
        })
        .collect()
}

// ============================================================================
// AGGREGATIONS
// ============================================================================

/// Oldest business(es) on each continent.
///
/// Per continent the minimum year_founded is computed, then every business
/// founded in that year is recovered (back-join on continent + year). Ties
/// are all kept. Businesses in a country with a missing continent are not
/// grouped and never appear. Rows are ordered by year_founded, then
/// continent, then business name.
pub fn oldest_business_per_continent(
    businesses: &[Business],
    countries: &LookupTable<Country>,
) -> Vec<OldestBusiness> {
    let enriched = join_countries(businesses, countries);

    let mut minima: BTreeMap<&str, i32> = BTreeMap::new();
    for row in enriched.iter().filter(|row| !is_missing(&row.continent)) {
        minima
            .entry(row.continent.as_str())
            .and_modify(|year| *year = (*year).min(row.year_founded))
            .or_insert(row.year_founded);
    }

    let mut oldest: Vec<OldestBusiness> = enriched
        .iter()
        .filter(|row| minima.get(row.continent.as_str()) == Some(&row.year_founded))
        .map(|row| OldestBusiness {
            business: row.name.clone(),
            year_founded: row.year_founded,
            country: row.country.clone(),
            continent: row.continent.clone(),
        })
        .collect();

    oldest.sort_by(|a, b| {
        a.year_founded
            .cmp(&b.year_founded)
            .then_with(|| a.continent.cmp(&b.continent))
            .then_with(|| a.business.cmp(&b.business))
    });

    oldest
}

/// Number of countries per continent that no business references.
///
/// `businesses` and `new_businesses` are concatenated and outer-joined with
/// the countries. A joined row has an absent business when the country has
/// no matching business at all, or when the matching business has a missing
/// name. Those rows are grouped by continent (missing continents are
/// skipped) and counted, except that rows with a missing country name are
/// not counted: their continent still appears, possibly with zero.
///
/// Countries are counted per lookup row, so a duplicated unreferenced
/// country_code counts once per row. Continents without absent rows do not
/// appear. Ordered by continent.
pub fn count_missing_per_continent(
    businesses: &[Business],
    new_businesses: &[Business],
    countries: &LookupTable<Country>,
) -> Vec<MissingCount> {
    let mut by_country: HashMap<&str, Vec<&Business>> = HashMap::new();
    for business in businesses.iter().chain(new_businesses.iter()) {
        by_country
            .entry(business.country_code.as_str())
            .or_default()
            .push(business);
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for country in countries.rows() {
        if is_missing(&country.continent) {
            continue;
        }

        let absent_rows = match by_country.get(country.country_code.as_str()) {
            None => 1,
            Some(matched) => matched.iter().filter(|b| is_missing(&b.name)).count(),
        };
        if absent_rows == 0 {
            continue;
        }

        let counted = if is_missing(&country.country) { 0 } else { absent_rows };
        *counts.entry(country.continent.as_str()).or_insert(0) += counted;
    }

    counts
        .into_iter()
        .map(|(continent, count)| MissingCount {
            continent: continent.to_string(),
            countries_without_businesses: count,
        })
        .collect()
}

/// Oldest founding year per (continent, category) pair.
///
/// Only the grouping keys and the minimum year survive; the business behind
/// the minimum is not recovered. Pairs with a missing continent or category
/// are skipped. Ordered by continent, then category.
pub fn oldest_by_continent_category(
    businesses: &[Business],
    categories: &LookupTable<Category>,
    countries: &LookupTable<Country>,
) -> Vec<OldestByCategory> {
    let joined = join_categories_and_countries(businesses, categories, countries);

    let mut minima: BTreeMap<(&str, &str), i32> = BTreeMap::new();
    for row in joined
        .iter()
        .filter(|row| !is_missing(&row.continent) && !is_missing(&row.category))
    {
        minima
            .entry((row.continent.as_str(), row.category.as_str()))
            .and_modify(|year| *year = (*year).min(row.year_founded))
            .or_insert(row.year_founded);
    }

    minima
        .into_iter()
        .map(|((continent, category), year)| OldestByCategory::new(continent, category, year))
        .collect()
}

/// Empty CSV fields are missing values.
fn is_missing(field: &str) -> bool {
    field.is_empty()
}

// ============================================================================
// PIPELINE
// ============================================================================

/// The three result tables of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub oldest_business_continent: Vec<OldestBusiness>,
    pub count_missing: Vec<MissingCount>,
    pub oldest_by_continent_category: Vec<OldestByCategory>,
}

impl PipelineOutput {
    /// Total of `countries_without_businesses` across continents.
    pub fn total_missing(&self) -> usize {
        self.count_missing
            .iter()
            .map(|row| row.countries_without_businesses)
            .sum()
    }
}

/// Compute all three result tables from one dataset.
pub fn run(dataset: &Dataset) -> PipelineOutput {
    info!(
        businesses = dataset.businesses.len(),
        new_businesses = dataset.new_businesses.len(),
        countries = dataset.countries.len(),
        categories = dataset.categories.len(),
        "running pipeline"
    );

    let oldest_business_continent =
        oldest_business_per_continent(&dataset.businesses, &dataset.countries);
    debug!(rows = oldest_business_continent.len(), "oldest business per continent");

    let count_missing = count_missing_per_continent(
        &dataset.businesses,
        &dataset.new_businesses,
        &dataset.countries,
    );
    debug!(rows = count_missing.len(), "countries without businesses");

    let oldest_by_continent_category = oldest_by_continent_category(
        &dataset.businesses,
        &dataset.categories,
        &dataset.countries,
    );
    debug!(rows = oldest_by_continent_category.len(), "oldest by continent and category");

    PipelineOutput {
        oldest_business_continent,
        count_missing,
        oldest_by_continent_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries(rows: &[(&str, &str, &str)]) -> LookupTable<Country> {
        LookupTable::new(rows.iter().map(|(c, n, k)| Country::new(c, n, k)).collect())
    }

    fn categories(rows: &[(&str, &str)]) -> LookupTable<Category> {
        LookupTable::new(rows.iter().map(|(c, n)| Category::new(c, n)).collect())
    }

    fn sample_dataset() -> Dataset {
        Dataset::new(
            vec![
                Business::new("Kongō Gumi", 578, "CON", "JPN"),
                Business::new("Nishiyama Onsen Keiunkan", 705, "HOT", "JPN"),
                Business::new("Staffelter Hof", 862, "BAR", "DEU"),
                Business::new("St. Peter Stifts Kulinarium", 803, "CAF", "AUT"),
                Business::new("Shirley Plantation", 1638, "AGR", "USA"),
                Business::new("Orphan Co", 1900, "UNK", "USA"),
                Business::new("Nowhere Ltd", 1700, "CAF", "ZZZ"),
            ],
            vec![Business::new("Newcomer", 2020, "CAF", "BRA")],
            vec![
                Country::new("JPN", "Japan", "Asia"),
                Country::new("DEU", "Germany", "Europe"),
                Country::new("AUT", "Austria", "Europe"),
                Country::new("USA", "United States", "North America"),
                Country::new("BRA", "Brazil", "South America"),
                Country::new("ARG", "Argentina", "South America"),
                Country::new("FRA", "France", "Europe"),
                Country::new("CAN", "Canada", "North America"),
            ],
            vec![
                Category::new("CON", "Construction"),
                Category::new("HOT", "Hotels"),
                Category::new("BAR", "Bars"),
                Category::new("CAF", "Cafés"),
                Category::new("AGR", "Agriculture"),
            ],
        )
    }

    #[test]
    fn test_join_countries_drops_unknown_codes() {
        let dataset = sample_dataset();
        let enriched = join_countries(&dataset.businesses, &dataset.countries);

        assert_eq!(enriched.len(), 6);
        assert!(enriched.iter().all(|row| row.name != "Nowhere Ltd"));
        assert_eq!(enriched[0].continent, "Asia");
    }

    #[test]
    fn test_oldest_business_per_continent() {
        let dataset = sample_dataset();
        let oldest = oldest_business_per_continent(&dataset.businesses, &dataset.countries);

        let expected = vec![
            OldestBusiness {
                business: "Kongō Gumi".to_string(),
                year_founded: 578,
                country: "Japan".to_string(),
                continent: "Asia".to_string(),
            },
            OldestBusiness {
                business: "St. Peter Stifts Kulinarium".to_string(),
                year_founded: 803,
                country: "Austria".to_string(),
                continent: "Europe".to_string(),
            },
            OldestBusiness {
                business: "Shirley Plantation".to_string(),
                year_founded: 1638,
                country: "United States".to_string(),
                continent: "North America".to_string(),
            },
        ];
        assert_eq!(oldest, expected);
    }

    #[test]
    fn test_oldest_business_ties_are_all_kept() {
        let countries = countries(&[("FR", "France", "EU"), ("DE", "Germany", "EU")]);
        let businesses = vec![
            Business::new("Zeta", 1500, "c", "FR"),
            Business::new("Alpha", 1500, "c", "DE"),
            Business::new("Young", 1900, "c", "DE"),
        ];

        let oldest = oldest_business_per_continent(&businesses, &countries);

        let names: Vec<&str> = oldest.iter().map(|row| row.business.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
        assert!(oldest.iter().all(|row| row.year_founded == 1500));
    }

    #[test]
    fn test_oldest_year_is_true_minimum_per_continent() {
        let dataset = sample_dataset();
        let oldest = oldest_business_per_continent(&dataset.businesses, &dataset.countries);
        let enriched = join_countries(&dataset.businesses, &dataset.countries);

        for row in &oldest {
            let true_min = enriched
                .iter()
                .filter(|e| e.continent == row.continent)
                .map(|e| e.year_founded)
                .min()
                .unwrap();
            assert_eq!(row.year_founded, true_min);
        }
    }

    #[test]
    fn test_count_missing_example() {
        let countries = countries(&[("US", "USA", "NA"), ("DE", "Germany", "EU")]);
        let businesses = vec![Business::new("A", 1900, "cat1", "US")];

        let missing = count_missing_per_continent(&businesses, &[], &countries);

        assert_eq!(
            missing,
            vec![MissingCount {
                continent: "EU".to_string(),
                countries_without_businesses: 1,
            }]
        );
    }

    #[test]
    fn test_count_missing_includes_new_businesses() {
        let dataset = sample_dataset();
        let output = run(&dataset);

        // Brazil is only referenced by new_businesses; Argentina, France and
        // Canada are never referenced.
        let expected = vec![
            MissingCount {
                continent: "Europe".to_string(),
                countries_without_businesses: 1,
            },
            MissingCount {
                continent: "North America".to_string(),
                countries_without_businesses: 1,
            },
            MissingCount {
                continent: "South America".to_string(),
                countries_without_businesses: 1,
            },
        ];
        assert_eq!(output.count_missing, expected);
        assert_eq!(output.total_missing(), 3);
    }

    #[test]
    fn test_count_missing_sum_equals_unreferenced_countries() {
        let dataset = sample_dataset();
        let missing = count_missing_per_continent(
            &dataset.businesses,
            &dataset.new_businesses,
            &dataset.countries,
        );

        let unreferenced = dataset
            .countries
            .rows()
            .iter()
            .filter(|c| dataset.all_businesses().all(|b| b.country_code != c.country_code))
            .count();

        let total: usize = missing.iter().map(|row| row.countries_without_businesses).sum();
        assert_eq!(total, unreferenced);
    }

    #[test]
    fn test_oldest_by_continent_category_example() {
        let businesses = vec![
            Business::new("A", 1850, "cat1", "US"),
            Business::new("B", 1820, "cat1", "FR"),
        ];
        let countries = countries(&[("US", "USA", "NA"), ("FR", "France", "EU")]);
        let categories = categories(&[("cat1", "Food")]);

        let oldest = oldest_by_continent_category(&businesses, &categories, &countries);

        // ordered by continent
        assert_eq!(
            oldest,
            vec![
                OldestByCategory::new("EU", "Food", 1820),
                OldestByCategory::new("NA", "Food", 1850),
            ]
        );
    }

    #[test]
    fn test_oldest_by_continent_category_takes_minimum_and_drops_unmatched() {
        let dataset = sample_dataset();
        let oldest = oldest_by_continent_category(
            &dataset.businesses,
            &dataset.categories,
            &dataset.countries,
        );

        assert_eq!(
            oldest,
            vec![
                OldestByCategory::new("Asia", "Construction", 578),
                OldestByCategory::new("Asia", "Hotels", 705),
                OldestByCategory::new("Europe", "Bars", 862),
                OldestByCategory::new("Europe", "Cafés", 803),
                OldestByCategory::new("North America", "Agriculture", 1638),
            ]
        );
    }

    #[test]
    fn test_missing_continent_is_never_a_group() {
        let countries = countries(&[
            ("US", "USA", "NA"),
            ("XX", "Nowhere", ""),
            ("YY", "Blank", ""),
        ]);
        let categories = categories(&[("cat1", "Food")]);
        let businesses = vec![
            Business::new("A", 1900, "cat1", "US"),
            Business::new("B", 1800, "cat1", "XX"),
        ];

        let oldest = oldest_business_per_continent(&businesses, &countries);
        assert_eq!(
            oldest,
            vec![OldestBusiness {
                business: "A".to_string(),
                year_founded: 1900,
                country: "USA".to_string(),
                continent: "NA".to_string(),
            }]
        );

        // YY is unreferenced but has no continent to be counted under
        assert!(count_missing_per_continent(&businesses, &[], &countries).is_empty());

        assert_eq!(
            oldest_by_continent_category(&businesses, &categories, &countries),
            vec![OldestByCategory::new("NA", "Food", 1900)]
        );
    }

    #[test]
    fn test_missing_category_name_is_never_a_group() {
        let countries = countries(&[("US", "USA", "NA")]);
        let categories = categories(&[("cat1", "Food"), ("cat2", "")]);
        let businesses = vec![
            Business::new("A", 1900, "cat1", "US"),
            Business::new("B", 1800, "cat2", "US"),
        ];

        assert_eq!(
            oldest_by_continent_category(&businesses, &categories, &countries),
            vec![OldestByCategory::new("NA", "Food", 1900)]
        );
    }

    #[test]
    fn test_business_without_name_counts_as_absent() {
        let countries = countries(&[("US", "USA", "NA"), ("CA", "Canada", "NA")]);
        let businesses = vec![
            Business::new("", 1900, "cat1", "US"),
            Business::new("", 1910, "cat1", "US"),
            Business::new("Named", 1920, "cat1", "CA"),
        ];

        let missing = count_missing_per_continent(&businesses, &[], &countries);

        // both unnamed US rows are absent businesses; Canada is covered
        assert_eq!(
            missing,
            vec![MissingCount {
                continent: "NA".to_string(),
                countries_without_businesses: 2,
            }]
        );
    }

    #[test]
    fn test_country_without_name_keeps_group_but_is_not_counted() {
        let countries = countries(&[
            ("US", "USA", "NA"),
            ("ZZ", "", "EU"),
            ("DE", "Germany", "EU"),
            ("QQ", "", "OC"),
        ]);
        let businesses = vec![Business::new("A", 1900, "cat1", "US")];

        let missing = count_missing_per_continent(&businesses, &[], &countries);

        assert_eq!(
            missing,
            vec![
                MissingCount {
                    continent: "EU".to_string(),
                    countries_without_businesses: 1,
                },
                MissingCount {
                    continent: "OC".to_string(),
                    countries_without_businesses: 0,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_country_codes_join_once_per_row() {
        let countries = countries(&[
            ("US", "USA", "NA"),
            ("US", "USA2", "NA"),
            ("DE", "Germany", "EU"),
            ("DE", "Germany2", "EU"),
        ]);
        let businesses = vec![Business::new("A", 1900, "cat1", "US")];

        let oldest = oldest_business_per_continent(&businesses, &countries);
        let joined: Vec<&str> = oldest.iter().map(|row| row.country.as_str()).collect();
        assert_eq!(joined, vec!["USA", "USA2"]);

        let missing = count_missing_per_continent(&businesses, &[], &countries);
        assert_eq!(
            missing,
            vec![MissingCount {
                continent: "EU".to_string(),
                countries_without_businesses: 2,
            }]
        );
    }

    #[test]
    fn test_duplicate_category_codes_join_once_per_row() {
        let countries = countries(&[("US", "USA", "NA")]);
        let categories = categories(&[("cat1", "Food"), ("cat1", "Drink")]);
        let businesses = vec![Business::new("A", 1900, "cat1", "US")];

        let joined = join_categories_and_countries(&businesses, &categories, &countries);
        assert_eq!(joined.len(), 2);

        assert_eq!(
            oldest_by_continent_category(&businesses, &categories, &countries),
            vec![
                OldestByCategory::new("NA", "Drink", 1900),
                OldestByCategory::new("NA", "Food", 1900),
            ]
        );
    }

    #[test]
    fn test_run_is_deterministic() {
        let dataset = sample_dataset();
        assert_eq!(run(&dataset), run(&dataset));
    }
}
