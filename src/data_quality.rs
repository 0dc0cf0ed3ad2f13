// ✅ Data Quality Engine
// Makes the pipeline's silent filters visible.
//
// Inner joins drop businesses with unknown country or category codes on
// purpose. Nothing fails because of it, but the report lists every dropped
// row so a reader of the results knows what was left out. Countries no
// business references are listed too: they are what count_missing counts.

use crate::entities::{Business, Category, Country, Keyed, LookupTable};
use std::collections::HashSet;
use crate::loader::Dataset;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

// ============================================================================
// QUALITY ISSUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning, // Rows are dropped or results are skewed
    Info,    // Expected, but worth knowing
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub table: String,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

impl QualityIssue {
    fn warning(table: &str, field: &str, issue: String, recommendation: &str) -> Self {
        QualityIssue {
            severity: Severity::Warning,
            table: table.to_string(),
            field: field.to_string(),
            issue,
            recommendation: recommendation.to_string(),
        }
    }

    fn info(table: &str, field: &str, issue: String, recommendation: &str) -> Self {
        QualityIssue {
            severity: Severity::Info,
            table: table.to_string(),
            field: field.to_string(),
            issue,
            recommendation: recommendation.to_string(),
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub generated_at: DateTime<Utc>,
    pub businesses_checked: usize,
    /// businesses rows the country inner join drops
    pub dropped_by_country_join: usize,
    /// businesses rows the category inner join drops
    pub dropped_by_category_join: usize,
    pub duplicate_country_codes: Vec<String>,
    pub duplicate_category_codes: Vec<String>,
    /// country rows no business or new business references
    pub countries_without_businesses: usize,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "Checked {} businesses: {} dropped by country join, {} dropped by category join, {} countries without businesses, {} issues ({} warnings)",
            self.businesses_checked,
            self.dropped_by_country_join,
            self.dropped_by_category_join,
            self.countries_without_businesses,
            self.issues.len(),
            self.warning_count()
        )
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Emit every issue through `tracing`.
    pub fn log(&self) {
        for issue in &self.issues {
            match issue.severity {
                Severity::Warning => warn!(
                    table = %issue.table,
                    field = %issue.field,
                    "{}",
                    issue.issue
                ),
                Severity::Info => info!(
                    table = %issue.table,
                    field = %issue.field,
                    "{}",
                    issue.issue
                ),
            }
        }
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DataQualityEngine {
    /// Founding years after this produce negative ages in the charts
    reference_year: i32,
}

impl DataQualityEngine {
    pub fn new(reference_year: i32) -> Self {
        DataQualityEngine { reference_year }
    }

    pub fn check(&self, dataset: &Dataset) -> QualityReport {
        let mut issues = Vec::new();

        self.check_not_empty("countries", &dataset.countries, &mut issues);
        self.check_not_empty("categories", &dataset.categories, &mut issues);

        let dropped_by_country_join = self.check_unknown_countries(
            "businesses",
            &dataset.businesses,
            &dataset.countries,
            Severity::Warning,
            &mut issues,
        );
        // new_businesses only feed the outer join, so nothing is dropped
        self.check_unknown_countries(
            "new_businesses",
            &dataset.new_businesses,
            &dataset.countries,
            Severity::Info,
            &mut issues,
        );

        let dropped_by_category_join =
            self.check_unknown_categories(&dataset.businesses, &dataset.categories, &mut issues);

        let duplicate_country_codes =
            self.check_duplicates("countries", "country_code", &dataset.countries, &mut issues);
        let duplicate_category_codes =
            self.check_duplicates("categories", "category_code", &dataset.categories, &mut issues);

        let countries_without_businesses = self.check_unreferenced_countries(dataset, &mut issues);

        for (table, rows) in [
            ("businesses", &dataset.businesses),
            ("new_businesses", &dataset.new_businesses),
        ] {
            self.check_future_years(table, rows, &mut issues);
        }

        QualityReport {
            generated_at: Utc::now(),
            businesses_checked: dataset.businesses.len() + dataset.new_businesses.len(),
            dropped_by_country_join,
            dropped_by_category_join,
            duplicate_country_codes,
            duplicate_category_codes,
            countries_without_businesses,
            issues,
        }
    }

    fn check_not_empty<T: Keyed>(
        &self,
        table: &str,
        lookup: &LookupTable<T>,
        issues: &mut Vec<QualityIssue>,
    ) {
        if lookup.is_empty() {
            issues.push(QualityIssue::warning(
                table,
                "",
                format!("{} has no rows", table),
                "Every business is dropped by the inner join on this table",
            ));
        }
    }

    fn check_unknown_countries(
        &self,
        table: &str,
        businesses: &[Business],
        countries: &LookupTable<Country>,
        severity: Severity,
        issues: &mut Vec<QualityIssue>,
    ) -> usize {
        let mut unknown = 0;

        for business in businesses {
            if countries.contains(&business.country_code) {
                continue;
            }
            unknown += 1;

            let message = format!(
                "'{}' references unknown country_code '{}'",
                business.name, business.country_code
            );
            let issue = match severity {
                Severity::Warning => QualityIssue::warning(
                    table,
                    "country_code",
                    message,
                    "Row is excluded from continent results; add the country to countries.csv",
                ),
                Severity::Info => QualityIssue::info(
                    table,
                    "country_code",
                    message,
                    "Row does not mark any country as having businesses",
                ),
            };
            issues.push(issue);
        }

        unknown
    }

    fn check_unknown_categories(
        &self,
        businesses: &[Business],
        categories: &LookupTable<Category>,
        issues: &mut Vec<QualityIssue>,
    ) -> usize {
        let mut unknown = 0;

        for business in businesses {
            if !categories.contains(&business.category_code) {
                unknown += 1;
                issues.push(QualityIssue::warning(
                    "businesses",
                    "category_code",
                    format!(
                        "'{}' references unknown category_code '{}'",
                        business.name, business.category_code
                    ),
                    "Row is excluded from continent/category results; add the category to categories.csv",
                ));
            }
        }

        unknown
    }

    fn check_duplicates<T: Keyed>(
        &self,
        table: &str,
        field: &str,
        lookup: &LookupTable<T>,
        issues: &mut Vec<QualityIssue>,
    ) -> Vec<String> {
        let duplicates = lookup.duplicate_keys();

        for key in &duplicates {
            issues.push(QualityIssue::warning(
                table,
                field,
                format!("{} '{}' appears more than once", field, key),
                "Joins repeat businesses once per duplicate row; keep one row per key",
            ));
        }

        duplicates
    }

    fn check_unreferenced_countries(
        &self,
        dataset: &Dataset,
        issues: &mut Vec<QualityIssue>,
    ) -> usize {
        let referenced: HashSet<&str> = dataset
            .all_businesses()
            .map(|b| b.country_code.as_str())
            .collect();

        let mut unreferenced = 0;
        for country in dataset.countries.rows() {
            if referenced.contains(country.key()) {
                continue;
            }
            unreferenced += 1;
            issues.push(QualityIssue::info(
                "countries",
                "country_code",
                format!(
                    "{} ('{}', {}) has no recorded business",
                    country.country, country.country_code, country.continent
                ),
                "Counted in count_missing for its continent",
            ));
        }

        unreferenced
    }

    fn check_future_years(&self, table: &str, businesses: &[Business], issues: &mut Vec<QualityIssue>) {
        for business in businesses {
            if business.year_founded > self.reference_year {
                issues.push(QualityIssue::warning(
                    table,
                    "year_founded",
                    format!(
                        "'{}' founded in {}, after reference year {}",
                        business.name, business.year_founded, self.reference_year
                    ),
                    "Business age will be negative",
                ));
            }
        }
    }
}
