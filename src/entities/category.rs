// 🏷️ Category Entity
// Lookup row from categories.csv, keyed by category_code.

use super::Keyed;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub category_code: String,
    pub category: String,
}

impl Category {
    pub fn new(category_code: &str, category: &str) -> Self {
        Category {
            category_code: category_code.to_string(),
            category: category.to_string(),
        }
    }
}

impl Keyed for Category {
    fn key(&self) -> &str {
        &self.category_code
    }
}
