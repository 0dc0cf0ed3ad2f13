// 🔎 Lookup Tables
// Keyed access to countries and categories for the joins.
//
// Keys are expected to be unique, but the table does not enforce it: a
// duplicated key yields every matching row, exactly as a relational join
// would. `duplicate_keys()` lets the quality report flag them.

use std::collections::HashMap;

/// A row that can be looked up by a string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct LookupTable<T: Keyed> {
    rows: Vec<T>,
    /// key -> positions in `rows`, in input order
    index: HashMap<String, Vec<usize>>,
}

impl<T: Keyed> LookupTable<T> {
    pub fn new(rows: Vec<T>) -> Self {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            index.entry(row.key().to_string()).or_default().push(i);
        }

        LookupTable { rows, index }
    }

    /// All rows matching `key`, in input order. Empty when the key is unknown.
    pub fn get<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a T> + 'a {
        self.index
            .get(key)
            .map(|positions| positions.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(move |&i| &self.rows[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keys that appear on more than one row, sorted.
    pub fn duplicate_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .index
            .iter()
            .filter(|(_, positions)| positions.len() > 1)
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}
