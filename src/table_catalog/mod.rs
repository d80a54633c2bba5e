pub mod config;
pub mod errors;
pub mod resolver;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;

pub use config::CatalogConfig;
pub use errors::TableCatalogError;
pub use resolver::{MappedTable, PredicateTableResolver};

/// Location service: which physical table stores a given predicate.
///
/// Lookups must be deterministic for the lifetime of a compilation.
pub trait TableLocator {
    fn table_for(&self, predicate: &str) -> Result<String, TableCatalogError>;

    fn subject_column(&self) -> &str {
        config::DEFAULT_SUBJECT_COLUMN
    }

    fn object_column(&self) -> &str {
        config::DEFAULT_OBJECT_COLUMN
    }
}

/// Predicate -> table catalog loaded from [`CatalogConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateTableMap {
    pub name: Option<String>,
    pub subject_column: String,
    pub object_column: String,
    pub map_table: Option<String>,
    pub so_table: Option<String>,
    tables: BTreeMap<String, String>,
}

impl PredicateTableMap {
    /// Catalog with default `s`/`o` columns and no auxiliary tables
    pub fn from_pairs<I, P, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        Self {
            name: None,
            subject_column: config::DEFAULT_SUBJECT_COLUMN.to_string(),
            object_column: config::DEFAULT_OBJECT_COLUMN.to_string(),
            map_table: None,
            so_table: None,
            tables: pairs
                .into_iter()
                .map(|(p, t)| (p.into(), t.into()))
                .collect(),
        }
    }

    /// Physical predicate tables, in predicate order
    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl TableLocator for PredicateTableMap {
    fn table_for(&self, predicate: &str) -> Result<String, TableCatalogError> {
        self.tables
            .get(predicate)
            .cloned()
            .ok_or_else(|| TableCatalogError::UnmappedPredicate {
                predicate: predicate.to_string(),
            })
    }

    fn subject_column(&self) -> &str {
        &self.subject_column
    }

    fn object_column(&self) -> &str {
        &self.object_column
    }
}
