//! Predicate table catalog configuration.
//!
//! The store keeps one two-column table per predicate. The catalog tells the
//! compiler which table holds which predicate:
//!
//! ```yaml
//! name: dublin_core          # Optional catalog name
//! subject_column: s          # Column holding subjects (default: s)
//! object_column: o           # Column holding objects (default: o)
//! map_table: tmap            # Predicate -> table map table (teardown only)
//! so_table: tso              # Subject/object lookup table (teardown only)
//! predicates:
//!   "<http://purl.org/dc/elements/1.1/title>": t1
//!   "<http://purl.org/dc/elements/1.1/creator>": t2
//! ```
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::errors::TableCatalogError;
use super::PredicateTableMap;
use crate::sql_generator::common::is_plain_identifier;

pub const DEFAULT_SUBJECT_COLUMN: &str = "s";
pub const DEFAULT_OBJECT_COLUMN: &str = "o";

fn default_subject_column() -> String {
    DEFAULT_SUBJECT_COLUMN.to_string()
}

fn default_object_column() -> String {
    DEFAULT_OBJECT_COLUMN.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_subject_column")]
    pub subject_column: String,
    #[serde(default = "default_object_column")]
    pub object_column: String,
    #[serde(default)]
    pub map_table: Option<String>,
    #[serde(default)]
    pub so_table: Option<String>,
    /// Stored predicate term -> physical table name
    #[serde(default)]
    pub predicates: BTreeMap<String, String>,
}

impl CatalogConfig {
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, TableCatalogError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| TableCatalogError::ConfigReadError {
            error: format!("{}: {}", path.display(), e),
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, TableCatalogError> {
        serde_yaml::from_str(yaml).map_err(|e| TableCatalogError::ConfigParseError {
            error: e.to_string(),
        })
    }

    /// Structural validation: identifiers are plain and no table serves two predicates
    pub fn validate(&self) -> Result<(), TableCatalogError> {
        check_identifier("subject column", &self.subject_column)?;
        check_identifier("object column", &self.object_column)?;
        if self.subject_column == self.object_column {
            return Err(TableCatalogError::InvalidConfig {
                message: format!(
                    "subject and object columns must differ (both are `{}`)",
                    self.subject_column
                ),
            });
        }
        if let Some(table) = &self.map_table {
            check_identifier("map table", table)?;
        }
        if let Some(table) = &self.so_table {
            check_identifier("subject/object table", table)?;
        }

        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (predicate, table) in &self.predicates {
            if predicate.trim().is_empty() {
                return Err(TableCatalogError::InvalidConfig {
                    message: "predicate keys cannot be empty".to_string(),
                });
            }
            check_identifier("table", table)?;
            if let Some(first) = owners.insert(table.as_str(), predicate.as_str()) {
                return Err(TableCatalogError::DuplicateTable {
                    table: table.clone(),
                    first: first.to_string(),
                    second: predicate.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate and convert into the lookup structure used by the compiler
    pub fn to_table_map(&self) -> Result<PredicateTableMap, TableCatalogError> {
        self.validate()?;

        Ok(PredicateTableMap {
            name: self.name.clone(),
            subject_column: self.subject_column.clone(),
            object_column: self.object_column.clone(),
            map_table: self.map_table.clone(),
            so_table: self.so_table.clone(),
            tables: self.predicates.clone(),
        })
    }
}

fn check_identifier(kind: &str, name: &str) -> Result<(), TableCatalogError> {
    if is_plain_identifier(name) {
        Ok(())
    } else {
        Err(TableCatalogError::InvalidIdentifier {
            kind: kind.to_string(),
            name: name.to_string(),
        })
    }
}
