use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::errors::TableCatalogError;
use super::TableLocator;
use crate::query_model::Node;
use crate::sql_generator::common::quote_identifier;

/// A concrete table reference with an alias unique within one compilation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappedTable {
    pub name: String,
    pub alias: String,
}

impl MappedTable {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: alias.into(),
        }
    }

    /// FROM-clause form: `name`, or `name AS alias` when they differ
    pub fn declaration(&self) -> String {
        if self.name == self.alias {
            quote_identifier(&self.name)
        } else {
            format!(
                "{} AS {}",
                quote_identifier(&self.name),
                quote_identifier(&self.alias)
            )
        }
    }
}

/// Maps constant predicates to tables and numbers repeated uses for self-joins.
///
/// The first resolution of a predicate is aliased with the bare table name,
/// later ones get `_1`, `_2`, ... suffixes. Counters belong to a single
/// compilation; call [`reset`](Self::reset) before reusing the resolver.
pub struct PredicateTableResolver<'a> {
    locator: &'a dyn TableLocator,
    issued: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl<'a> PredicateTableResolver<'a> {
    pub fn new(locator: &'a dyn TableLocator) -> Self {
        Self {
            locator,
            issued: HashMap::new(),
            taken: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, predicate: &Node) -> Result<MappedTable, TableCatalogError> {
        let value = match predicate {
            Node::Constant(value) => value,
            Node::Variable(_) => {
                return Err(TableCatalogError::PredicateNotConstant {
                    predicate: predicate.to_string(),
                })
            }
        };

        let table = self.locator.table_for(value)?;
        let count = self.issued.entry(value.clone()).or_insert(0);
        let mut alias = if *count == 0 {
            table.clone()
        } else {
            format!("{}_{}", table, count)
        };
        // A numbered alias may coincide with another predicate's table name
        while self.taken.contains(&alias) {
            *count += 1;
            alias = format!("{}_{}", table, count);
        }
        *count += 1;
        self.taken.insert(alias.clone());

        log::debug!("Mapped predicate {} to {} AS {}", value, table, alias);
        Ok(MappedTable::new(table, alias))
    }

    pub fn subject_column(&self) -> &str {
        self.locator.subject_column()
    }

    pub fn object_column(&self) -> &str {
        self.locator.object_column()
    }

    /// Forget issued aliases so a new compilation numbers from scratch
    pub fn reset(&mut self) {
        self.issued.clear();
        self.taken.clear();
    }
}
