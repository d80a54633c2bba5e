use thiserror::Error;

use crate::table_catalog::TableCatalogError;

/// Translation failures. All of them are input or schema errors: retrying the
/// same query against the same catalog reproduces them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryCompileError {
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),
    #[error("Predicate must be a constant, found variable `{predicate}` in pattern `{pattern}`")]
    PredicateNotConstant { predicate: String, pattern: String },
    #[error("Filter `{filter}` must reference at least one variable")]
    FilterMissingVariable { filter: String },
    #[error("Unsupported operator `{operator}` in filter `{filter}` (allowed: =, <>, !=, <, <=, >, >=, LIKE, NOT LIKE)")]
    UnsupportedOperator { operator: String, filter: String },
    #[error("Graph pattern contains no triple patterns")]
    EmptyGraphPattern,
    #[error("Query contains no required graph pattern")]
    EmptyQuery,
    #[error("Cannot bind all query steps, remaining: [{remaining}], variables already bound: [{bound}]")]
    Disconnected { remaining: String, bound: String },
    #[error("Filter `{filter}` is unbound: {reason}")]
    FilterUnbound { filter: String, reason: String },
    #[error("Target variable `{0}` is not bound by any pattern of the query")]
    UndeclaredTarget(String),
    #[error("Cannot order by `{variable}` since it is not in the target list [{targets}]")]
    InvalidOrderTarget { variable: String, targets: String },
    #[error("No target variables have been set")]
    NoTargets,
    #[error("Table lookup failed: {0}")]
    UpstreamLookupFailure(TableCatalogError),
}

impl QueryCompileError {
    /// Map a resolver failure, naming the pattern it happened in
    pub fn from_catalog_with_context(error: TableCatalogError, pattern: impl Into<String>) -> Self {
        match error {
            TableCatalogError::PredicateNotConstant { predicate } => {
                QueryCompileError::PredicateNotConstant {
                    predicate,
                    pattern: pattern.into(),
                }
            }
            TableCatalogError::UnmappedPredicate { predicate } => {
                QueryCompileError::UpstreamLookupFailure(TableCatalogError::unmapped_with_context(
                    predicate,
                    format!("In pattern: {}", pattern.into()),
                ))
            }
            other => QueryCompileError::UpstreamLookupFailure(other),
        }
    }
}
