use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableCatalogError {
    #[error("No table is mapped for predicate `{predicate}`")]
    UnmappedPredicate { predicate: String },
    #[error("Predicate must be a constant, found variable `{predicate}`")]
    PredicateNotConstant { predicate: String },
    #[error("Invalid {kind} name `{name}` (expected a plain SQL identifier)")]
    InvalidIdentifier { kind: String, name: String },
    #[error("Table `{table}` is mapped to both `{first}` and `{second}`")]
    DuplicateTable {
        table: String,
        first: String,
        second: String,
    },
    #[error("Failed to read catalog file: {error}")]
    ConfigReadError { error: String },
    #[error("Failed to parse catalog: {error}")]
    ConfigParseError { error: String },
    #[error("Invalid catalog: {message}")]
    InvalidConfig { message: String },
}

impl TableCatalogError {
    /// Create an UnmappedPredicate error with context information
    pub fn unmapped_with_context(predicate: impl Into<String>, context: impl Into<String>) -> Self {
        TableCatalogError::UnmappedPredicate {
            predicate: format!("{}\n  Context: {}", predicate.into(), context.into()),
        }
    }
}
