use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueryModelError {
    #[error("Invalid node `{text}`: {reason}")]
    InvalidNode { text: String, reason: String },
    #[error("Failed to read query file: {error}")]
    ReadError { error: String },
    #[error("Failed to parse query file: {error}")]
    ParseError { error: String },
}

impl QueryModelError {
    pub fn invalid_node(text: impl Into<String>, reason: impl Into<String>) -> Self {
        QueryModelError::InvalidNode {
            text: text.into(),
            reason: reason.into(),
        }
    }
}
