//! On-disk query description used by the CLI.
//!
//! ```yaml
//! targets: [doc, title]
//! order_by:
//!   variable: title
//!   descending: false
//! required:
//!   - graph_pattern:
//!       triples:
//!         - ["?doc", "<http://purl.org/dc/elements/1.1/title>", "?title"]
//!       filters:
//!         - ["?title", "<>", "\"Untitled\""]
//! optional:
//!   - graph_pattern:
//!       triples:
//!         - ["?doc", "<http://purl.org/dc/elements/1.1/creator>", "?creator"]
//! ```
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::ast::GraphQuery;
use super::errors::QueryModelError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    pub variable: String,
    #[serde(default)]
    pub descending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryFile {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub order_by: Option<OrderSpec>,
    #[serde(flatten)]
    pub query: GraphQuery,
}

impl QueryFile {
    /// Load from a `.json` file or, for any other extension, YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QueryModelError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| QueryModelError::ReadError {
            error: format!("{}: {}", path.display(), e),
        })?;

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, QueryModelError> {
        serde_yaml::from_str(yaml).map_err(|e| QueryModelError::ParseError {
            error: e.to_string(),
        })
    }

    pub fn from_json_str(json: &str) -> Result<Self, QueryModelError> {
        serde_json::from_str(json).map_err(|e| QueryModelError::ParseError {
            error: e.to_string(),
        })
    }
}
