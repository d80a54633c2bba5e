//! Integration tests - catalog and query files compiled end to end
//!
//! These tests load the YAML/JSON fixtures under `tests/fixtures` through the
//! public API, the same way the CLI does.

mod catalog_file_tests;
mod compile_file_tests;
mod filter_operator_tests;

use triplegraph::query_model::QueryFile;
use triplegraph::table_catalog::{CatalogConfig, PredicateTableMap};

pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

pub fn load_catalog() -> PredicateTableMap {
    CatalogConfig::from_yaml_file(fixture("dc_catalog.yaml"))
        .and_then(|c| c.to_table_map())
        .expect("Failed to load catalog fixture")
}

pub fn load_query(name: &str) -> QueryFile {
    QueryFile::from_file(fixture(name)).expect("Failed to load query fixture")
}
