use std::io::Write;

use crate::table_catalog::{CatalogConfig, TableCatalogError, TableLocator};

const DC_CATALOG: &str = r#"
name: dublin_core
map_table: tmap
so_table: tso
predicates:
  "<http://purl.org/dc/elements/1.1/title>": t1
  "<http://purl.org/dc/elements/1.1/creator>": t2
"#;

#[test]
fn test_catalog_defaults_and_lookup() {
    let config = CatalogConfig::from_yaml_str(DC_CATALOG).unwrap();
    assert_eq!(config.subject_column, "s");
    assert_eq!(config.object_column, "o");

    let map = config.to_table_map().unwrap();
    assert_eq!(map.name.as_deref(), Some("dublin_core"));
    assert_eq!(map.len(), 2);
    assert_eq!(
        map.table_for("<http://purl.org/dc/elements/1.1/title>")
            .unwrap(),
        "t1"
    );
    assert_eq!(map.tables().collect::<Vec<_>>(), vec!["t2", "t1"]);
}

#[test]
fn test_unmapped_predicate_is_an_error() {
    let map = CatalogConfig::from_yaml_str(DC_CATALOG)
        .unwrap()
        .to_table_map()
        .unwrap();
    assert_eq!(
        map.table_for("<urn:unknown>"),
        Err(TableCatalogError::UnmappedPredicate {
            predicate: "<urn:unknown>".to_string()
        })
    );
}

#[test]
fn test_custom_columns() {
    let yaml = r#"
subject_column: subj
object_column: obj
predicates:
  "<urn:p>": tp
"#;
    let map = CatalogConfig::from_yaml_str(yaml)
        .unwrap()
        .to_table_map()
        .unwrap();
    assert_eq!(map.subject_column(), "subj");
    assert_eq!(map.object_column(), "obj");
}

#[test]
fn test_rejects_non_identifier_table() {
    let yaml = r#"
predicates:
  "<urn:p>": "t1; DROP TABLE t2"
"#;
    let err = CatalogConfig::from_yaml_str(yaml)
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(matches!(err, TableCatalogError::InvalidIdentifier { .. }));
}

#[test]
fn test_rejects_shared_table() {
    let yaml = r#"
predicates:
  "<urn:a>": t1
  "<urn:b>": t1
"#;
    let err = CatalogConfig::from_yaml_str(yaml)
        .unwrap()
        .validate()
        .unwrap_err();
    assert_eq!(
        err,
        TableCatalogError::DuplicateTable {
            table: "t1".to_string(),
            first: "<urn:a>".to_string(),
            second: "<urn:b>".to_string(),
        }
    );
}

#[test]
fn test_rejects_identical_columns() {
    let yaml = r#"
subject_column: v
object_column: v
predicates: {}
"#;
    let err = CatalogConfig::from_yaml_str(yaml)
        .unwrap()
        .validate()
        .unwrap_err();
    assert!(matches!(err, TableCatalogError::InvalidConfig { .. }));
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DC_CATALOG.as_bytes()).unwrap();

    let config = CatalogConfig::from_yaml_file(file.path()).unwrap();
    assert_eq!(config.so_table.as_deref(), Some("tso"));
    assert_eq!(config.map_table.as_deref(), Some("tmap"));
}

#[test]
fn test_missing_file_reports_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = CatalogConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, TableCatalogError::ConfigReadError { .. }));
}
