use std::io::Write;

use triplegraph::sql_generator::{teardown_statements, AnsiDdlGenerator};
use triplegraph::table_catalog::{CatalogConfig, TableCatalogError, TableLocator};

use super::load_catalog;

#[test]
fn test_catalog_fixture_loads() {
    let catalog = load_catalog();

    assert_eq!(catalog.name.as_deref(), Some("dublin_core"));
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.subject_column(), "subj");
    assert_eq!(catalog.object_column(), "obj");
    assert_eq!(
        catalog
            .table_for("<http://purl.org/dc/elements/1.1/date>")
            .unwrap(),
        "dc_date"
    );
}

#[test]
fn test_teardown_drops_every_table() {
    let catalog = load_catalog();

    let statements = teardown_statements(&AnsiDdlGenerator, &catalog);
    assert_eq!(
        statements,
        vec![
            "DROP TABLE dc_creator",
            "DROP TABLE dc_date",
            "DROP TABLE dc_title",
            "DROP TABLE dc_so",
            "DROP TABLE dc_map",
        ]
    );
}

#[test]
fn test_invalid_catalog_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "predicates:\n  \"<urn:a>\": \"drop table; --\"\n"
    )
    .unwrap();

    let err = CatalogConfig::from_yaml_file(file.path())
        .and_then(|c| c.to_table_map())
        .unwrap_err();
    assert!(
        matches!(err, TableCatalogError::InvalidIdentifier { .. }),
        "unexpected error: {:?}",
        err
    );
}
