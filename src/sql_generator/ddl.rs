//! Teardown statements for the triple store tables.
use crate::table_catalog::PredicateTableMap;

/// DDL for dropping store tables.
///
/// Predicate-mapped tables and the subject/object lookup table are dropped
/// through separate entry points so dialects can treat them differently.
pub trait DdlGenerator {
    fn drop_map_table_ddl(&self, table: &str) -> Vec<String> {
        vec![format!("DROP TABLE {}", table)]
    }

    fn drop_so_table_ddl(&self, table: &str) -> Vec<String> {
        vec![format!("DROP TABLE {}", table)]
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDdlGenerator;

impl DdlGenerator for AnsiDdlGenerator {}

/// Drop every predicate table of the catalog, then the SO and map tables when configured
pub fn teardown_statements(
    generator: &dyn DdlGenerator,
    catalog: &PredicateTableMap,
) -> Vec<String> {
    let mut statements: Vec<String> = catalog
        .tables()
        .flat_map(|table| generator.drop_map_table_ddl(table))
        .collect();

    if let Some(so_table) = &catalog.so_table {
        statements.extend(generator.drop_so_table_ddl(so_table));
    }
    if let Some(map_table) = &catalog.map_table {
        statements.extend(generator.drop_map_table_ddl(map_table));
    }

    log::debug!("Generated {} teardown statements", statements.len());
    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_catalog::CatalogConfig;

    #[test]
    fn test_drop_statements() {
        let ddl = AnsiDdlGenerator;
        assert_eq!(ddl.drop_map_table_ddl("t1"), vec!["DROP TABLE t1"]);
        assert_eq!(ddl.drop_so_table_ddl("tso"), vec!["DROP TABLE tso"]);
    }

    #[test]
    fn test_teardown_covers_catalog() {
        let catalog = CatalogConfig::from_yaml_str(
            r#"
map_table: tmap
so_table: tso
predicates:
  "<urn:a>": t1
  "<urn:b>": t2
"#,
        )
        .unwrap()
        .to_table_map()
        .unwrap();

        assert_eq!(
            teardown_statements(&AnsiDdlGenerator, &catalog),
            vec![
                "DROP TABLE t1",
                "DROP TABLE t2",
                "DROP TABLE tso",
                "DROP TABLE tmap"
            ]
        );
    }

    #[test]
    fn test_teardown_without_auxiliary_tables() {
        let catalog = PredicateTableMap::from_pairs([("<urn:a>", "t1")]);
        assert_eq!(
            teardown_statements(&AnsiDdlGenerator, &catalog),
            vec!["DROP TABLE t1"]
        );
    }
}
