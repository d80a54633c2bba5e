use triplegraph::query_compiler::{GraphQueryCompiler, QueryCompileError};
use triplegraph::query_model::QueryFile;
use triplegraph::render_plan::{JoinType, SqlStatement, ToSql};
use triplegraph::table_catalog::{PredicateTableMap, PredicateTableResolver};

use super::{load_catalog, load_query};

const BOOKS_SQL: &str = "SELECT dc_title.subj, dc_title.obj, dc_creator.obj FROM dc_title \
     JOIN dc_date ON (dc_date.subj = dc_title.subj AND dc_date.obj >= '\"1850\"') \
     LEFT OUTER JOIN dc_creator ON (dc_title.subj = dc_creator.subj) \
     ORDER BY dc_title.obj ASC";

fn build(
    catalog: &PredicateTableMap,
    query_file: &QueryFile,
) -> Result<SqlStatement, QueryCompileError> {
    let mut compiler =
        GraphQueryCompiler::new(&query_file.query, PredicateTableResolver::new(catalog));
    compiler.set_targets(query_file.targets.iter().cloned());
    if let Some(order) = &query_file.order_by {
        compiler.order_by(&order.variable, order.descending)?;
    }
    compiler.build_statement()
}

#[test]
fn test_yaml_query_compiles() -> anyhow::Result<()> {
    let catalog = load_catalog();
    let query_file = load_query("books_query.yaml");

    let statement = build(&catalog, &query_file)?;
    assert_eq!(statement.to_sql(), BOOKS_SQL);
    Ok(())
}

#[test]
fn test_json_query_matches_yaml() {
    let catalog = load_catalog();
    let yaml = load_query("books_query.yaml");
    let json = load_query("books_query.json");

    assert_eq!(yaml, json);
    assert_eq!(
        build(&catalog, &json).unwrap(),
        build(&catalog, &yaml).unwrap()
    );
}

#[test]
fn test_statement_serializes_to_json() {
    let catalog = load_catalog();
    let statement = build(&catalog, &load_query("books_query.yaml")).unwrap();

    let value = serde_json::to_value(&statement).unwrap();
    assert_eq!(value["from"]["steps"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["from"]["steps"][1]["join_type"], "LeftOuter");
    assert_eq!(value["order_by"]["direction"], "Asc");

    let parsed: SqlStatement = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.from.steps[1].join_type, JoinType::LeftOuter);
    assert_eq!(parsed.to_sql(), BOOKS_SQL);
}

#[test]
fn test_unmapped_predicate_reports_pattern() {
    let catalog = load_catalog();
    let query_file = QueryFile::from_yaml_str(
        r#"
targets: [doc]
required:
  - graph_pattern:
      triples:
        - ["?doc", "<http://purl.org/dc/elements/1.1/subject>", "?topic"]
"#,
    )
    .unwrap();

    let err = build(&catalog, &query_file).unwrap_err();
    let message = err.to_string();
    assert!(
        matches!(err, QueryCompileError::UpstreamLookupFailure(_)),
        "unexpected error: {:?}",
        err
    );
    assert!(message.contains("<http://purl.org/dc/elements/1.1/subject>"));
    assert!(message.contains("In pattern: ?doc"));
}

#[test]
fn test_query_file_order_must_be_a_target() {
    let catalog = load_catalog();
    let mut query_file = load_query("books_query.yaml");
    query_file.targets.retain(|t| t != "title");

    assert!(matches!(
        build(&catalog, &query_file),
        Err(QueryCompileError::InvalidOrderTarget { .. })
    ));
}
