use test_case::test_case;
use triplegraph::query_compiler::{GraphQueryCompiler, QueryCompileError};
use triplegraph::query_model::{GraphPattern, GraphQuery, Node, NodeFilter, TriplePattern};
use triplegraph::table_catalog::PredicateTableResolver;

use super::load_catalog;

fn title_query(operator: &str) -> GraphQuery {
    let pattern = GraphPattern::new(vec![TriplePattern::new(
        Node::variable("doc"),
        Node::constant("<http://purl.org/dc/elements/1.1/title>"),
        Node::variable("title"),
    )])
    .with_filter(NodeFilter::new(
        Node::variable("title"),
        operator,
        Node::constant("Moby%"),
    ));
    GraphQuery::new().require(pattern)
}

fn compile_with(operator: &str) -> Result<String, QueryCompileError> {
    let catalog = load_catalog();
    let query = title_query(operator);
    let mut compiler = GraphQueryCompiler::new(&query, PredicateTableResolver::new(&catalog));
    compiler.set_targets(["doc"]);
    Ok(compiler.compile()?.remove(0))
}

#[test_case("=", "=" ; "equals")]
#[test_case("!=", "!=" ; "not equals")]
#[test_case("<>", "<>" ; "angle not equals")]
#[test_case(" >= ", ">=" ; "padded")]
#[test_case("like", "LIKE" ; "lowercase like")]
#[test_case("Not  Like", "NOT LIKE" ; "mixed case not like")]
fn test_supported_operator(operator: &str, rendered: &str) {
    let sql = compile_with(operator).unwrap();
    assert_eq!(
        sql,
        format!(
            "SELECT dc_title.subj FROM dc_title WHERE dc_title.obj {} 'Moby%'",
            rendered
        )
    );
}

#[test_case("IN" ; "in list")]
#[test_case("= 'x' OR 1 =" ; "injection")]
#[test_case("" ; "empty")]
fn test_unsupported_operator(operator: &str) {
    assert!(matches!(
        compile_with(operator),
        Err(QueryCompileError::UnsupportedOperator { .. })
    ));
}
