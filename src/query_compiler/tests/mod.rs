
use crate::query_model::{GraphPattern, Node, NodeFilter, TriplePattern};
use crate::table_catalog::PredicateTableMap;

pub(super) fn catalog() -> PredicateTableMap {
    PredicateTableMap::from_pairs([
        ("<urn:title>", "t_title"),
        ("<urn:creator>", "t_creator"),
        ("<urn:knows>", "t_knows"),
    ])
}

pub(super) fn triple(s: &str, p: &str, o: &str) -> TriplePattern {
    TriplePattern::new(
        Node::parse(s).unwrap(),
        Node::parse(p).unwrap(),
        Node::parse(o).unwrap(),
    )
}

pub(super) fn pattern(triples: &[(&str, &str, &str)]) -> GraphPattern {
    GraphPattern::new(triples.iter().map(|(s, p, o)| triple(s, p, o)).collect())
}

pub(super) fn filter(node: &str, operator: &str, constraint: &str) -> NodeFilter {
    NodeFilter::new(
        Node::parse(node).unwrap(),
        operator,
        Node::parse(constraint).unwrap(),
    )
}
