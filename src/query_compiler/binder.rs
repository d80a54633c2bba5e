use std::collections::BTreeMap;

use super::errors::QueryCompileError;
use super::filter_placement::DeferredPredicates;
use crate::query_model::{Node, TriplePattern};
use crate::render_plan::{ColumnRef, Condition};
use crate::table_catalog::{MappedTable, PredicateTableResolver};

/// Variable name -> the column that first bound it. Entries are never replaced.
pub type VariableBindings = BTreeMap<String, ColumnRef>;

/// A subject or object node together with the column it maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundNode {
    pub node: Node,
    pub column: ColumnRef,
}

/// A triple pattern placed on a concrete table alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundPattern {
    pub triple: TriplePattern,
    pub table: MappedTable,
    pub subject: BoundNode,
    pub object: BoundNode,
}

impl BoundPattern {
    pub fn nodes(&self) -> [&BoundNode; 2] {
        [&self.subject, &self.object]
    }

    /// `(variable, column)` for every variable-bearing node
    pub fn join_vars(&self) -> Vec<(String, ColumnRef)> {
        self.nodes()
            .into_iter()
            .filter_map(|bound| {
                bound
                    .node
                    .var_name()
                    .map(|name| (name.to_string(), bound.column.clone()))
            })
            .collect()
    }

    /// Column of `variable` within this pattern, subject first
    pub fn column_of(&self, variable: &str) -> Option<&ColumnRef> {
        self.nodes()
            .into_iter()
            .find(|bound| bound.node.var_name() == Some(variable))
            .map(|bound| &bound.column)
    }
}

/// Place a triple pattern on a table and record what it binds.
///
/// New variables are bound to their column; already bound variables keep
/// their existing column. Constants become `column = 'value'` conditions
/// deferred under the table alias.
pub fn bind_pattern(
    triple: &TriplePattern,
    resolver: &mut PredicateTableResolver<'_>,
    bindings: &mut VariableBindings,
    deferred: &mut DeferredPredicates,
) -> Result<BoundPattern, QueryCompileError> {
    let table = resolver
        .resolve(&triple.predicate)
        .map_err(|e| QueryCompileError::from_catalog_with_context(e, triple.to_string()))?;

    let subject = BoundNode {
        node: triple.subject.clone(),
        column: ColumnRef::new(&table.alias, resolver.subject_column()),
    };
    let object = BoundNode {
        node: triple.object.clone(),
        column: ColumnRef::new(&table.alias, resolver.object_column()),
    };

    for bound in [&subject, &object] {
        bind_node(bound, &table, bindings, deferred);
    }

    Ok(BoundPattern {
        triple: triple.clone(),
        table,
        subject,
        object,
    })
}

fn bind_node(
    bound: &BoundNode,
    table: &MappedTable,
    bindings: &mut VariableBindings,
    deferred: &mut DeferredPredicates,
) {
    match &bound.node {
        Node::Variable(name) => {
            if !bindings.contains_key(name) {
                log::debug!("Bound ?{} to {}.{}", name, bound.column.table_alias, bound.column.column);
                bindings.insert(name.clone(), bound.column.clone());
            }
        }
        Node::Constant(value) => {
            log::debug!(
                "Deferring value binding {}.{} = {}",
                bound.column.table_alias,
                bound.column.column,
                value
            );
            deferred.add_value(
                &table.alias,
                Condition::column_is(bound.column.clone(), value.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_catalog::{PredicateTableMap, TableCatalogError};

    fn catalog() -> PredicateTableMap {
        PredicateTableMap::from_pairs([("<urn:title>", "t1"), ("<urn:creator>", "t2")])
    }

    fn triple(s: &str, p: &str, o: &str) -> TriplePattern {
        TriplePattern::new(
            Node::parse(s).unwrap(),
            Node::parse(p).unwrap(),
            Node::parse(o).unwrap(),
        )
    }

    #[test]
    fn test_binds_new_variables() {
        let catalog = catalog();
        let mut resolver = PredicateTableResolver::new(&catalog);
        let mut bindings = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();

        let bound = bind_pattern(
            &triple("?doc", "<urn:title>", "?title"),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap();

        assert_eq!(bound.table, MappedTable::new("t1", "t1"));
        assert_eq!(bindings["doc"], ColumnRef::new("t1", "s"));
        assert_eq!(bindings["title"], ColumnRef::new("t1", "o"));
        assert!(deferred.is_empty());
        assert_eq!(
            bound.join_vars(),
            vec![
                ("doc".to_string(), ColumnRef::new("t1", "s")),
                ("title".to_string(), ColumnRef::new("t1", "o")),
            ]
        );
    }

    #[test]
    fn test_existing_binding_wins() {
        let catalog = catalog();
        let mut resolver = PredicateTableResolver::new(&catalog);
        let mut bindings = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();

        bind_pattern(
            &triple("?doc", "<urn:title>", "?title"),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap();
        let second = bind_pattern(
            &triple("?doc", "<urn:creator>", "?who"),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap();

        assert_eq!(bindings["doc"], ColumnRef::new("t1", "s"));
        assert_eq!(bindings["who"], ColumnRef::new("t2", "o"));
        assert_eq!(second.column_of("doc"), Some(&ColumnRef::new("t2", "s")));
    }

    #[test]
    fn test_constants_become_deferred_value_bindings() {
        let catalog = catalog();
        let mut resolver = PredicateTableResolver::new(&catalog);
        let mut bindings = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();

        let bound = bind_pattern(
            &triple("?doc", "<urn:creator>", "\"Melville\""),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap();

        assert_eq!(bindings.len(), 1);
        assert_eq!(bound.join_vars().len(), 1);
        assert_eq!(
            deferred.take_values("t2"),
            vec![Condition::column_is(ColumnRef::new("t2", "o"), "\"Melville\"")]
        );
    }

    #[test]
    fn test_variable_predicate_names_pattern() {
        let catalog = catalog();
        let mut resolver = PredicateTableResolver::new(&catalog);
        let mut bindings = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();

        let err = bind_pattern(
            &triple("?doc", "?p", "?o"),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QueryCompileError::PredicateNotConstant {
                predicate: "?p".to_string(),
                pattern: "?doc ?p ?o".to_string(),
            }
        );
    }

    #[test]
    fn test_unmapped_predicate_is_upstream_failure() {
        let catalog = catalog();
        let mut resolver = PredicateTableResolver::new(&catalog);
        let mut bindings = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();

        let err = bind_pattern(
            &triple("?doc", "<urn:unknown>", "?o"),
            &mut resolver,
            &mut bindings,
            &mut deferred,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            QueryCompileError::UpstreamLookupFailure(TableCatalogError::UnmappedPredicate { .. })
        ));
    }
}
