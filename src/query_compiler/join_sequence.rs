use super::binder::{bind_pattern, BoundPattern, VariableBindings};
use super::errors::QueryCompileError;
use super::filter_placement::{DeferredPredicates, FilterPool};
use crate::query_model::{GraphPattern, Node, TriplePattern};
use crate::render_plan::{push_unique, ColumnRef, Condition, FromSource, JoinTree, JoinType, ToSql};
use crate::table_catalog::PredicateTableResolver;

/// A [`JoinUnit`] taken apart for attaching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitParts {
    pub tree: JoinTree,
    pub join_vars: Vec<(String, ColumnRef)>,
    pub attach_conditions: Vec<Condition>,
    pub staged_filters: Vec<Condition>,
}

/// One joinable unit: a single table or an inner-joined sequence of them.
///
/// `attach_conditions` are conditions that reference tables outside the unit.
/// They cannot live inside a nested join's ON clause and are applied where the
/// unit itself is joined in. `staged_filters` are the leftover filters of a
/// single-triple pattern; they belong to whatever clause admits the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinUnit {
    tree: JoinTree,
    join_vars: Vec<(String, ColumnRef)>,
    attach_conditions: Vec<Condition>,
    staged_filters: Vec<Condition>,
}

impl JoinUnit {
    fn seed(pattern: &BoundPattern) -> Self {
        Self {
            tree: JoinTree::new(FromSource::Table(pattern.table.clone())),
            join_vars: pattern.join_vars(),
            attach_conditions: Vec::new(),
            staged_filters: Vec::new(),
        }
    }

    /// `(variable, column)` of every variable-bearing node in the unit
    pub fn join_vars(&self) -> &[(String, ColumnRef)] {
        &self.join_vars
    }

    pub fn tree(&self) -> &JoinTree {
        &self.tree
    }

    pub fn aliases(&self) -> Vec<&str> {
        self.tree.aliases()
    }

    pub fn attach_conditions(&self) -> &[Condition] {
        &self.attach_conditions
    }

    pub fn staged_filters(&self) -> &[Condition] {
        &self.staged_filters
    }

    /// FROM-clause rendering of the unit used as a single source
    pub fn declaration(&self) -> String {
        FromSource::Nested(Box::new(self.tree.clone())).to_sql()
    }

    /// Identity of the unit as a single FROM source: the table alias for a
    /// lone table, the full join expression otherwise
    pub fn alias(&self) -> String {
        match (&self.tree.base, self.tree.steps.is_empty()) {
            (FromSource::Table(table), true) => table.alias.clone(),
            _ => self.declaration(),
        }
    }

    pub fn into_parts(self) -> UnitParts {
        UnitParts {
            tree: self.tree,
            join_vars: self.join_vars,
            attach_conditions: self.attach_conditions,
            staged_filters: self.staged_filters,
        }
    }

    /// Inner-join a bound pattern, splitting conditions by the aliases they need
    fn push_pattern(&mut self, pattern: &BoundPattern, conditions: Vec<Condition>) {
        let mut on = Vec::new();
        {
            let mut aliases = self.tree.aliases();
            aliases.push(pattern.table.alias.as_str());
            for condition in conditions {
                if condition.is_scoped_to(&aliases) {
                    push_unique(&mut on, condition);
                } else {
                    log::debug!("Lifting {} out of the nested join", condition.to_sql());
                    push_unique(&mut self.attach_conditions, condition);
                }
            }
        }
        self.tree
            .push(JoinType::Inner, FromSource::Table(pattern.table.clone()), on);
    }

    fn add_join_vars(&mut self, vars: Vec<(String, ColumnRef)>) {
        for var in vars {
            if !self.join_vars.contains(&var) {
                self.join_vars.push(var);
            }
        }
    }

    /// Column of `var` contributed by a table already in the unit
    fn local_column(&self, var: &str) -> Option<&ColumnRef> {
        self.join_vars
            .iter()
            .find(|(v, _)| v == var)
            .map(|(_, col)| col)
    }

    /// Distinct aliases of the tables carrying a join variable
    fn join_var_aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = Vec::new();
        for (_, col) in &self.join_vars {
            if !aliases.contains(&col.table_alias) {
                aliases.push(col.table_alias.clone());
            }
        }
        aliases
    }
}

/// Compile one graph pattern into a joinable unit.
///
/// Patterns are taken in their original order whenever they share an
/// already-bound variable; filters and deferred constants are attached to the
/// first join step at which they can be resolved.
pub fn compile_graph_pattern(
    pattern: &GraphPattern,
    resolver: &mut PredicateTableResolver<'_>,
    bindings: &mut VariableBindings,
    deferred: &mut DeferredPredicates,
) -> Result<JoinUnit, QueryCompileError> {
    let (first, rest) = pattern
        .triples
        .split_first()
        .ok_or(QueryCompileError::EmptyGraphPattern)?;
    let mut filters = FilterPool::new(&pattern.filters)?;

    let seed = bind_pattern(first, resolver, bindings, deferred)?;
    let mut unit = JoinUnit::seed(&seed);
    let mut remaining: Vec<&TriplePattern> = rest.iter().collect();

    while !remaining.is_empty() {
        let position = remaining
            .iter()
            .position(|t| t.join_variables().any(|v| bindings.contains_key(v)))
            .ok_or_else(|| disconnected(&remaining, bindings))?;
        let triple = remaining.remove(position);

        let bound = bind_pattern(triple, resolver, bindings, deferred)?;

        let mut conditions = Vec::new();
        for node in bound.nodes() {
            match &node.node {
                Node::Variable(name) => {
                    if let Some(existing) = bindings.get(name) {
                        if *existing != node.column {
                            log::debug!(
                                "Adding join condition {} = {}",
                                node.column.to_sql(),
                                existing.to_sql()
                            );
                            push_unique(
                                &mut conditions,
                                Condition::columns_equal(node.column.clone(), existing.clone()),
                            );
                        }
                    }
                    // A binding from outside the unit is only checked at attach
                    // time; the unit's own column still has to join here
                    if let Some(local) = unit.local_column(name) {
                        if *local != node.column {
                            push_unique(
                                &mut conditions,
                                Condition::columns_equal(node.column.clone(), local.clone()),
                            );
                        }
                    }
                }
                Node::Constant(value) => push_unique(
                    &mut conditions,
                    Condition::column_is(node.column.clone(), value.clone()),
                ),
            }
        }

        unit.add_join_vars(bound.join_vars());
        for condition in filters.take_joinable(unit.join_vars(), bindings) {
            push_unique(&mut conditions, condition);
        }

        for alias in unit.join_var_aliases() {
            for condition in deferred.take_values(&alias) {
                log::debug!("Folding constant condition {}", condition.to_sql());
                push_unique(&mut conditions, condition);
            }
        }

        unit.push_pattern(&bound, conditions);
    }

    if !filters.is_empty() {
        if pattern.triples.len() > 1 {
            let leftover: Vec<String> = filters.remaining().map(ToString::to_string).collect();
            return Err(QueryCompileError::FilterUnbound {
                filter: leftover.join(", "),
                reason: "its variables are never jointly bound by the graph pattern".to_string(),
            });
        }
        unit.staged_filters = filters.stage_leftovers(&seed, bindings)?;
    }

    Ok(unit)
}

fn disconnected(remaining: &[&TriplePattern], bindings: &VariableBindings) -> QueryCompileError {
    QueryCompileError::Disconnected {
        remaining: remaining
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("; "),
        bound: bindings
            .keys()
            .map(|k| format!("?{}", k))
            .collect::<Vec<_>>()
            .join(", "),
    }
}
