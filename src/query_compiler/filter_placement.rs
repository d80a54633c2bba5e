//! Filter placement and deferred predicates.
//!
//! A filter is attached to the first join step at which one of its variables
//! is joinable and all of its variables are bound. Filters of a single-triple
//! graph pattern never meet a join step; they are rendered against the
//! pattern's own columns and staged for the statement's WHERE clause.
use std::collections::BTreeMap;

use super::binder::{BoundPattern, VariableBindings};
use super::errors::QueryCompileError;
use crate::query_model::{Node, NodeFilter};
use crate::render_plan::{push_unique, ColumnRef, Condition, Operand};

/// Comparison operators accepted in node filters
pub const SUPPORTED_OPERATORS: &[&str] = &["=", "<>", "!=", "<", "<=", ">", ">=", "LIKE", "NOT LIKE"];

/// Trim, collapse inner whitespace and upper-case an operator; `None` if unsupported
pub fn normalize_operator(operator: &str) -> Option<String> {
    let normalized = operator
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();
    SUPPORTED_OPERATORS
        .contains(&normalized.as_str())
        .then_some(normalized)
}

/// Constant equalities waiting for a join step (or for the WHERE clause),
/// keyed by table alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeferredPredicates {
    values: BTreeMap<String, Vec<Condition>>,
}

impl DeferredPredicates {
    pub fn add_value(&mut self, alias: &str, condition: Condition) {
        push_unique(self.values.entry(alias.to_string()).or_default(), condition);
    }

    /// Remove and return the value bindings of `alias`
    pub fn take_values(&mut self, alias: &str) -> Vec<Condition> {
        self.values.remove(alias).unwrap_or_default()
    }

    /// Remove everything keyed under one of `aliases`
    pub fn drain_for_aliases(&mut self, aliases: &[&str]) -> Vec<Condition> {
        let mut drained = Vec::new();
        for alias in aliases {
            drained.extend(self.take_values(alias));
        }
        drained
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Everything still pending, for the WHERE clause
    pub fn into_filters(self) -> Vec<Condition> {
        let mut filters = Vec::new();
        for condition in self.values.into_values().flatten() {
            push_unique(&mut filters, condition);
        }
        filters
    }
}

#[derive(Debug, Clone)]
struct PendingFilter {
    filter: NodeFilter,
    variables: Vec<String>,
    consumed: bool,
}

/// The filters of one graph pattern, indexed by every variable they reference
#[derive(Debug, Clone)]
pub struct FilterPool {
    filters: Vec<PendingFilter>,
    by_variable: BTreeMap<String, Vec<usize>>,
}

impl FilterPool {
    pub fn new(filters: &[NodeFilter]) -> Result<Self, QueryCompileError> {
        let mut pending = Vec::with_capacity(filters.len());
        let mut by_variable: BTreeMap<String, Vec<usize>> = BTreeMap::new();

        for filter in filters {
            let operator = normalize_operator(&filter.operator).ok_or_else(|| {
                QueryCompileError::UnsupportedOperator {
                    operator: filter.operator.clone(),
                    filter: filter.to_string(),
                }
            })?;
            let variables: Vec<String> = filter.variables().into_iter().map(String::from).collect();
            if variables.is_empty() {
                return Err(QueryCompileError::FilterMissingVariable {
                    filter: filter.to_string(),
                });
            }

            let index = pending.len();
            for var in &variables {
                log::debug!("Adding {} to filter pool under ?{}", filter, var);
                by_variable.entry(var.clone()).or_default().push(index);
            }
            pending.push(PendingFilter {
                filter: NodeFilter::new(filter.node.clone(), operator, filter.constraint.clone()),
                variables,
                consumed: false,
            });
        }

        Ok(Self {
            filters: pending,
            by_variable,
        })
    }

    /// Consume every filter reachable from `joinable` whose variables are all bound
    pub fn take_joinable(
        &mut self,
        joinable: &[(String, ColumnRef)],
        bindings: &VariableBindings,
    ) -> Vec<Condition> {
        let mut conditions = Vec::new();
        for (var, _) in joinable {
            let Some(indices) = self.by_variable.get(var) else {
                continue;
            };
            for &index in indices {
                let pending = &mut self.filters[index];
                if pending.consumed {
                    continue;
                }
                let Some(condition) = render_filter(&pending.filter, |name| bindings.get(name).cloned())
                else {
                    continue;
                };
                log::debug!("Adding filter condition for ?{}: {}", var, pending.filter);
                pending.consumed = true;
                push_unique(&mut conditions, condition);
            }
        }
        conditions
    }

    pub fn is_empty(&self) -> bool {
        self.filters.iter().all(|f| f.consumed)
    }

    /// Filters not yet attached to any join step
    pub fn remaining(&self) -> impl Iterator<Item = &NodeFilter> {
        self.filters
            .iter()
            .filter(|f| !f.consumed)
            .map(|f| &f.filter)
    }

    /// Render leftover filters against the columns of a single-triple pattern.
    ///
    /// A variable the pattern does not carry resolves through `bindings`.
    pub fn stage_leftovers(
        &mut self,
        pattern: &BoundPattern,
        bindings: &VariableBindings,
    ) -> Result<Vec<Condition>, QueryCompileError> {
        let mut staged = Vec::new();
        for pending in self.filters.iter_mut().filter(|f| !f.consumed) {
            let resolve = |name: &str| {
                pattern
                    .column_of(name)
                    .cloned()
                    .or_else(|| bindings.get(name).cloned())
            };
            let condition = render_filter(&pending.filter, resolve).ok_or_else(|| {
                QueryCompileError::FilterUnbound {
                    filter: pending.filter.to_string(),
                    reason: format!(
                        "variable(s) {} cannot be found in the graph pattern",
                        pending
                            .variables
                            .iter()
                            .map(|v| format!("?{}", v))
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                }
            })?;

            log::warn!(
                "Filter {} has no join step, staging it with its graph pattern",
                pending.filter
            );
            push_unique(&mut staged, condition);
            pending.consumed = true;
        }
        Ok(staged)
    }
}

/// `left OP right` with variables resolved through `resolve`; `None` if one is unresolved
fn render_filter<F>(filter: &NodeFilter, resolve: F) -> Option<Condition>
where
    F: Fn(&str) -> Option<ColumnRef>,
{
    let operand = |node: &Node| match node {
        Node::Variable(name) => resolve(name).map(Operand::Column),
        Node::Constant(value) => Some(Operand::Literal(value.clone())),
    };
    Some(Condition::new(
        operand(&filter.node)?,
        filter.operator.clone(),
        operand(&filter.constraint)?,
    ))
}
