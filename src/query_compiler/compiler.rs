use super::binder::VariableBindings;
use super::errors::QueryCompileError;
use super::filter_placement::DeferredPredicates;
use super::join_sequence::{compile_graph_pattern, JoinUnit, UnitParts};
use crate::query_model::{ElementRole, GraphPattern, GraphQuery, QueryElement};
use crate::render_plan::{
    push_unique, ColumnRef, Condition, FilterItems, FromSource, JoinTree, JoinType, OrderByItem,
    OrderDirection, SelectItems, SqlStatement, ToSql,
};
use crate::table_catalog::PredicateTableResolver;

/// Translates a [`GraphQuery`] into ANSI SQL-92.
///
/// Required graph patterns are inner-joined in order, optional ones are
/// left-outer-joined against the required bindings only, so optional
/// fragments never depend on each other. Result columns come from
/// [`set_targets`](Self::set_targets).
///
/// A compiler holds per-compilation state (alias counters); use one instance
/// per thread.
pub struct GraphQueryCompiler<'a> {
    query: &'a GraphQuery,
    resolver: PredicateTableResolver<'a>,
    targets: Vec<String>,
    ordering: Option<(String, OrderDirection)>,
}

impl<'a> GraphQueryCompiler<'a> {
    pub fn new(query: &'a GraphQuery, resolver: PredicateTableResolver<'a>) -> Self {
        Self {
            query,
            resolver,
            targets: Vec::new(),
            ordering: None,
        }
    }

    /// Choose the variables that make up result rows, in order.
    ///
    /// Every target must be bound somewhere in the query or compilation
    /// fails. Clears any previous ordering.
    pub fn set_targets<I, S>(&mut self, targets: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self.ordering = None;
    }

    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Sort results by the value bound to `target`, which must be a declared target
    pub fn order_by(&mut self, target: &str, descending: bool) -> Result<(), QueryCompileError> {
        if !self.targets.iter().any(|t| t == target) {
            return Err(QueryCompileError::InvalidOrderTarget {
                variable: target.to_string(),
                targets: self.targets.join(", "),
            });
        }

        let direction = if descending {
            OrderDirection::Desc
        } else {
            OrderDirection::Asc
        };
        self.ordering = Some((target.to_string(), direction));
        Ok(())
    }

    /// Compile to SQL text. Always a single statement for now.
    pub fn compile(&mut self) -> Result<Vec<String>, QueryCompileError> {
        let statement = self.build_statement()?;
        Ok(vec![statement.to_sql()])
    }

    /// Compile to the structured statement without rendering it
    pub fn build_statement(&mut self) -> Result<SqlStatement, QueryCompileError> {
        if self.targets.is_empty() {
            return Err(QueryCompileError::NoTargets);
        }
        self.resolver.reset();

        let mut required = VariableBindings::new();
        let mut deferred = DeferredPredicates::default();
        let mut running: Option<RunningJoin> = None;

        for element in &self.query.required {
            let pattern = graph_pattern_of(element, ElementRole::Required)?;
            let unit =
                compile_graph_pattern(pattern, &mut self.resolver, &mut required, &mut deferred)?;

            running = Some(match running.take() {
                None => RunningJoin::start(unit),
                Some(mut join) => {
                    join.attach(JoinType::Inner, unit, &required, Vec::new())?;
                    join
                }
            });
        }
        let mut running = running.ok_or(QueryCompileError::EmptyQuery)?;

        let mut all = required.clone();
        for element in &self.query.optional {
            let pattern = graph_pattern_of(element, ElementRole::Optional)?;
            let mut optional = required.clone();
            let unit =
                compile_graph_pattern(pattern, &mut self.resolver, &mut optional, &mut deferred)?;

            // Predicates of an optional fragment must not filter required rows,
            // whichever table they reference
            let own = deferred.drain_for_aliases(&unit.aliases());
            running.attach(JoinType::LeftOuter, unit, &required, own)?;

            for (var, column) in optional {
                all.entry(var).or_insert(column);
            }
        }

        let select = self
            .targets
            .iter()
            .map(|target| {
                all.get(target)
                    .cloned()
                    .ok_or_else(|| QueryCompileError::UndeclaredTarget(target.clone()))
            })
            .collect::<Result<Vec<ColumnRef>, _>>()?;

        let order_by = match &self.ordering {
            Some((target, direction)) => Some(OrderByItem {
                column: all
                    .get(target)
                    .cloned()
                    .ok_or_else(|| QueryCompileError::UndeclaredTarget(target.clone()))?,
                direction: *direction,
            }),
            None => None,
        };

        let mut filters = deferred.into_filters();
        for condition in running.residual {
            push_unique(&mut filters, condition);
        }

        let statement = SqlStatement {
            select: SelectItems(select),
            from: running.tree,
            filters: FilterItems(filters),
            order_by,
        };
        log::info!(
            "Compiled graph query ({} required, {} optional elements)",
            self.query.required.len(),
            self.query.optional.len()
        );
        log::debug!("Generated SQL: {}", statement.to_sql());
        Ok(statement)
    }
}

fn graph_pattern_of(
    element: &QueryElement,
    role: ElementRole,
) -> Result<&GraphPattern, QueryCompileError> {
    match element {
        QueryElement::GraphPattern(pattern) => Ok(pattern),
        QueryElement::GraphQuery(_) => Err(QueryCompileError::UnsupportedConstruct(format!(
            "{} element is a {}; sub-queries are not supported",
            role,
            element.kind()
        ))),
    }
}

/// The FROM clause assembled so far, with the variables it exposes
struct RunningJoin {
    tree: JoinTree,
    join_vars: Vec<(String, ColumnRef)>,
    /// Conditions of required units with no join step to live on; they end
    /// up in WHERE
    residual: Vec<Condition>,
}

impl RunningJoin {
    /// The first required unit is used flat, without parentheses
    fn start(unit: JoinUnit) -> Self {
        let UnitParts {
            tree,
            join_vars,
            attach_conditions,
            staged_filters,
        } = unit.into_parts();

        let mut residual = Vec::new();
        for condition in attach_conditions.into_iter().chain(staged_filters) {
            push_unique(&mut residual, condition);
        }
        Self {
            tree,
            join_vars,
            residual,
        }
    }

    /// Join `unit` on every variable it shares with the required bindings.
    ///
    /// Staged filters of an optional unit go into its ON clause; those of a
    /// required unit go to WHERE.
    fn attach(
        &mut self,
        join_type: JoinType,
        unit: JoinUnit,
        bindings: &VariableBindings,
        mut extra: Vec<Condition>,
    ) -> Result<(), QueryCompileError> {
        let declaration = unit.declaration();
        let UnitParts {
            tree,
            join_vars,
            attach_conditions: lifted,
            staged_filters,
        } = unit.into_parts();
        match join_type {
            JoinType::LeftOuter => extra.extend(staged_filters),
            JoinType::Inner => {
                for condition in staged_filters {
                    push_unique(&mut self.residual, condition);
                }
            }
        }

        let mut on = Vec::new();
        for (var, column) in &join_vars {
            let Some(bound) = bindings.get(var) else {
                continue;
            };
            let bound_here = self
                .join_vars
                .iter()
                .any(|(v, c)| v == var && c == bound);
            if bound_here && bound != column {
                push_unique(&mut on, Condition::columns_equal(bound.clone(), column.clone()));
            }
        }
        for condition in lifted {
            push_unique(&mut on, condition);
        }

        if on.is_empty() {
            return Err(QueryCompileError::Disconnected {
                remaining: declaration,
                bound: bindings
                    .keys()
                    .map(|k| format!("?{}", k))
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }
        for condition in extra {
            push_unique(&mut on, condition);
        }

        log::debug!("Attaching {} with {} condition(s)", declaration, on.len());
        self.tree
            .push(join_type, FromSource::Nested(Box::new(tree)), on);
        for var in join_vars {
            if !self.join_vars.contains(&var) {
                self.join_vars.push(var);
            }
        }
        Ok(())
    }
}
