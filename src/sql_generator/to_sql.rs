use super::common::{qualified_column, quote_literal};
use crate::render_plan::{
    ColumnRef, Condition, FilterItems, FromSource, JoinStep, JoinTree, JoinType, Operand,
    OrderByItem, OrderDirection, SelectItems, SqlStatement, ToSql,
};

impl ToSql for ColumnRef {
    fn to_sql(&self) -> String {
        qualified_column(&self.table_alias, &self.column)
    }
}

impl ToSql for Operand {
    fn to_sql(&self) -> String {
        match self {
            Operand::Column(col) => col.to_sql(),
            Operand::Literal(value) => quote_literal(value),
        }
    }
}

impl ToSql for Condition {
    fn to_sql(&self) -> String {
        format!(
            "{} {} {}",
            self.left.to_sql(),
            self.operator,
            self.right.to_sql()
        )
    }
}

fn and_joined(conditions: &[Condition]) -> String {
    conditions
        .iter()
        .map(ToSql::to_sql)
        .collect::<Vec<_>>()
        .join(" AND ")
}

impl ToSql for FromSource {
    fn to_sql(&self) -> String {
        match self {
            FromSource::Table(table) => table.declaration(),
            // A lone table needs no parentheses
            FromSource::Nested(tree) if tree.steps.is_empty() => tree.to_sql(),
            FromSource::Nested(tree) => format!("({})", tree.to_sql()),
        }
    }
}

impl ToSql for JoinStep {
    fn to_sql(&self) -> String {
        match (self.join_type, self.on.is_empty()) {
            (JoinType::Inner, true) => format!("CROSS JOIN {}", self.source.to_sql()),
            (JoinType::Inner, false) => format!(
                "JOIN {} ON ({})",
                self.source.to_sql(),
                and_joined(&self.on)
            ),
            (JoinType::LeftOuter, _) => format!(
                "LEFT OUTER JOIN {} ON ({})",
                self.source.to_sql(),
                and_joined(&self.on)
            ),
        }
    }
}

impl ToSql for JoinTree {
    fn to_sql(&self) -> String {
        let mut sql = self.base.to_sql();
        for step in &self.steps {
            sql.push(' ');
            sql.push_str(&step.to_sql());
        }
        sql
    }
}

impl ToSql for SelectItems {
    fn to_sql(&self) -> String {
        let columns: Vec<String> = self.0.iter().map(ToSql::to_sql).collect();
        format!("SELECT {}", columns.join(", "))
    }
}

impl ToSql for FilterItems {
    fn to_sql(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", and_joined(&self.0))
        }
    }
}

impl ToSql for OrderDirection {
    fn to_sql(&self) -> String {
        match self {
            OrderDirection::Asc => "ASC".to_string(),
            OrderDirection::Desc => "DESC".to_string(),
        }
    }
}

impl ToSql for OrderByItem {
    fn to_sql(&self) -> String {
        format!("ORDER BY {} {}", self.column.to_sql(), self.direction.to_sql())
    }
}

impl ToSql for SqlStatement {
    fn to_sql(&self) -> String {
        let mut sql = format!("{} FROM {}", self.select.to_sql(), self.from.to_sql());

        let filters = self.filters.to_sql();
        if !filters.is_empty() {
            sql.push(' ');
            sql.push_str(&filters);
        }

        if let Some(order_by) = &self.order_by {
            sql.push(' ');
            sql.push_str(&order_by.to_sql());
        }
        sql
    }
}
