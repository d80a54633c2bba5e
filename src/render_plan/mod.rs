//! Structured SQL plan produced by the compiler.
//!
//! Nothing here is text yet: `sql_generator` renders a [`SqlStatement`] through
//! [`ToSql`] only at the very end, so tests can inspect joins and predicates
//! directly.
use serde::{Deserialize, Serialize};

use crate::table_catalog::MappedTable;

pub trait ToSql {
    fn to_sql(&self) -> String;
}

/// `alias.column`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table_alias: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table_alias: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table_alias: table_alias.into(),
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Column(ColumnRef),
    /// Stored term, rendered as a quoted string literal
    Literal(String),
}

impl Operand {
    fn table_alias(&self) -> Option<&str> {
        match self {
            Operand::Column(col) => Some(&col.table_alias),
            Operand::Literal(_) => None,
        }
    }
}

/// `left <operator> right`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    pub left: Operand,
    pub operator: String,
    pub right: Operand,
}

impl Condition {
    pub fn new(left: Operand, operator: impl Into<String>, right: Operand) -> Self {
        Self {
            left,
            operator: operator.into(),
            right,
        }
    }

    pub fn columns_equal(left: ColumnRef, right: ColumnRef) -> Self {
        Self::new(Operand::Column(left), "=", Operand::Column(right))
    }

    pub fn column_is(column: ColumnRef, value: impl Into<String>) -> Self {
        Self::new(Operand::Column(column), "=", Operand::Literal(value.into()))
    }

    /// Table aliases this condition reads from
    pub fn table_aliases(&self) -> impl Iterator<Item = &str> {
        self.left
            .table_alias()
            .into_iter()
            .chain(self.right.table_alias())
    }

    /// Equal, or the same equality with its sides swapped
    pub fn is_equivalent(&self, other: &Condition) -> bool {
        self == other
            || (self.operator == "="
                && other.operator == "="
                && self.left == other.right
                && self.right == other.left)
    }

    /// True when every column referenced belongs to one of `aliases`
    pub fn is_scoped_to(&self, aliases: &[&str]) -> bool {
        self.table_aliases().all(|alias| aliases.contains(&alias))
    }
}

/// Append unless an equivalent condition is already present
pub fn push_unique(conditions: &mut Vec<Condition>, condition: Condition) {
    if !conditions.iter().any(|c| c.is_equivalent(&condition)) {
        conditions.push(condition);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FromSource {
    Table(MappedTable),
    Nested(Box<JoinTree>),
}

impl FromSource {
    fn collect_aliases<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            FromSource::Table(table) => out.push(&table.alias),
            FromSource::Nested(tree) => tree.collect_aliases(out),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    LeftOuter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStep {
    pub join_type: JoinType,
    pub source: FromSource,
    pub on: Vec<Condition>,
}

/// A FROM source followed by an ordered list of join steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinTree {
    pub base: FromSource,
    pub steps: Vec<JoinStep>,
}

impl JoinTree {
    pub fn new(base: FromSource) -> Self {
        Self {
            base,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, join_type: JoinType, source: FromSource, on: Vec<Condition>) {
        self.steps.push(JoinStep {
            join_type,
            source,
            on,
        });
    }

    /// Every table alias declared anywhere in the tree
    pub fn aliases(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_aliases(&mut out);
        out
    }

    fn collect_aliases<'a>(&'a self, out: &mut Vec<&'a str>) {
        self.base.collect_aliases(out);
        for step in &self.steps {
            step.source.collect_aliases(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectItems(pub Vec<ColumnRef>);

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterItems(pub Vec<Condition>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderByItem {
    pub column: ColumnRef,
    pub direction: OrderDirection,
}

/// `SELECT ... FROM ... [WHERE ...] [ORDER BY ...]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlStatement {
    pub select: SelectItems,
    pub from: JoinTree,
    pub filters: FilterItems,
    pub order_by: Option<OrderByItem>,
}
