use crate::render_plan::{SqlStatement, ToSql};

pub mod common;
pub mod ddl;
mod to_sql;

pub use ddl::{teardown_statements, AnsiDdlGenerator, DdlGenerator};

/// Render a compiled statement as a single line of ANSI SQL
pub fn generate_sql(statement: &SqlStatement) -> String {
    statement.to_sql()
}
