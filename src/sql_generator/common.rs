//! Common utilities for ANSI SQL generation

/// True for identifiers that can be emitted without quoting:
/// an ASCII letter or underscore followed by ASCII alphanumerics or underscores.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote an identifier with ANSI double quotes unless it is plain.
///
/// # Examples
/// ```
/// use triplegraph::sql_generator::common::quote_identifier;
/// assert_eq!(quote_identifier("t1"), "t1");
/// assert_eq!(quote_identifier("my table"), "\"my table\"");
/// assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
/// ```
pub fn quote_identifier(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

/// Format a qualified column reference: table_alias.column_name
///
/// # Examples
/// ```
/// use triplegraph::sql_generator::common::qualified_column;
/// assert_eq!(qualified_column("t1_1", "s"), "t1_1.s");
/// ```
pub fn qualified_column(table_alias: &str, column_name: &str) -> String {
    format!(
        "{}.{}",
        quote_identifier(table_alias),
        quote_identifier(column_name)
    )
}

/// Render a string literal, doubling embedded single quotes.
///
/// # Examples
/// ```
/// use triplegraph::sql_generator::common::quote_literal;
/// assert_eq!(quote_literal("<urn:a>"), "'<urn:a>'");
/// assert_eq!(quote_literal("\"O'Brien\""), "'\"O''Brien\"'");
/// ```
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
