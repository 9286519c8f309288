//! Identifier quoting for names arriving as bare strings (table names,
//! aliases, parameter names). Expression text (`Row::expression`) arrives
//! from the source already quoted where needed and is emitted verbatim.

fn needs_quoting(part: &str) -> bool {
    !part.is_empty() && part.chars().any(|c| !c.is_ascii_alphanumeric() && c != '_')
}

/// Bracket-quote a dotted identifier component-by-component, e.g.
/// `My Table.My Col` -> `[My Table].[My Col]`, `Table.Col` -> `Table.Col`.
pub fn quote_identifier(raw: &str) -> String {
    raw.split('.')
        .map(|part| {
            if needs_quoting(part) {
                format!("[{part}]")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Render a table reference with an optional alias: `[T]` or `[T] AS [A]`.
pub fn quote_table_ref(name: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) if !alias.is_empty() => {
            format!("{} AS {}", quote_identifier(name), quote_identifier(alias))
        }
        _ => quote_identifier(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier_plain_name_unquoted() {
        assert_eq!(quote_identifier("Customers"), "Customers");
    }

    #[test]
    fn test_quote_identifier_with_space_is_quoted() {
        assert_eq!(quote_identifier("My Table"), "[My Table]");
    }

    #[test]
    fn test_quote_identifier_dotted_quotes_each_part() {
        assert_eq!(quote_identifier("My Table.My Col"), "[My Table].[My Col]");
        assert_eq!(quote_identifier("Table.Col"), "Table.Col");
    }

    #[test]
    fn test_quote_table_ref_with_alias() {
        assert_eq!(quote_table_ref("Orders", Some("O")), "Orders AS O");
        assert_eq!(quote_table_ref("My Orders", Some("O")), "[My Orders] AS O");
    }

    #[test]
    fn test_quote_table_ref_without_alias() {
        assert_eq!(quote_table_ref("Orders", None), "Orders");
    }
}
