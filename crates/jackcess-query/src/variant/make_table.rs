use crate::dispatch::Grouped;
use crate::error::QueryError;
use crate::quoting::quote_identifier;

use super::{render_remote_db, select::render_with_verb};

/// SELECT body preceded by `SELECT ... INTO <targetTable> [IN '<path>'
/// [<type>]]`. The target table name is carried on the type record.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let target = grouped
        .type_row
        .name1
        .as_deref()
        .ok_or_else(|| QueryError::Other("make-table query has no target table".to_string()))?;

    let mut into = quote_identifier(target);
    if let Some(remote) = render_remote_db(grouped.remote_db) {
        into.push(' ');
        into.push_str(&remote);
    }

    render_with_verb(grouped, "SELECT", Some(&into))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_make_table() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(80).with_name1("NewT"),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "SELECT [a] INTO NewT FROM T");
    }
}
