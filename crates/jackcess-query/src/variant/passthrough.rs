use crate::dispatch::Grouped;
use crate::error::QueryError;

use super::render_remote_db;

/// Emits the type record's expression verbatim, followed by `IN '<path>'
/// [<type>]` if a remote database is set.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let expr = grouped
        .type_row
        .expression
        .as_deref()
        .ok_or_else(|| QueryError::Other("passthrough query has no expression".to_string()))?;
    let mut sql = expr.to_string();
    if let Some(remote) = render_remote_db(grouped.remote_db) {
        sql.push(' ');
        sql.push_str(&remote);
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_passthrough_with_remote_db() {
        let rows = vec![
            Row::new(Attribute::Type)
                .with_flag(112)
                .with_expression("SELECT * FROM RemoteTable"),
            Row::new(Attribute::RemoteDatabase)
                .with_expression("odbc://host/db")
                .with_name1("ODBC"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(
            render(&grouped).unwrap(),
            "SELECT * FROM RemoteTable IN 'odbc://host/db' [ODBC]"
        );
    }
}
