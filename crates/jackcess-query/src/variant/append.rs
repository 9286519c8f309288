use crate::dispatch::Grouped;
use crate::error::QueryError;
use crate::quoting::quote_identifier;
use crate::row::Row;

use super::{append_select_tail, render_column, render_columns, render_from, render_group_by, render_remote_db};

/// The 0x8000 bit on a column record marks it as a literal `INSERT ...
/// VALUES` value rather than a `SELECT`-sourced column.
fn is_value_row(row: &Row) -> bool {
    (row.flag.unwrap_or(0) as u16) & 0x8000 != 0
}

/// `INSERT INTO t [IN ...] VALUES (v1, v2, ...)` when value-flagged column
/// rows exist, else `INSERT INTO t [IN ...] SELECT ...`. Zero value rows
/// must emit `INSERT ... SELECT`, not `VALUES ()`.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let target = grouped
        .type_row
        .name1
        .as_deref()
        .ok_or_else(|| QueryError::Other("append query has no target table".to_string()))?;

    let mut sql = String::from("INSERT INTO ");
    sql.push_str(&quote_identifier(target));
    if let Some(remote) = render_remote_db(grouped.remote_db) {
        sql.push(' ');
        sql.push_str(&remote);
    }

    let (values, columns): (Vec<&Row>, Vec<&Row>) =
        grouped.columns.iter().partition(|r| is_value_row(r));

    if !values.is_empty() {
        sql.push_str("\nVALUES (");
        sql.push_str(
            &values
                .iter()
                .map(|r| render_column(r))
                .collect::<Vec<_>>()
                .join(", "),
        );
        sql.push(')');
    } else {
        sql.push(' ');
        sql.push_str("SELECT ");
        sql.push_str(&render_columns(&columns));
        sql.push_str(" FROM ");
        sql.push_str(&render_from(&grouped.tables, &grouped.joins)?);
        append_select_tail(&mut sql, grouped, render_group_by(&grouped.group_by));
    }

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::Attribute;

    #[test]
    fn test_append_with_values() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(64).with_name1("T"),
            Row::new(Attribute::Column)
                .with_expression("1")
                .with_flag(-0x8000i16),
            Row::new(Attribute::Column)
                .with_expression("\"x\"")
                .with_flag(-0x8000i16),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "INSERT INTO T\nVALUES (1, \"x\")");
    }

    #[test]
    fn test_append_with_zero_value_columns_is_insert_select() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(64).with_name1("T"),
            Row::new(Attribute::Table).with_name1("Src"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(
            render(&grouped).unwrap(),
            "INSERT INTO T SELECT [a] FROM Src"
        );
    }
}
