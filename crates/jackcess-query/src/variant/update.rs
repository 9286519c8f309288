use crate::dispatch::Grouped;
use crate::error::QueryError;
use crate::row::Row;

use super::{render_from, render_where};

fn render_assignment(row: &Row) -> String {
    let column = row.name1.as_deref().unwrap_or_default();
    let value = row.expression.as_deref().unwrap_or_default();
    format!("{column} = {value}")
}

/// `UPDATE joinedTables SET col=expr, ... [WHERE ...]`.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let mut sql = String::from("UPDATE ");
    sql.push_str(&render_from(&grouped.tables, &grouped.joins)?);
    sql.push_str(" SET ");
    sql.push_str(
        &grouped
            .columns
            .iter()
            .map(|r| render_assignment(r))
            .collect::<Vec<_>>()
            .join(", "),
    );
    if let Some(w) = render_where(grouped.where_row) {
        sql.push_str(" WHERE ");
        sql.push_str(&w);
    }
    Ok(sql)
}
