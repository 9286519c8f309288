pub mod append;
pub mod crosstab;
pub mod data_definition;
pub mod delete;
pub mod make_table;
pub mod passthrough;
pub mod select;
pub mod update;
pub mod union;

use crate::dispatch::Grouped;
use crate::error::QueryError;
use crate::join::{combine_joins, TableEntry};
use crate::quoting::quote_identifier;
use crate::row::Row;

/// Render a table row's list into joined `FROM` clause entries.
pub(crate) fn render_from(tables: &[&Row], joins: &[&Row]) -> Result<String, QueryError> {
    let entries: Vec<TableEntry> = tables
        .iter()
        .map(|t| TableEntry {
            name: t.name1.clone().unwrap_or_default(),
            alias: t.name2.clone(),
        })
        .collect();
    let rendered = combine_joins(entries, joins)?;
    Ok(rendered.join(", "))
}

/// Render one column row: its expression, with an `AS alias` suffix when
/// `name1` carries one.
pub(crate) fn render_column(row: &Row) -> String {
    let expr = row.expression.as_deref().unwrap_or_default();
    match row.name1.as_deref() {
        Some(alias) if !alias.is_empty() => format!("{expr} AS {}", quote_identifier(alias)),
        _ => expr.to_string(),
    }
}

pub(crate) fn render_columns(columns: &[&Row]) -> String {
    columns.iter().map(|c| render_column(c)).collect::<Vec<_>>().join(", ")
}

pub(crate) fn render_where(where_row: Option<&Row>) -> Option<String> {
    where_row.and_then(|r| r.expression.clone())
}

pub(crate) fn render_group_by(group_by: &[&Row]) -> Option<String> {
    if group_by.is_empty() {
        return None;
    }
    Some(
        group_by
            .iter()
            .filter_map(|r| r.expression.clone())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

pub(crate) fn render_order_by(order_by: &[&Row]) -> Option<String> {
    if order_by.is_empty() {
        return None;
    }
    Some(
        order_by
            .iter()
            .map(|r| {
                let expr = r.expression.as_deref().unwrap_or_default();
                if r.flag.unwrap_or(0) & 0x01 != 0 {
                    format!("{expr} DESC")
                } else {
                    expr.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(", "),
    )
}

/// Append `[WHERE ...] [GROUP BY ...] [HAVING ...] [ORDER BY ...]` to a
/// SELECT-shaped body, shared by `select`, `update`, `delete` and
/// `crosstab`.
pub(crate) fn append_select_tail(sql: &mut String, grouped: &Grouped, group_by: Option<String>) {
    if let Some(w) = render_where(grouped.where_row) {
        sql.push_str(" WHERE ");
        sql.push_str(&w);
    }
    if let Some(g) = group_by {
        sql.push_str(" GROUP BY ");
        sql.push_str(&g);
    }
    if let Some(h) = grouped.having_row.and_then(|r| r.expression.clone()) {
        sql.push_str(" HAVING ");
        sql.push_str(&h);
    }
    if let Some(o) = render_order_by(&grouped.order_by) {
        sql.push_str(" ORDER BY ");
        sql.push_str(&o);
    }
}

/// `IN '<path>' [<type>]` clause for linked remote databases.
pub(crate) fn render_remote_db(remote_db: Option<&Row>) -> Option<String> {
    let row = remote_db?;
    let path = row.expression.as_deref().unwrap_or_default();
    match row.name1.as_deref() {
        Some(kind) if !kind.is_empty() => Some(format!("IN '{path}' [{kind}]")),
        _ => Some(format!("IN '{path}'")),
    }
}
