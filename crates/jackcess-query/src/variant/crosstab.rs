use crate::dispatch::Grouped;
use crate::error::QueryError;
use crate::row::Row;

use super::{render_column, render_columns, render_from, render_where};

const PIVOT_FLAG: i16 = 0x01;
const NORMAL_FLAG: i16 = 0x02;

fn is_transform(row: &Row) -> bool {
    row.flag.unwrap_or(0) & (PIVOT_FLAG | NORMAL_FLAG) == 0
}

fn is_pivot(row: &Row) -> bool {
    row.flag.unwrap_or(0) & (PIVOT_FLAG | NORMAL_FLAG) == PIVOT_FLAG
}

fn is_normal(row: &Row) -> bool {
    row.flag.unwrap_or(0) & NORMAL_FLAG != 0
}

/// `TRANSFORM <expr> SELECT ... PIVOT <expr>`. Column rows split
/// three ways by their crosstab flags: the transform row carries neither
/// the pivot (0x01) nor the normal (0x02) flag, the pivot row carries only
/// the pivot flag, ordinary SELECT columns carry the normal flag.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let transform_rows: Vec<&&Row> = grouped.columns.iter().filter(|r| is_transform(r)).collect();
    let pivot_rows: Vec<&&Row> = grouped.columns.iter().filter(|r| is_pivot(r)).collect();
    let normal_rows: Vec<&Row> = grouped
        .columns
        .iter()
        .filter(|r| is_normal(r))
        .copied()
        .collect();

    if transform_rows.len() != 1 {
        return Err(QueryError::Other(
            "crosstab query must have exactly one transform column".to_string(),
        ));
    }
    if pivot_rows.len() != 1 {
        return Err(QueryError::Other(
            "crosstab query must have exactly one pivot column".to_string(),
        ));
    }

    let transform_expr = transform_rows[0].expression.as_deref().unwrap_or_default();
    let pivot_expr = pivot_rows[0].expression.as_deref().unwrap_or_default();

    let mut sql = format!("TRANSFORM {transform_expr} SELECT ");
    sql.push_str(&render_columns(&normal_rows));
    sql.push_str(" FROM ");
    sql.push_str(&render_from(&grouped.tables, &grouped.joins)?);
    if let Some(w) = render_where(grouped.where_row) {
        sql.push_str(" WHERE ");
        sql.push_str(&w);
    }
    if !normal_rows.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(
            &normal_rows
                .iter()
                .map(|r| render_column(r))
                .collect::<Vec<_>>()
                .join(", "),
        );
    }
    if let Some(h) = grouped.having_row.and_then(|r| r.expression.clone()) {
        sql.push_str(" HAVING ");
        sql.push_str(&h);
    }
    sql.push_str(&format!(" PIVOT {pivot_expr}"));
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_crosstab() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(16),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column)
                .with_expression("Sum([amount])")
                .with_flag(0),
            Row::new(Attribute::Column)
                .with_expression("[region]")
                .with_flag(NORMAL_FLAG),
            Row::new(Attribute::Column)
                .with_expression("[month]")
                .with_flag(PIVOT_FLAG),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(
            render(&grouped).unwrap(),
            "TRANSFORM Sum([amount]) SELECT [region] FROM T GROUP BY [region] PIVOT [month]"
        );
    }

    #[test]
    fn test_missing_pivot_is_error() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(16),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("Sum([amount])").with_flag(0),
        ];
        let grouped = group(&rows).unwrap();
        assert!(render(&grouped).is_err());
    }
}
