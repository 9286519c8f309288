use crate::dispatch::{flag_bits, Grouped};
use crate::error::QueryError;

use super::{append_select_tail, render_columns, render_from, render_group_by};

/// `SELECT [DISTINCT|DISTINCTROW] [TOP n [PERCENT]] columns FROM
/// joinedTables [WHERE e] [GROUP BY cols] [HAVING e] [ORDER BY cols]`.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    render_with_verb(grouped, "SELECT", None)
}

/// Shared with `delete` (swaps the leading verb for `DELETE`, drops the
/// quantifier/TOP clause) and `make_table` (inserts an `INTO target
/// [IN ...]` clause after the column list).
pub(crate) fn render_with_verb(
    grouped: &Grouped,
    verb: &str,
    into: Option<&str>,
) -> Result<String, QueryError> {
    let bits = flag_bits(grouped);
    let mut sql = String::from(verb);

    if verb == "SELECT" {
        if bits & 0x01 != 0 {
            sql.push_str(" DISTINCT");
        } else if bits & 0x02 != 0 {
            sql.push_str(" DISTINCTROW");
        }
        if let Some(top) = grouped.flag_row.and_then(|r| r.extra) {
            if top > 0 {
                sql.push_str(&format!(" TOP {top}"));
                if bits & 0x04 != 0 {
                    sql.push_str(" PERCENT");
                }
            }
        }
    }

    let columns = render_columns(&grouped.columns);
    if !columns.is_empty() {
        sql.push(' ');
        sql.push_str(&columns);
    }
    if let Some(into) = into {
        sql.push_str(" INTO ");
        sql.push_str(into);
    }
    sql.push_str(" FROM ");
    sql.push_str(&render_from(&grouped.tables, &grouped.joins)?);

    append_select_tail(&mut sql, grouped, render_group_by(&grouped.group_by));
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::group;
    use crate::row::{Attribute, Row};

    #[test]
    fn test_plain_select() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(0),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "SELECT [a] FROM T");
    }

    #[test]
    fn test_distinct_and_where() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(0),
            Row::new(Attribute::Flag).with_flag(0x01),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
            Row::new(Attribute::Where).with_expression("[a] > 1"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(
            render(&grouped).unwrap(),
            "SELECT DISTINCT [a] FROM T WHERE [a] > 1"
        );
    }

    #[test]
    fn test_top_n_percent() {
        let rows = vec![
            Row::new(Attribute::Type).with_flag(0),
            Row::new(Attribute::Flag).with_flag(0x04).with_extra(10),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let grouped = group(&rows).unwrap();
        assert_eq!(render(&grouped).unwrap(), "SELECT TOP 10 PERCENT [a] FROM T");
    }
}
