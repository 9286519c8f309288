use crate::dispatch::{flag_bits, Grouped};
use crate::error::QueryError;

use super::render_order_by;

const SUB_QUERY_1: &str = "X7YZ_____1";
const SUB_QUERY_2: &str = "X7YZ_____2";
const NO_ALL_FLAG: i16 = 0x02;

fn find_sub_query<'a>(grouped: &'a Grouped, marker: &'static str) -> Result<&'a str, QueryError> {
    grouped
        .tables
        .iter()
        .find(|t| t.name2.as_deref() == Some(marker))
        .and_then(|t| t.expression.as_deref())
        .ok_or(QueryError::MissingUnionSubQuery(marker))
}

/// Collapse any run of whitespace spanning a line break down to a single
/// `\n`; horizontal-only runs (plain spaces/tabs) are left untouched.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = String::new();
    let mut run_has_newline = false;

    let flush = |out: &mut String, run: &mut String, run_has_newline: &mut bool| {
        if *run_has_newline {
            out.push('\n');
        } else {
            out.push_str(run);
        }
        run.clear();
        *run_has_newline = false;
    };

    for c in text.chars() {
        if c.is_whitespace() {
            if c == '\n' || c == '\r' {
                run_has_newline = true;
            }
            run.push(c);
        } else {
            if !run.is_empty() {
                flush(&mut out, &mut run, &mut run_has_newline);
            }
            out.push(c);
        }
    }
    if !run.is_empty() {
        flush(&mut out, &mut run, &mut run_has_newline);
    }
    out
}

/// `<q1> UNION [ALL] <q2> [ORDER BY ...]`. Sub-queries are located
/// via the magic table-row names `X7YZ_____1`/`X7YZ_____2`.
pub(crate) fn render(grouped: &Grouped) -> Result<String, QueryError> {
    let q1 = find_sub_query(grouped, SUB_QUERY_1)?;
    let q2 = find_sub_query(grouped, SUB_QUERY_2)?;

    let mut sql = normalize_whitespace(q1);
    sql.push('\n');
    sql.push_str("UNION ");
    if flag_bits(grouped) & NO_ALL_FLAG == 0 {
        sql.push_str("ALL ");
    }
    sql.push_str(&normalize_whitespace(q2));

    if let Some(o) = render_order_by(&grouped.order_by) {
        sql.push_str(" ORDER BY ");
        sql.push_str(&o);
    }
    Ok(sql)
}
