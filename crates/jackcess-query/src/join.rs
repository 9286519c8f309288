use crate::error::QueryError;
use crate::quoting::quote_table_ref;
use crate::row::Row;

fn join_keyword(flag: i16) -> Result<&'static str, QueryError> {
    match flag {
        1 => Ok("INNER"),
        2 => Ok("LEFT"),
        3 => Ok("RIGHT"),
        other => Err(QueryError::UnknownJoinFlag(other)),
    }
}

struct JoinGroup<'a> {
    from_table: &'a str,
    to_table: &'a str,
    flag: i16,
    predicates: Vec<&'a str>,
}

/// Group join rows by identical `(from_table, to_table)` endpoints,
/// preserving first-seen order and erroring on mismatched flags within a
/// group.
fn group_joins<'a>(joins: &[&'a Row]) -> Result<Vec<JoinGroup<'a>>, QueryError> {
    let mut groups: Vec<JoinGroup<'a>> = Vec::new();
    for row in joins {
        let from_table = row.name1.as_deref().unwrap_or_default();
        let to_table = row.name2.as_deref().unwrap_or_default();
        let flag = row.flag.unwrap_or(0);
        let predicate = row.expression.as_deref().unwrap_or_default();
        if let Some(group) = groups
            .iter_mut()
            .find(|g| g.from_table == from_table && g.to_table == to_table)
        {
            if group.flag != flag {
                return Err(QueryError::MismatchedJoinFlags);
            }
            group.predicates.push(predicate);
        } else {
            groups.push(JoinGroup {
                from_table,
                to_table,
                flag,
                predicates: vec![predicate],
            });
        }
    }
    Ok(groups)
}

struct Slot {
    rendered: String,
    members: Vec<String>,
}

/// A simple (un-joined) `FROM` table entry: bare name and optional alias.
pub struct TableEntry {
    pub name: String,
    pub alias: Option<String>,
}

impl TableEntry {
    fn key(&self) -> String {
        self.alias.clone().unwrap_or_else(|| self.name.clone())
    }
}

/// Combine join rows against the table list, producing the rendered,
/// parenthesized `FROM` clause entries in first-seen insertion order.
pub fn combine_joins(tables: Vec<TableEntry>, joins: &[&Row]) -> Result<Vec<String>, QueryError> {
    let mut slots: Vec<Slot> = tables
        .into_iter()
        .map(|t| Slot {
            members: vec![t.key()],
            rendered: quote_table_ref(&t.name, t.alias.as_deref()),
        })
        .collect();

    let groups = group_joins(joins)?;

    for group in groups {
        let keyword = join_keyword(group.flag)?;
        let idx_from = slots
            .iter()
            .position(|s| s.members.iter().any(|m| m == group.from_table))
            .ok_or_else(|| QueryError::Other(format!("join references unknown table '{}'", group.from_table)))?;
        let idx_to = slots
            .iter()
            .position(|s| s.members.iter().any(|m| m == group.to_table))
            .ok_or_else(|| QueryError::Other(format!("join references unknown table '{}'", group.to_table)))?;
        if idx_from == idx_to {
            return Err(QueryError::Other(
                "join endpoints resolve to the same table group".to_string(),
            ));
        }

        let predicate = group
            .predicates
            .iter()
            .map(|p| format!("({p})"))
            .collect::<Vec<_>>()
            .join(" AND ");

        let (first, second) = if idx_from < idx_to {
            (idx_from, idx_to)
        } else {
            (idx_to, idx_from)
        };
        let to_remove = slots.remove(second);
        let from_remove = slots.remove(first);

        let (left, right) = if first == idx_from {
            (from_remove, to_remove)
        } else {
            (to_remove, from_remove)
        };

        let mut members = left.members;
        members.extend(right.members);
        let rendered = format!(
            "({} {keyword} JOIN {} ON {predicate})",
            left.rendered, right.rendered
        );
        slots.insert(first, Slot { rendered, members });
    }

    Ok(slots.into_iter().map(|s| s.rendered).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Attribute;

    fn join_row(from: &str, to: &str, flag: i16, pred: &str) -> Row {
        Row::new(Attribute::Join)
            .with_name1(from)
            .with_name2(to)
            .with_flag(flag)
            .with_expression(pred)
    }

    #[test]
    fn test_single_inner_join() {
        let tables = vec![
            TableEntry { name: "A".into(), alias: None },
            TableEntry { name: "B".into(), alias: None },
        ];
        let j = join_row("A", "B", 1, "A.id = B.id");
        let joins = vec![&j];
        let out = combine_joins(tables, &joins).unwrap();
        assert_eq!(out, vec!["(A INNER JOIN B ON (A.id = B.id))"]);
    }

    #[test]
    fn test_compound_join_ands_predicates() {
        let tables = vec![
            TableEntry { name: "A".into(), alias: None },
            TableEntry { name: "B".into(), alias: None },
        ];
        let j1 = join_row("A", "B", 1, "A.id = B.id");
        let j2 = join_row("A", "B", 1, "A.id2 = B.id2");
        let joins = vec![&j1, &j2];
        let out = combine_joins(tables, &joins).unwrap();
        assert_eq!(
            out,
            vec!["(A INNER JOIN B ON (A.id = B.id) AND (A.id2 = B.id2))"]
        );
    }

    #[test]
    fn test_three_table_chain() {
        let tables = vec![
            TableEntry { name: "A".into(), alias: None },
            TableEntry { name: "B".into(), alias: None },
            TableEntry { name: "C".into(), alias: None },
        ];
        let j1 = join_row("A", "B", 1, "A.id = B.id");
        let j2 = join_row("B", "C", 2, "B.id = C.id");
        let joins = vec![&j1, &j2];
        let out = combine_joins(tables, &joins).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0],
            "((A INNER JOIN B ON (A.id = B.id)) LEFT JOIN C ON (B.id = C.id))"
        );
    }

    #[test]
    fn test_mismatched_flags_is_error() {
        let tables = vec![
            TableEntry { name: "A".into(), alias: None },
            TableEntry { name: "B".into(), alias: None },
        ];
        let j1 = join_row("A", "B", 1, "A.id = B.id");
        let j2 = join_row("A", "B", 2, "A.id2 = B.id2");
        let joins = vec![&j1, &j2];
        assert_eq!(
            combine_joins(tables, &joins).unwrap_err(),
            QueryError::MismatchedJoinFlags
        );
    }

    #[test]
    fn test_matches_by_alias() {
        let tables = vec![
            TableEntry { name: "Accounts".into(), alias: Some("A".into()) },
            TableEntry { name: "Billing".into(), alias: Some("B".into()) },
        ];
        let j = join_row("A", "B", 1, "A.id = B.id");
        let joins = vec![&j];
        let out = combine_joins(tables, &joins).unwrap();
        assert_eq!(
            out,
            vec!["(Accounts AS A INNER JOIN Billing AS B ON (A.id = B.id))"]
        );
    }
}
