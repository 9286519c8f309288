use log::warn;

use crate::error::QueryError;
use crate::param::format_parameter;
use crate::row::{Attribute, Row};
use crate::variant;

/// One of the nine recognized query kinds, or [`QueryKind::Unknown`] when
/// dispatch or reconstruction fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Select,
    MakeTable,
    Append,
    Update,
    Delete,
    CrossTab,
    DataDefinition,
    Passthrough,
    Union,
    Unknown,
}

/// The single byte carried on an Access system-object record that
/// designates a query's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectFlag {
    Select = 0,
    CrossTab = 16,
    Delete = 32,
    Update = 48,
    Append = 64,
    MakeTable = 80,
    DataDefinition = 96,
    Passthrough = 112,
    Union = 128,
}

impl ObjectFlag {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ObjectFlag::Select),
            16 => Some(ObjectFlag::CrossTab),
            32 => Some(ObjectFlag::Delete),
            48 => Some(ObjectFlag::Update),
            64 => Some(ObjectFlag::Append),
            80 => Some(ObjectFlag::MakeTable),
            96 => Some(ObjectFlag::DataDefinition),
            112 => Some(ObjectFlag::Passthrough),
            128 => Some(ObjectFlag::Union),
            _ => None,
        }
    }

    fn kind(self) -> QueryKind {
        match self {
            ObjectFlag::Select => QueryKind::Select,
            ObjectFlag::CrossTab => QueryKind::CrossTab,
            ObjectFlag::Delete => QueryKind::Delete,
            ObjectFlag::Update => QueryKind::Update,
            ObjectFlag::Append => QueryKind::Append,
            ObjectFlag::MakeTable => QueryKind::MakeTable,
            ObjectFlag::DataDefinition => QueryKind::DataDefinition,
            ObjectFlag::Passthrough => QueryKind::Passthrough,
            ObjectFlag::Union => QueryKind::Union,
        }
    }

    /// Whether this variant's body is wrapped in `PARAMETERS ...;` /
    /// `WITH OWNERACCESS OPTION`. Data-definition and union bypass it.
    fn supports_standard_clauses(self) -> bool {
        !matches!(self, ObjectFlag::DataDefinition | ObjectFlag::Union)
    }
}

/// The outcome of [`reconstruct`]: a rendered SQL string for a recognized
/// query, or the raw rows preserved verbatim for an [`QueryKind::Unknown`]
/// one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub kind: QueryKind,
    pub sql: Option<String>,
    pub raw_rows: Option<Vec<Row>>,
}

impl QueryResult {
    fn unknown(rows: &[Row]) -> Self {
        QueryResult {
            kind: QueryKind::Unknown,
            sql: None,
            raw_rows: Some(rows.to_vec()),
        }
    }

    fn rendered(kind: QueryKind, sql: String) -> Self {
        QueryResult {
            kind,
            sql: Some(sql),
            raw_rows: None,
        }
    }
}

/// Rows grouped by attribute, with the singular-attribute invariant
/// already validated.
pub(crate) struct Grouped<'a> {
    pub type_row: &'a Row,
    pub flag_row: Option<&'a Row>,
    pub remote_db: Option<&'a Row>,
    pub where_row: Option<&'a Row>,
    pub having_row: Option<&'a Row>,
    pub parameters: Vec<&'a Row>,
    pub tables: Vec<&'a Row>,
    pub columns: Vec<&'a Row>,
    pub joins: Vec<&'a Row>,
    pub group_by: Vec<&'a Row>,
    pub order_by: Vec<&'a Row>,
}

fn rows_by(rows: &[Row], attr: Attribute) -> Vec<&Row> {
    rows.iter().filter(|r| r.attribute == Some(attr)).collect()
}

fn singular<'a>(rows: &'a [Row], attr: Attribute) -> Result<Option<&'a Row>, QueryError> {
    let matches = rows_by(rows, attr);
    match matches.len() {
        0 => Ok(None),
        1 => Ok(Some(matches[0])),
        _ => Err(QueryError::DuplicateSingularRecord(attr)),
    }
}

pub(crate) fn group(rows: &[Row]) -> Result<Grouped<'_>, QueryError> {
    let type_row = singular(rows, Attribute::Type)?
        .ok_or_else(|| QueryError::Other("missing required Type record".to_string()))?;
    Ok(Grouped {
        type_row,
        flag_row: singular(rows, Attribute::Flag)?,
        remote_db: singular(rows, Attribute::RemoteDatabase)?,
        where_row: singular(rows, Attribute::Where)?,
        having_row: singular(rows, Attribute::Having)?,
        parameters: rows_by(rows, Attribute::Parameter),
        tables: rows_by(rows, Attribute::Table),
        columns: rows_by(rows, Attribute::Column),
        joins: rows_by(rows, Attribute::Join),
        group_by: rows_by(rows, Attribute::GroupBy),
        order_by: rows_by(rows, Attribute::OrderBy),
    })
}

fn render_prologue(parameters: &[&Row]) -> Option<String> {
    if parameters.is_empty() {
        return None;
    }
    let body = parameters
        .iter()
        .map(|p| format_parameter(p))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("PARAMETERS {body};"))
}

/// The dedicated `Flag` record's `flag` field carries generic per-query
/// option bits on top of the object-flag dispatch value. 0x08 marks
/// `WITH OWNERACCESS OPTION`; see `select`/`union` for the other bits.
pub(crate) fn flag_bits(grouped: &Grouped) -> i16 {
    grouped.flag_row.and_then(|r| r.flag).unwrap_or(0)
}

fn wrap(object: ObjectFlag, body: String, grouped: &Grouped) -> String {
    let mut out = String::new();
    if object.supports_standard_clauses() {
        if let Some(prologue) = render_prologue(&grouped.parameters) {
            out.push_str(&prologue);
            out.push('\n');
        }
        out.push_str(&body);
        out.push(';');
        if flag_bits(grouped) & 0x08 != 0 {
            out.push('\n');
            out.push_str("WITH OWNERACCESS OPTION;");
        }
    } else {
        out.push_str(&body);
        out.push(';');
    }
    out
}

fn try_reconstruct(object_flag: u8, rows: &[Row]) -> Result<(QueryKind, String), QueryError> {
    let object = ObjectFlag::from_u8(object_flag)
        .ok_or_else(|| QueryError::Other(format!("unrecognized object flag {object_flag}")))?;
    let grouped = group(rows)?;

    if grouped.type_row.flag != Some(object_flag as i16) {
        return Err(QueryError::Other(
            "type record flag disagrees with object flag".to_string(),
        ));
    }

    let body = match object {
        ObjectFlag::Select => variant::select::render(&grouped)?,
        ObjectFlag::MakeTable => variant::make_table::render(&grouped)?,
        ObjectFlag::Append => variant::append::render(&grouped)?,
        ObjectFlag::Update => variant::update::render(&grouped)?,
        ObjectFlag::Delete => variant::delete::render(&grouped)?,
        ObjectFlag::CrossTab => variant::crosstab::render(&grouped)?,
        ObjectFlag::DataDefinition => variant::data_definition::render(&grouped)?,
        ObjectFlag::Passthrough => variant::passthrough::render(&grouped)?,
        ObjectFlag::Union => variant::union::render(&grouped)?,
    };

    Ok((object.kind(), wrap(object, body, &grouped)))
}

/// Reconstruct a SQL string from a query's raw row set. Structural
/// errors never propagate: they downgrade the result to
/// [`QueryKind::Unknown`] with the original rows preserved.
pub fn reconstruct(object_flag: u8, name: &str, rows: &[Row], _object_id: i32) -> QueryResult {
    match try_reconstruct(object_flag, rows) {
        Ok((kind, sql)) => QueryResult::rendered(kind, sql),
        Err(err) => {
            warn!("query '{name}' degraded to Unknown: {err}");
            QueryResult::unknown(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_row(flag: i16) -> Row {
        Row::new(Attribute::Type).with_flag(flag)
    }

    #[test]
    fn test_simple_select() {
        let rows = vec![
            type_row(0),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let result = reconstruct(0, "Query1", &rows, 1);
        assert_eq!(result.kind, QueryKind::Select);
        assert_eq!(result.sql.as_deref(), Some("SELECT [a] FROM T;"));
    }

    #[test]
    fn test_missing_type_record_is_unknown() {
        let rows = vec![Row::new(Attribute::Table).with_name1("T")];
        let result = reconstruct(0, "Query1", &rows, 1);
        assert_eq!(result.kind, QueryKind::Unknown);
        assert!(result.raw_rows.is_some());
    }

    #[test]
    fn test_mismatched_object_flag_is_unknown() {
        let rows = vec![
            type_row(64),
            Row::new(Attribute::Table).with_name1("T"),
            Row::new(Attribute::Column).with_expression("[a]"),
        ];
        let result = reconstruct(0, "Query1", &rows, 1);
        assert_eq!(result.kind, QueryKind::Unknown);
    }

    #[test]
    fn test_unrecognized_object_flag_is_unknown() {
        let rows = vec![type_row(7)];
        let result = reconstruct(7, "Query1", &rows, 1);
        assert_eq!(result.kind, QueryKind::Unknown);
    }
}
