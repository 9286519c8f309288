use jackcess_query::{reconstruct, Attribute, QueryKind, Row};
use pretty_assertions::assert_eq;

#[test]
fn select_query_scenario() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(0),
        Row::new(Attribute::Table).with_name1("T"),
        Row::new(Attribute::Column).with_expression("[a]"),
    ];
    let result = reconstruct(0, "Query1", &rows, 1);
    assert_eq!(result.kind, QueryKind::Select);
    assert_eq!(result.sql.as_deref(), Some("SELECT [a] FROM T;"));
}

#[test]
fn append_with_values_scenario() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(64).with_name1("T"),
        Row::new(Attribute::Column).with_expression("1").with_flag(-0x8000i16),
        Row::new(Attribute::Column)
            .with_expression("\"x\"")
            .with_flag(-0x8000i16),
    ];
    let result = reconstruct(64, "Query2", &rows, 2);
    assert_eq!(result.kind, QueryKind::Append);
    assert_eq!(
        result.sql.as_deref(),
        Some("INSERT INTO T\nVALUES (1, \"x\");")
    );
}

#[test]
fn union_scenario() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(128),
        Row::new(Attribute::Table)
            .with_name2("X7YZ_____1")
            .with_expression("SELECT * FROM a"),
        Row::new(Attribute::Table)
            .with_name2("X7YZ_____2")
            .with_expression("SELECT * FROM b"),
    ];
    let result = reconstruct(128, "Query3", &rows, 3);
    assert_eq!(result.kind, QueryKind::Union);
    assert_eq!(
        result.sql.as_deref(),
        Some("SELECT * FROM a\nUNION ALL SELECT * FROM b;")
    );
}

#[test]
fn compound_join_mismatched_flags_degrades_to_unknown() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(0),
        Row::new(Attribute::Table).with_name1("A"),
        Row::new(Attribute::Table).with_name1("B"),
        Row::new(Attribute::Column).with_expression("[a]"),
        Row::new(Attribute::Join)
            .with_name1("A")
            .with_name2("B")
            .with_flag(1)
            .with_expression("A.id = B.id"),
        Row::new(Attribute::Join)
            .with_name1("A")
            .with_name2("B")
            .with_flag(2)
            .with_expression("A.id2 = B.id2"),
    ];
    let result = reconstruct(0, "Query4", &rows, 4);
    assert_eq!(result.kind, QueryKind::Unknown);
    assert!(result.sql.is_none());
    assert_eq!(result.raw_rows.as_ref().map(Vec::len), Some(rows.len()));
}

#[test]
fn append_with_zero_value_columns_is_insert_select() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(64).with_name1("T"),
        Row::new(Attribute::Table).with_name1("Src"),
        Row::new(Attribute::Column).with_expression("[a]"),
    ];
    let result = reconstruct(64, "Query5", &rows, 5);
    assert_eq!(result.kind, QueryKind::Append);
    assert_eq!(
        result.sql.as_deref(),
        Some("INSERT INTO T SELECT [a] FROM Src;")
    );
}

#[test]
fn duplicate_singular_record_degrades_to_unknown() {
    let rows = vec![
        Row::new(Attribute::Type).with_flag(0),
        Row::new(Attribute::Where).with_expression("1=1"),
        Row::new(Attribute::Where).with_expression("2=2"),
        Row::new(Attribute::Table).with_name1("T"),
        Row::new(Attribute::Column).with_expression("[a]"),
    ];
    let result = reconstruct(0, "Query6", &rows, 6);
    assert_eq!(result.kind, QueryKind::Unknown);
}
