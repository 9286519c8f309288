use jackcess_expr::{evaluate, ParseKind, SimpleContext, Value};
use pretty_assertions::assert_eq;

#[test]
fn iif_picks_the_true_branch() {
    let mut ctx = SimpleContext::default();
    let result = evaluate(ParseKind::DefaultValue, r#"IIf(10>1,"foo","bar")"#, &mut ctx).unwrap();
    assert_eq!(result, Value::String("foo".to_string()));
}

#[test]
fn format_general_date_matches_spec_example() {
    let mut ctx = SimpleContext::default();
    let result = evaluate(
        ParseKind::DefaultValue,
        r#"Format(#1/2/2003 7:00:00 AM#, "General Date")"#,
        &mut ctx,
    )
    .unwrap();
    assert_eq!(result, Value::String("1/2/2003 7:00:00 AM".to_string()));
}

#[test]
fn cdbl_of_cstr_round_trips_for_integers() {
    let mut ctx = SimpleContext::default();
    let original = evaluate(ParseKind::DefaultValue, "42", &mut ctx).unwrap();
    let roundtripped = evaluate(ParseKind::DefaultValue, "CDbl(CStr(42))", &mut ctx).unwrap();
    assert_eq!(original.as_f64(), roundtripped.as_f64());
}

#[test]
fn field_validator_bare_compare_uses_this_column() {
    let mut ctx = SimpleContext::default();
    ctx.this_column = Some(Value::Long(5));
    let result = evaluate(ParseKind::FieldValidator, "Between 1 And 10", &mut ctx).unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn record_validator_rejects_out_of_range_value() {
    let mut ctx = SimpleContext::default();
    ctx.this_column = Some(Value::Long(-1));
    let result = evaluate(ParseKind::FieldValidator, "> 0", &mut ctx).unwrap();
    assert_eq!(result, Value::Bool(false));
}

#[test]
fn like_with_wildcard_and_char_class() {
    let mut ctx = SimpleContext::default();
    let result = evaluate(ParseKind::DefaultValue, r#""Smith123" Like "[A-Z]*###""#, &mut ctx).unwrap();
    assert_eq!(result, Value::Bool(true));
}

#[test]
fn nested_function_calls_and_concatenation() {
    let mut ctx = SimpleContext::default();
    let result = evaluate(ParseKind::DefaultValue, r#"UCase(Left("hello world", 5)) & "!""#, &mut ctx).unwrap();
    assert_eq!(result, Value::String("HELLO!".to_string()));
}
