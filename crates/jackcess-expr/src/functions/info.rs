use crate::value::Value;

use super::date::parse_date_literal;

pub fn is_null(v: &Value) -> Value {
    Value::Bool(v.is_null())
}

pub fn is_numeric(v: &Value) -> Value {
    Value::Bool(v.is_numeric())
}

pub fn is_date(v: &Value) -> Value {
    let result = match v {
        Value::DateTime(_) => true,
        Value::String(s) => parse_date_literal(s).is_some(),
        _ => false,
    };
    Value::Bool(result)
}
