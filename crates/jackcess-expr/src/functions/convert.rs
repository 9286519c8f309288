use crate::error::EvalError;
use crate::value::{Decimal, Value};

use super::date::serial_to_datetime;

pub fn c_bool(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::Null => Ok(Value::Null),
        Value::Bool(b) => Ok(Value::Bool(*b)),
        other => other
            .as_f64()
            .map(|f| Value::Bool(f != 0.0))
            .ok_or(EvalError::TypeMismatch { expr: "CBool".into() }),
    }
}

pub fn c_byte(v: &Value) -> Result<Value, EvalError> {
    let n = v.as_i64().ok_or(EvalError::TypeMismatch { expr: "CByte".into() })?;
    if !(0..=255).contains(&n) {
        return Err(EvalError::Overflow);
    }
    Ok(Value::Long(n))
}

pub fn c_int(v: &Value) -> Result<Value, EvalError> {
    v.as_f64()
        .map(|f| Value::Long(f.round() as i64))
        .ok_or(EvalError::TypeMismatch { expr: "CInt".into() })
}

pub fn c_lng(v: &Value) -> Result<Value, EvalError> {
    c_int(v)
}

pub fn c_sng(v: &Value) -> Result<Value, EvalError> {
    v.as_f64().map(Value::Double).ok_or(EvalError::TypeMismatch { expr: "CSng".into() })
}

pub fn c_dbl(v: &Value) -> Result<Value, EvalError> {
    c_sng(v)
}

pub fn c_cur(v: &Value) -> Result<Value, EvalError> {
    v.as_f64()
        .map(|f| Value::BigDecimal(Decimal::from_f64(f)))
        .ok_or(EvalError::TypeMismatch { expr: "CCur".into() })
}

pub fn c_dec(v: &Value) -> Result<Value, EvalError> {
    c_cur(v)
}

pub fn c_str(v: &Value) -> Value {
    Value::String(v.to_display_string())
}

/// `Str(number)`: unlike `CStr`, always reserves the sign column with a
/// leading space for non-negative numbers and never applies locale
/// formatting.
pub fn str_fn(v: &Value) -> Result<Value, EvalError> {
    let n = v.as_f64().ok_or(EvalError::TypeMismatch { expr: "Str".into() })?;
    let digits = if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    };
    let rendered = if n >= 0.0 { format!(" {digits}") } else { digits };
    Ok(Value::String(rendered))
}

pub fn c_date(v: &Value) -> Result<Value, EvalError> {
    match v {
        Value::DateTime(_) => Ok(v.clone()),
        Value::String(s) => super::date::parse_date_literal(s)
            .map(Value::DateTime)
            .ok_or(EvalError::InvalidDateTime),
        other => other
            .as_f64()
            .map(|f| Value::DateTime(serial_to_datetime(f)))
            .ok_or(EvalError::InvalidDateTime),
    }
}

pub fn val(v: &Value) -> Value {
    let text = v.to_display_string();
    let trimmed: String = text.trim_start().chars().take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+' || *c == 'e' || *c == 'E').collect();
    match trimmed.parse::<f64>() {
        Ok(n) if n.fract() == 0.0 => Value::Long(n as i64),
        Ok(n) => Value::Double(n),
        Err(_) => Value::Long(0),
    }
}

pub fn var_type(v: &Value) -> Value {
    let n = match v {
        Value::Null => 1,
        Value::Bool(_) => 11,
        Value::Long(_) => 3,
        Value::Double(_) => 5,
        Value::BigDecimal(_) => 6,
        Value::String(_) => 8,
        Value::DateTime(_) => 7,
    };
    Value::Long(n)
}

pub fn type_name(v: &Value) -> Value {
    let name = match v {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Long(_) => "Long",
        Value::Double(_) => "Double",
        Value::BigDecimal(_) => "Currency",
        Value::String(_) => "String",
        Value::DateTime(_) => "Date",
    };
    Value::String(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_val_parses_leading_numeric_prefix() {
        assert_eq!(val(&Value::String("123abc".into())), Value::Long(123));
    }

    #[test]
    fn test_val_non_numeric_is_zero() {
        assert_eq!(val(&Value::String("abc".into())), Value::Long(0));
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&Value::Long(1)), Value::String("Long".into()));
    }

    #[test]
    fn test_str_fn_reserves_sign_column_for_non_negative() {
        assert_eq!(str_fn(&Value::Long(5)).unwrap(), Value::String(" 5".into()));
    }

    #[test]
    fn test_str_fn_negative_has_no_leading_space() {
        assert_eq!(str_fn(&Value::Long(-5)).unwrap(), Value::String("-5".into()));
    }
}
