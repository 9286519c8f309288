use std::fmt;

use chrono::NaiveDateTime;

use crate::error::EvalError;

/// A fixed-point decimal, enough to carry Access `Currency`/`Decimal`
/// values through arithmetic without the precision loss of `f64`. Stored
/// as `mantissa * 10^-scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    mantissa: i128,
    scale: u32,
}

impl Decimal {
    pub const SCALE: u32 = 4;

    pub fn new(mantissa: i128, scale: u32) -> Self {
        Decimal { mantissa, scale }
    }

    pub fn from_f64(value: f64) -> Self {
        let scale = Self::SCALE;
        let mantissa = (value * 10f64.powi(scale as i32)).round() as i128;
        Decimal { mantissa, scale }
    }

    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    fn rescale(self, scale: u32) -> Decimal {
        if scale == self.scale {
            return self;
        }
        if scale > self.scale {
            Decimal {
                mantissa: self.mantissa * 10i128.pow(scale - self.scale),
                scale,
            }
        } else {
            Decimal {
                mantissa: self.mantissa / 10i128.pow(self.scale - scale),
                scale,
            }
        }
    }

    pub fn add(self, other: Decimal) -> Decimal {
        let scale = self.scale.max(other.scale);
        let a = self.rescale(scale);
        let b = other.rescale(scale);
        Decimal::new(a.mantissa + b.mantissa, scale)
    }

    pub fn sub(self, other: Decimal) -> Decimal {
        let scale = self.scale.max(other.scale);
        let a = self.rescale(scale);
        let b = other.rescale(scale);
        Decimal::new(a.mantissa - b.mantissa, scale)
    }

    pub fn mul(self, other: Decimal) -> Decimal {
        Decimal::from_f64(self.to_f64() * other.to_f64())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = 10i128.pow(self.scale);
        let whole = self.mantissa / divisor;
        let frac = (self.mantissa % divisor).unsigned_abs();
        write!(f, "{whole}.{frac:0width$}", width = self.scale as usize)
    }
}

/// The evaluator's tagged value type. Bidirectional coercion rules
/// live in `coerce` and the binary-operator dispatch in `ops`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    BigDecimal(Decimal),
    String(String),
    DateTime(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Long(_) | Value::Double(_) | Value::BigDecimal(_) | Value::Bool(_) => true,
            Value::String(s) => parse_numeric_str(s).is_some(),
            _ => false,
        }
    }

    /// Best-effort coercion to `f64`, used for comparisons and arithmetic
    /// that ultimately needs a float. Returns `None` for values with no
    /// sensible numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Long(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            Value::BigDecimal(d) => Some(d.to_f64()),
            Value::Bool(b) => Some(if *b { -1.0 } else { 0.0 }),
            Value::String(s) => parse_numeric_str(s),
            Value::DateTime(dt) => Some(datetime_to_serial(*dt)),
            Value::Null => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64().map(|f| f.trunc() as i64)
    }

    /// Access's default string rendering for a value (used by `&`, `CStr`,
    /// and implicit string coercion).
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Value::Long(n) => n.to_string(),
            Value::Double(d) => format_double(*d),
            Value::BigDecimal(d) => d.to_string(),
            Value::String(s) => s.clone(),
            Value::DateTime(dt) => dt.format("%-m/%-d/%Y %-I:%M:%S %p").to_string(),
        }
    }
}

fn format_double(d: f64) -> String {
    if d.fract() == 0.0 && d.abs() < 1e15 {
        format!("{}", d as i64)
    } else {
        let s = format!("{d}");
        s
    }
}

pub(crate) fn parse_numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    // Access's day-zero is 1899-12-30.
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let delta = dt - epoch;
    delta.num_seconds() as f64 / 86400.0
}

pub(crate) fn serial_to_datetime(serial: f64) -> NaiveDateTime {
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    epoch + chrono::Duration::seconds((serial * 86400.0).round() as i64)
}

/// `12 + "25"` = 37: if both operands coerce to numbers under `+`, sum
/// numerically; otherwise concatenate. `&` always coerces to string and
/// treats null as empty.
pub fn add(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    if let (Value::DateTime(dt), other) | (other, Value::DateTime(dt)) = (lhs, rhs) {
        if let Some(days) = other.as_f64() {
            return Ok(Value::DateTime(serial_to_datetime(
                datetime_to_serial(*dt) + days,
            )));
        }
    }
    if lhs.is_numeric() && rhs.is_numeric() {
        return Ok(numeric_result(lhs.as_f64().unwrap() + rhs.as_f64().unwrap(), lhs, rhs));
    }
    Ok(Value::String(format!(
        "{}{}",
        lhs.to_display_string(),
        rhs.to_display_string()
    )))
}

pub fn concat(lhs: &Value, rhs: &Value) -> Value {
    let l = if lhs.is_null() { String::new() } else { lhs.to_display_string() };
    let r = if rhs.is_null() { String::new() } else { rhs.to_display_string() };
    Value::String(l + &r)
}

pub fn sub(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let (a, b) = numeric_pair(lhs, rhs)?;
    Ok(numeric_result(a - b, lhs, rhs))
}

pub fn mul(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let (a, b) = numeric_pair(lhs, rhs)?;
    Ok(numeric_result(a * b, lhs, rhs))
}

/// `/` promotes to a floating result whenever it isn't an exact integer
///.
pub fn div(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let (a, b) = numeric_pair(lhs, rhs)?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let result = a / b;
    if result.fract() == 0.0 {
        Ok(Value::Long(result as i64))
    } else {
        Ok(Value::Double(result))
    }
}

/// Integer division `\`: truncates both operands to 64-bit integers first.
pub fn int_div(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let a = lhs.as_i64().ok_or_else(|| EvalError::TypeMismatch { expr: "\\".into() })?;
    let b = rhs.as_i64().ok_or_else(|| EvalError::TypeMismatch { expr: "\\".into() })?;
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Long(a / b))
}

pub fn modulo(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let a = lhs.as_i64().ok_or_else(|| EvalError::TypeMismatch { expr: "Mod".into() })?;
    let b = rhs.as_i64().ok_or_else(|| EvalError::TypeMismatch { expr: "Mod".into() })?;
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Long(a % b))
}

pub fn pow(lhs: &Value, rhs: &Value) -> Result<Value, EvalError> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }
    let (a, b) = numeric_pair(lhs, rhs)?;
    Ok(Value::Double(a.powf(b)))
}

fn numeric_pair(lhs: &Value, rhs: &Value) -> Result<(f64, f64), EvalError> {
    let a = lhs.as_f64().ok_or_else(|| EvalError::TypeMismatch { expr: lhs.to_display_string() })?;
    let b = rhs.as_f64().ok_or_else(|| EvalError::TypeMismatch { expr: rhs.to_display_string() })?;
    Ok((a, b))
}

fn numeric_result(n: f64, lhs: &Value, rhs: &Value) -> Value {
    if matches!(lhs, Value::BigDecimal(_)) || matches!(rhs, Value::BigDecimal(_)) {
        Value::BigDecimal(Decimal::from_f64(n))
    } else if n.fract() == 0.0
        && matches!(lhs, Value::Long(_) | Value::Bool(_))
        && matches!(rhs, Value::Long(_) | Value::Bool(_))
    {
        Value::Long(n as i64)
    } else {
        Value::Double(n)
    }
}

pub fn compare(lhs: &Value, rhs: &Value) -> Option<std::cmp::Ordering> {
    if let (Some(a), Some(b)) = (lhs.as_f64(), rhs.as_f64()) {
        if !(matches!(lhs, Value::String(_)) && matches!(rhs, Value::String(_))) {
            return a.partial_cmp(&b);
        }
    }
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Some(a.cmp(b));
    }
    lhs.as_f64()?.partial_cmp(&rhs.as_f64()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_numeric_strings() {
        let result = add(&Value::Long(12), &Value::String("25".into())).unwrap();
        assert_eq!(result, Value::Long(37));
    }

    #[test]
    fn test_add_non_numeric_string_concatenates() {
        let result = add(&Value::Long(12), &Value::String("foo".into())).unwrap();
        assert_eq!(result, Value::String("12foo".into()));
    }

    #[test]
    fn test_null_propagates_through_add() {
        assert_eq!(add(&Value::Null, &Value::Long(1)).unwrap(), Value::Null);
    }

    #[test]
    fn test_concat_treats_null_as_empty() {
        let result = concat(&Value::Null, &Value::String("x".into()));
        assert_eq!(result, Value::String("x".into()));
    }

    #[test]
    fn test_div_promotes_to_double() {
        assert_eq!(div(&Value::Long(5), &Value::Long(2)).unwrap(), Value::Double(2.5));
        assert_eq!(div(&Value::Long(4), &Value::Long(2)).unwrap(), Value::Long(2));
    }

    #[test]
    fn test_div_by_zero_errors() {
        assert_eq!(div(&Value::Long(1), &Value::Long(0)), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_int_div_truncates() {
        assert_eq!(int_div(&Value::Double(7.9), &Value::Double(2.0)).unwrap(), Value::Long(3));
    }
}
