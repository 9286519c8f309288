//! The predefined named formats (`Format(x, "Currency")`, etc.), as opposed
//! to custom pattern strings handled by [`super::pattern`].

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::Value;

use super::pattern;

fn number(v: &Value) -> Result<f64, EvalError> {
    v.as_f64().ok_or(EvalError::TypeMismatch { expr: "Format".into() })
}

pub fn general_number(v: &Value) -> Result<String, EvalError> {
    let n = number(v)?;
    Ok(if n.fract() == 0.0 { format!("{}", n as i64) } else { format!("{n}") })
}

pub fn fixed(v: &Value) -> Result<String, EvalError> {
    Ok(format!("{:.2}", number(v)?))
}

pub fn standard(v: &Value) -> Result<String, EvalError> {
    pattern::apply(v, "#,##0.00")
}

pub fn currency(v: &Value) -> Result<String, EvalError> {
    Ok(format!("${:.2}", number(v)?))
}

pub fn euro(v: &Value) -> Result<String, EvalError> {
    Ok(format!("\u{20ac}{:.2}", number(v)?))
}

pub fn percent(v: &Value) -> Result<String, EvalError> {
    Ok(format!("{:.2}%", number(v)? * 100.0))
}

pub fn scientific(v: &Value) -> Result<String, EvalError> {
    Ok(format!("{:E}", number(v)?))
}

pub fn yes_no(v: &Value) -> Result<String, EvalError> {
    Ok(if number(v)? != 0.0 { "Yes" } else { "No" }.to_string())
}

pub fn true_false(v: &Value) -> Result<String, EvalError> {
    Ok(if number(v)? != 0.0 { "True" } else { "False" }.to_string())
}

pub fn on_off(v: &Value) -> Result<String, EvalError> {
    Ok(if number(v)? != 0.0 { "On" } else { "Off" }.to_string())
}

fn datetime(v: &Value) -> Result<chrono::NaiveDateTime, EvalError> {
    match v {
        Value::DateTime(dt) => Ok(*dt),
        other => other
            .as_f64()
            .map(crate::functions::date::serial_to_datetime)
            .ok_or(EvalError::InvalidDateTime),
    }
}

pub fn general_date(v: &Value) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    if dt.time() == chrono::NaiveTime::MIN {
        Ok(dt.format("%-m/%-d/%Y").to_string())
    } else {
        Ok(dt.format("%-m/%-d/%Y %-I:%M:%S %p").to_string())
    }
}

pub fn long_date(v: &Value, ctx: &dyn EvalContext) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    pattern::apply_date(dt, &ctx.temporal_config().long_date_pattern.clone())
}

pub fn medium_date(v: &Value) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    Ok(dt.format("%d-%b-%y").to_string())
}

pub fn short_date(v: &Value, ctx: &dyn EvalContext) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    pattern::apply_date(dt, &ctx.temporal_config().short_date_pattern.clone())
}

pub fn long_time(v: &Value) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    Ok(dt.format("%-I:%M:%S %p").to_string())
}

pub fn medium_time(v: &Value) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    Ok(dt.format("%-I:%M %p").to_string())
}

pub fn short_time(v: &Value) -> Result<String, EvalError> {
    let dt = datetime(v)?;
    Ok(dt.format("%H:%M").to_string())
}

/// Resolves a named format's string, or `None` if `name` isn't one of the
/// predefined names (the caller falls back to the custom pattern engine).
pub fn apply(name: &str, v: &Value, ctx: &dyn EvalContext) -> Option<Result<String, EvalError>> {
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        "general number" => general_number(v),
        "fixed" => fixed(v),
        "standard" => standard(v),
        "currency" => currency(v),
        "euro" => euro(v),
        "percent" => percent(v),
        "scientific" => scientific(v),
        "yes/no" => yes_no(v),
        "true/false" => true_false(v),
        "on/off" => on_off(v),
        "general date" => general_date(v),
        "long date" => long_date(v, ctx),
        "medium date" => medium_date(v),
        "short date" => short_date(v, ctx),
        "long time" => long_time(v),
        "medium time" => medium_time(v),
        "short time" => short_time(v),
        _ => return None,
    })
}
