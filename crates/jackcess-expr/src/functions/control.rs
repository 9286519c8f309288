use crate::error::EvalError;
use crate::value::Value;

pub fn iif(cond: &Value, when_true: Value, when_false: Value) -> Result<Value, EvalError> {
    match cond {
        Value::Bool(b) => Ok(if *b { when_true } else { when_false }),
        Value::Null => Ok(Value::Null),
        other => match other.as_f64() {
            Some(n) => Ok(if n != 0.0 { when_true } else { when_false }),
            None => Err(EvalError::TypeMismatch { expr: "IIf".into() }),
        },
    }
}

/// `Choose(index, v1, v2, ...)`; 1-based, returns Null when out of range.
pub fn choose(index: &Value, choices: &[Value]) -> Result<Value, EvalError> {
    let n = index.as_i64().ok_or(EvalError::TypeMismatch { expr: "Choose".into() })?;
    if n < 1 || n as usize > choices.len() {
        return Ok(Value::Null);
    }
    Ok(choices[(n - 1) as usize].clone())
}

/// `Switch(cond1, val1, cond2, val2, ...)`; returns the value paired with the
/// first true condition, Null if none match.
pub fn switch(pairs: &[(Value, Value)]) -> Result<Value, EvalError> {
    for (cond, value) in pairs {
        match cond {
            Value::Bool(true) => return Ok(value.clone()),
            Value::Bool(false) | Value::Null => continue,
            other => match other.as_f64() {
                Some(n) if n != 0.0 => return Ok(value.clone()),
                Some(_) => continue,
                None => return Err(EvalError::TypeMismatch { expr: "Switch".into() }),
            },
        }
    }
    Ok(Value::Null)
}

pub fn nz(v: &Value, fallback: Option<Value>) -> Value {
    if v.is_null() {
        fallback.unwrap_or(Value::String(String::new()))
    } else {
        v.clone()
    }
}
