use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::Value;

fn f(v: &Value) -> Result<f64, EvalError> {
    v.as_f64().ok_or(EvalError::TypeMismatch { expr: "numeric function".into() })
}

pub fn abs(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.abs()))
}

pub fn atn(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.atan()))
}

pub fn sin(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.sin()))
}

pub fn cos(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.cos()))
}

pub fn tan(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.tan()))
}

pub fn exp(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Double(f(v)?.exp()))
}

pub fn log(v: &Value) -> Result<Value, EvalError> {
    let n = f(v)?;
    if n <= 0.0 {
        return Err(EvalError::Other("Log requires a positive argument".to_string()));
    }
    Ok(Value::Double(n.ln()))
}

pub fn sqr(v: &Value) -> Result<Value, EvalError> {
    let n = f(v)?;
    if n < 0.0 {
        return Err(EvalError::Other("Sqr requires a non-negative argument".to_string()));
    }
    Ok(Value::Double(n.sqrt()))
}

pub fn fix(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Long(f(v)?.trunc() as i64))
}

pub fn int(v: &Value) -> Result<Value, EvalError> {
    Ok(Value::Long(f(v)?.floor() as i64))
}

pub fn sgn(v: &Value) -> Result<Value, EvalError> {
    let n = f(v)?;
    Ok(Value::Long(if n > 0.0 { 1 } else if n < 0.0 { -1 } else { 0 }))
}

pub fn round(v: &Value, digits: i64) -> Result<Value, EvalError> {
    let n = f(v)?;
    let factor = 10f64.powi(digits as i32);
    Ok(Value::Double((n * factor).round() / factor))
}

pub fn rnd(v: Option<&Value>, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    if let Some(Value::Long(seed)) = v {
        ctx.random().reseed(*seed as u64);
    }
    Ok(Value::Double(ctx.random().next_unit_f64()))
}
