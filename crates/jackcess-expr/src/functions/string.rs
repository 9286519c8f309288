use crate::error::EvalError;
use crate::value::Value;

fn s(v: &Value) -> String {
    v.to_display_string()
}

pub fn ucase(v: &Value) -> Value {
    Value::String(s(v).to_uppercase())
}

pub fn lcase(v: &Value) -> Value {
    Value::String(s(v).to_lowercase())
}

pub fn left(v: &Value, n: i64) -> Result<Value, EvalError> {
    let text = s(v);
    let n = n.max(0) as usize;
    Ok(Value::String(text.chars().take(n).collect()))
}

pub fn right(v: &Value, n: i64) -> Result<Value, EvalError> {
    let text = s(v);
    let len = text.chars().count();
    let n = (n.max(0) as usize).min(len);
    Ok(Value::String(text.chars().skip(len - n).collect()))
}

pub fn mid(v: &Value, start: i64, length: Option<i64>) -> Result<Value, EvalError> {
    if start < 1 {
        return Err(EvalError::InvalidFunctionCall);
    }
    let text = s(v);
    let chars: Vec<char> = text.chars().collect();
    let start = (start - 1) as usize;
    if start >= chars.len() {
        return Ok(Value::String(String::new()));
    }
    let take = length.map(|n| n.max(0) as usize).unwrap_or(chars.len() - start);
    Ok(Value::String(chars[start..].iter().take(take).collect()))
}

pub fn ltrim(v: &Value) -> Value {
    Value::String(s(v).trim_start().to_string())
}

pub fn rtrim(v: &Value) -> Value {
    Value::String(s(v).trim_end().to_string())
}

pub fn trim(v: &Value) -> Value {
    Value::String(s(v).trim().to_string())
}

pub fn space(n: i64) -> Value {
    Value::String(" ".repeat(n.max(0) as usize))
}

pub fn string_of(n: i64, c: &Value) -> Value {
    let fill = s(c).chars().next().unwrap_or(' ');
    Value::String(fill.to_string().repeat(n.max(0) as usize))
}

/// 1-based position of `needle` in `haystack`, or 0 if absent (`InStr`).
pub fn instr(haystack: &Value, needle: &Value) -> Value {
    let h = s(haystack);
    let n = s(needle);
    if n.is_empty() {
        return Value::Long(1);
    }
    match h.find(&n) {
        Some(byte_idx) => Value::Long(h[..byte_idx].chars().count() as i64 + 1),
        None => Value::Long(0),
    }
}

pub fn instr_rev(haystack: &Value, needle: &Value) -> Value {
    let h = s(haystack);
    let n = s(needle);
    if n.is_empty() {
        return Value::Long(h.chars().count() as i64 + 1);
    }
    match h.rfind(&n) {
        Some(byte_idx) => Value::Long(h[..byte_idx].chars().count() as i64 + 1),
        None => Value::Long(0),
    }
}

pub fn str_comp(a: &Value, b: &Value) -> Value {
    use std::cmp::Ordering;
    match s(a).cmp(&s(b)) {
        Ordering::Less => Value::Long(-1),
        Ordering::Equal => Value::Long(0),
        Ordering::Greater => Value::Long(1),
    }
}

pub fn str_reverse(v: &Value) -> Value {
    Value::String(s(v).chars().rev().collect())
}

pub fn replace(text: &Value, find: &Value, replacement: &Value) -> Value {
    Value::String(s(text).replace(&s(find), &s(replacement)))
}

pub fn asc(v: &Value) -> Result<Value, EvalError> {
    s(v).chars().next().map(|c| Value::Long(c as i64)).ok_or(EvalError::InvalidFunctionCall)
}

pub fn chr(code: i64) -> Result<Value, EvalError> {
    char::from_u32(code as u32)
        .map(|c| Value::String(c.to_string()))
        .ok_or(EvalError::InvalidFunctionCall)
}

pub fn hex(n: i64) -> Value {
    Value::String(format!("{n:X}"))
}

pub fn oct(n: i64) -> Value {
    Value::String(format!("{n:o}"))
}

/// `StrConv(string, conversion)`; supports the case-conversion constants
/// (`vbUpperCase` = 1, `vbLowerCase` = 2, `vbProperCase` = 3). Other
/// `StrConv` constants (`vbUnicode`, `vbWide`, `vbNarrow`, kana conversions)
/// have no meaning for a Rust `String` and are rejected.
pub fn str_conv(v: &Value, conversion: i64) -> Result<Value, EvalError> {
    let text = s(v);
    let result = match conversion {
        1 => text.to_uppercase(),
        2 => text.to_lowercase(),
        3 => proper_case(&text),
        _ => return Err(EvalError::InvalidFunctionCall),
    };
    Ok(Value::String(result))
}

fn proper_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize_next = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if capitalize_next {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            capitalize_next = false;
        } else {
            out.push(c);
            capitalize_next = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_no_length_takes_rest() {
        assert_eq!(mid(&Value::String("hello".into()), 2, None).unwrap(), Value::String("ello".into()));
    }

    #[test]
    fn test_instr_not_found_is_zero() {
        assert_eq!(instr(&Value::String("abc".into()), &Value::String("z".into())), Value::Long(0));
    }

    #[test]
    fn test_left_right() {
        assert_eq!(left(&Value::String("hello".into()), 2).unwrap(), Value::String("he".into()));
        assert_eq!(right(&Value::String("hello".into()), 2).unwrap(), Value::String("lo".into()));
    }

    #[test]
    fn test_str_conv_proper_case() {
        let result = str_conv(&Value::String("hello world".into()), 3).unwrap();
        assert_eq!(result, Value::String("Hello World".into()));
    }

    #[test]
    fn test_str_conv_unsupported_constant_errors() {
        assert!(str_conv(&Value::String("x".into()), 64).is_err());
    }
}
