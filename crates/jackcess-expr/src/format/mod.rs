//! `Format()` support: named formats first, falling back to the
//! custom pattern engine for anything else.

mod named;
mod pattern;

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::Value;

pub fn format(v: &Value, spec: Option<&str>, ctx: &dyn EvalContext) -> Result<String, EvalError> {
    let Some(spec) = spec else {
        return Ok(v.to_display_string());
    };
    if let Some(result) = named::apply(spec, v, ctx) {
        return result;
    }
    pattern::apply(v, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleContext;

    #[test]
    fn test_general_date_named_format() {
        let dt = chrono::NaiveDate::from_ymd_opt(2003, 1, 2)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let ctx = SimpleContext::default();
        let result = format(&Value::DateTime(dt), Some("General Date"), &ctx).unwrap();
        assert_eq!(result, "1/2/2003 7:00:00 AM");
    }

    #[test]
    fn test_custom_pattern_falls_back() {
        let ctx = SimpleContext::default();
        let result = format(&Value::Double(1234.5), Some("#,##0.00"), &ctx).unwrap();
        assert_eq!(result, "1,234.50");
    }

    #[test]
    fn test_no_spec_uses_display_string() {
        let ctx = SimpleContext::default();
        let result = format(&Value::Long(5), None, &ctx).unwrap();
        assert_eq!(result, "5");
    }
}
