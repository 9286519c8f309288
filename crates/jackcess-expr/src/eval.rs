//! Tree-walking evaluation of a parsed [`Expression`] against an
//! [`EvalContext`].

use crate::ast::{BinaryOp, CompareOp, Expression, LogicalOp, ObjectRef, UnaryOp};
use crate::context::EvalContext;
use crate::error::EvalError;
use crate::functions;
use crate::like;
use crate::value::{self, Value};

pub fn eval(expr: &Expression, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    match expr {
        Expression::Literal(v) => Ok(v.clone()),
        Expression::ThisColumn => Ok(ctx.this_column_value().cloned().unwrap_or(Value::Null)),
        Expression::ObjectReference(r) => eval_object_ref(r, ctx),
        Expression::Paren(inner) => eval(inner, ctx),
        Expression::Unary { op, expr } => eval_unary(*op, expr, ctx),
        Expression::Binary { op, lhs, rhs } => eval_binary(*op, lhs, rhs, ctx),
        Expression::Compare { op, lhs, rhs } => eval_compare(*op, lhs, rhs, ctx),
        Expression::Logical { op, lhs, rhs } => eval_logical(*op, lhs, rhs, ctx),
        Expression::NullTest { expr, negate } => {
            let v = eval(expr, ctx)?;
            Ok(Value::Bool(v.is_null() != *negate))
        }
        Expression::In { expr, list, negate } => eval_in(expr, list, *negate, ctx),
        Expression::Between { expr, low, high, negate } => eval_between(expr, low, high, *negate, ctx),
        Expression::Like { expr, pattern, negate } => {
            let v = eval(expr, ctx)?;
            if v.is_null() {
                return Ok(Value::Null);
            }
            let matched = like::is_match(pattern, &v.to_display_string());
            Ok(Value::Bool(matched != *negate))
        }
        Expression::Call { name, args } => eval_call(name, args, ctx),
        Expression::ImplicitCompare { op, rhs } => {
            let lhs = ctx.this_column_value().cloned().unwrap_or(Value::Null);
            let rhs = eval(rhs, ctx)?;
            compare_with_op(*op, &lhs, &rhs)
        }
    }
}

fn eval_object_ref(r: &ObjectRef, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    ctx.lookup_value(r.collection.as_deref(), r.object.as_deref(), &r.column)
        .ok_or_else(|| EvalError::UnknownIdentifier(r.column.clone()))
}

fn eval_unary(op: UnaryOp, expr: &Expression, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let v = eval(expr, ctx)?;
    if v.is_null() {
        return Ok(Value::Null);
    }
    match op {
        UnaryOp::Plus => Ok(v),
        UnaryOp::Minus => {
            let n = v.as_f64().ok_or_else(|| EvalError::TypeMismatch { expr: expr.to_debug_string() })?;
            value::sub(&Value::Long(0), &Value::Double(n))
        }
        UnaryOp::Not => match v {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => {
                let n = other.as_i64().ok_or_else(|| EvalError::TypeMismatch { expr: expr.to_debug_string() })?;
                Ok(Value::Long(!n))
            }
        },
    }
}

fn eval_binary(op: BinaryOp, lhs: &Expression, rhs: &Expression, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let l = eval(lhs, ctx)?;
    let r = eval(rhs, ctx)?;
    match op {
        BinaryOp::Add => value::add(&l, &r),
        BinaryOp::Concat => Ok(value::concat(&l, &r)),
        BinaryOp::Sub => value::sub(&l, &r),
        BinaryOp::Mul => value::mul(&l, &r),
        BinaryOp::Div => value::div(&l, &r),
        BinaryOp::IntDiv => value::int_div(&l, &r),
        BinaryOp::Mod => value::modulo(&l, &r),
        BinaryOp::Pow => value::pow(&l, &r),
    }
}

fn eval_compare(op: CompareOp, lhs: &Expression, rhs: &Expression, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let l = eval(lhs, ctx)?;
    let r = eval(rhs, ctx)?;
    compare_with_op(op, &l, &r)
}

fn compare_with_op(op: CompareOp, l: &Value, r: &Value) -> Result<Value, EvalError> {
    if l.is_null() || r.is_null() {
        return Ok(Value::Null);
    }
    let ordering = value::compare(l, r).ok_or(EvalError::TypeMismatch { expr: "comparison".into() })?;
    use std::cmp::Ordering::*;
    let result = match op {
        CompareOp::Eq => ordering == Equal,
        CompareOp::Ne => ordering != Equal,
        CompareOp::Lt => ordering == Less,
        CompareOp::Le => ordering != Greater,
        CompareOp::Gt => ordering == Greater,
        CompareOp::Ge => ordering != Less,
    };
    Ok(Value::Bool(result))
}

/// `And/Or/Xor/Eqv/Imp` over booleans, with null-propagation matching
/// three-valued SQL logic rather than short-circuiting.
fn eval_logical(op: LogicalOp, lhs: &Expression, rhs: &Expression, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let l = eval(lhs, ctx)?;
    let r = eval(rhs, ctx)?;
    let lb = as_tribool(&l)?;
    let rb = as_tribool(&r)?;
    let result = match op {
        LogicalOp::And => match (lb, rb) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        LogicalOp::Or => match (lb, rb) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        LogicalOp::Xor => match (lb, rb) {
            (Some(a), Some(b)) => Some(a != b),
            _ => None,
        },
        LogicalOp::Eqv => match (lb, rb) {
            (Some(a), Some(b)) => Some(a == b),
            _ => None,
        },
        LogicalOp::Imp => match (lb, rb) {
            (Some(false), _) => Some(true),
            (_, Some(true)) => Some(true),
            (Some(true), Some(false)) => Some(false),
            _ => None,
        },
    };
    Ok(result.map(Value::Bool).unwrap_or(Value::Null))
}

fn as_tribool(v: &Value) -> Result<Option<bool>, EvalError> {
    match v {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(*b)),
        other => other
            .as_f64()
            .map(|n| Some(n != 0.0))
            .ok_or(EvalError::TypeMismatch { expr: "logical operand".into() }),
    }
}

fn eval_in(expr: &Expression, list: &[Expression], negate: bool, ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let v = eval(expr, ctx)?;
    if v.is_null() {
        return Ok(Value::Null);
    }
    let mut saw_null = false;
    for item in list {
        let candidate = eval(item, ctx)?;
        if candidate.is_null() {
            saw_null = true;
            continue;
        }
        if value::compare(&v, &candidate) == Some(std::cmp::Ordering::Equal) {
            return Ok(Value::Bool(!negate));
        }
    }
    if saw_null {
        Ok(Value::Null)
    } else {
        Ok(Value::Bool(negate))
    }
}

fn eval_between(
    expr: &Expression,
    low: &Expression,
    high: &Expression,
    negate: bool,
    ctx: &mut dyn EvalContext,
) -> Result<Value, EvalError> {
    let v = eval(expr, ctx)?;
    let lo = eval(low, ctx)?;
    let hi = eval(high, ctx)?;
    if v.is_null() || lo.is_null() || hi.is_null() {
        return Ok(Value::Null);
    }
    let above_low = value::compare(&v, &lo).ok_or(EvalError::TypeMismatch { expr: "Between".into() })?
        != std::cmp::Ordering::Less;
    let below_high = value::compare(&v, &hi).ok_or(EvalError::TypeMismatch { expr: "Between".into() })?
        != std::cmp::Ordering::Greater;
    Ok(Value::Bool((above_low && below_high) != negate))
}

fn eval_call(name: &str, args: &[Expression], ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval(arg, ctx)?);
    }
    functions::call(name, &values, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleContext;
    use crate::parser::{parse, ParseKind};

    fn eval_text(text: &str) -> Value {
        let expr = parse(ParseKind::DefaultValue, text).unwrap();
        let mut ctx = SimpleContext::default();
        eval(&expr, &mut ctx).unwrap()
    }

    #[test]
    fn test_iif_example_from_spec() {
        assert_eq!(eval_text(r#"IIf(10>1,"foo","bar")"#), Value::String("foo".to_string()));
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(eval_text("1 + 2 * 3"), Value::Long(7));
    }

    #[test]
    fn test_null_propagates_through_compare() {
        assert_eq!(eval_text("Null = 1"), Value::Null);
    }

    #[test]
    fn test_and_is_three_valued() {
        assert_eq!(eval_text("False And Null"), Value::Bool(false));
        assert_eq!(eval_text("True And Null"), Value::Null);
    }

    #[test]
    fn test_between() {
        assert_eq!(eval_text("5 Between 1 And 10"), Value::Bool(true));
    }

    #[test]
    fn test_in_list() {
        assert_eq!(eval_text("2 In (1,2,3)"), Value::Bool(true));
        assert_eq!(eval_text("4 Not In (1,2,3)"), Value::Bool(true));
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(eval_text(r#""hello" Like "h*""#), Value::Bool(true));
    }

    #[test]
    fn test_pow_right_associative_value() {
        assert_eq!(eval_text("2 ^ 3 ^ 2"), Value::Double(512.0));
    }

    #[test]
    fn test_format_general_date() {
        let result = eval_text(r#"Format(#1/2/2003 7:00:00 AM#, "General Date")"#);
        assert_eq!(result, Value::String("1/2/2003 7:00:00 AM".to_string()));
    }
}
