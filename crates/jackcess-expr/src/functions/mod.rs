//! The built-in function library, dispatched by case-insensitive
//! name. Not exhaustive — covers the functions named in the evaluator
//! specification; anything else surfaces as `EvalError::UnknownFunction`.

pub mod control;
pub mod convert;
pub mod date;
pub mod financial;
pub mod info;
pub mod math;
pub mod string;

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::format;
use crate::value::Value;

fn arity_error() -> EvalError {
    EvalError::InvalidFunctionCall
}

fn i64_arg(v: &Value) -> Result<i64, EvalError> {
    v.as_i64().ok_or_else(arity_error)
}

fn f64_arg(v: &Value) -> Result<f64, EvalError> {
    v.as_f64().ok_or_else(arity_error)
}

fn str_arg(v: &Value) -> String {
    v.to_display_string()
}

/// Calls a built-in by name with already-evaluated arguments.
pub fn call(name: &str, args: &[Value], ctx: &mut dyn EvalContext) -> Result<Value, EvalError> {
    let lower = name.to_ascii_lowercase();
    match lower.as_str() {
        // --- control flow ---
        "iif" => match args {
            [cond, t, f] => control::iif(cond, t.clone(), f.clone()),
            _ => Err(arity_error()),
        },
        "choose" => match args {
            [index, rest @ ..] => control::choose(index, rest),
            _ => Err(arity_error()),
        },
        "switch" => {
            if args.len() < 2 || args.len() % 2 != 0 {
                return Err(arity_error());
            }
            let pairs: Vec<(Value, Value)> = args.chunks(2).map(|c| (c[0].clone(), c[1].clone())).collect();
            control::switch(&pairs)
        }
        "nz" => match args {
            [v] => Ok(control::nz(v, None)),
            [v, fallback] => Ok(control::nz(v, Some(fallback.clone()))),
            _ => Err(arity_error()),
        },

        // --- conversion / type info ---
        "cbool" => args.first().ok_or_else(arity_error).and_then(convert::c_bool),
        "cbyte" => args.first().ok_or_else(arity_error).and_then(convert::c_byte),
        "cint" => args.first().ok_or_else(arity_error).and_then(convert::c_int),
        "clng" => args.first().ok_or_else(arity_error).and_then(convert::c_lng),
        "csng" => args.first().ok_or_else(arity_error).and_then(convert::c_sng),
        "cdbl" => args.first().ok_or_else(arity_error).and_then(convert::c_dbl),
        "ccur" => args.first().ok_or_else(arity_error).and_then(convert::c_cur),
        "cdec" => args.first().ok_or_else(arity_error).and_then(convert::c_dec),
        "cdate" => args.first().ok_or_else(arity_error).and_then(convert::c_date),
        "cstr" => args.first().map(convert::c_str).ok_or_else(arity_error),
        "str" => args.first().ok_or_else(arity_error).and_then(convert::str_fn),
        "strconv" => match args {
            [v, conv] => string::str_conv(v, i64_arg(conv)?),
            _ => Err(arity_error()),
        },
        "val" => args.first().map(convert::val).ok_or_else(arity_error),
        "vartype" => args.first().map(convert::var_type).ok_or_else(arity_error),
        "typename" => args.first().map(convert::type_name).ok_or_else(arity_error),
        "isnull" => args.first().map(info::is_null).ok_or_else(arity_error),
        "isnumeric" => args.first().map(info::is_numeric).ok_or_else(arity_error),
        "isdate" => args.first().map(info::is_date).ok_or_else(arity_error),

        // --- string functions ---
        "ucase" => args.first().map(string::ucase).ok_or_else(arity_error),
        "lcase" => args.first().map(string::lcase).ok_or_else(arity_error),
        "ltrim" => args.first().map(string::ltrim).ok_or_else(arity_error),
        "rtrim" => args.first().map(string::rtrim).ok_or_else(arity_error),
        "trim" => args.first().map(string::trim).ok_or_else(arity_error),
        "strreverse" => args.first().map(string::str_reverse).ok_or_else(arity_error),
        "left" => match args {
            [v, n] => string::left(v, i64_arg(n)?),
            _ => Err(arity_error()),
        },
        "right" => match args {
            [v, n] => string::right(v, i64_arg(n)?),
            _ => Err(arity_error()),
        },
        "mid" => match args {
            [v, start] => string::mid(v, i64_arg(start)?, None),
            [v, start, len] => string::mid(v, i64_arg(start)?, Some(i64_arg(len)?)),
            _ => Err(arity_error()),
        },
        "space" => match args {
            [n] => Ok(string::space(i64_arg(n)?)),
            _ => Err(arity_error()),
        },
        "string" => match args {
            [n, c] => Ok(string::string_of(i64_arg(n)?, c)),
            _ => Err(arity_error()),
        },
        "instr" => match args {
            [h, n] => Ok(string::instr(h, n)),
            _ => Err(arity_error()),
        },
        "instrrev" => match args {
            [h, n] => Ok(string::instr_rev(h, n)),
            _ => Err(arity_error()),
        },
        "strcomp" => match args {
            [a, b] => Ok(string::str_comp(a, b)),
            _ => Err(arity_error()),
        },
        "replace" => match args {
            [t, find, rep] => Ok(string::replace(t, find, rep)),
            _ => Err(arity_error()),
        },
        "asc" | "ascw" => args.first().ok_or_else(arity_error).and_then(string::asc),
        "chr" | "chrw" => match args {
            [n] => string::chr(i64_arg(n)?),
            _ => Err(arity_error()),
        },
        "hex" => match args {
            [n] => Ok(string::hex(i64_arg(n)?)),
            _ => Err(arity_error()),
        },
        "oct" => match args {
            [n] => Ok(string::oct(i64_arg(n)?)),
            _ => Err(arity_error()),
        },

        // --- math functions ---
        "abs" => args.first().ok_or_else(arity_error).and_then(math::abs),
        "atn" => args.first().ok_or_else(arity_error).and_then(math::atn),
        "sin" => args.first().ok_or_else(arity_error).and_then(math::sin),
        "cos" => args.first().ok_or_else(arity_error).and_then(math::cos),
        "tan" => args.first().ok_or_else(arity_error).and_then(math::tan),
        "exp" => args.first().ok_or_else(arity_error).and_then(math::exp),
        "log" => args.first().ok_or_else(arity_error).and_then(math::log),
        "sqr" => args.first().ok_or_else(arity_error).and_then(math::sqr),
        "fix" => args.first().ok_or_else(arity_error).and_then(math::fix),
        "int" => args.first().ok_or_else(arity_error).and_then(math::int),
        "sgn" => args.first().ok_or_else(arity_error).and_then(math::sgn),
        "round" => match args {
            [v] => math::round(v, 0),
            [v, digits] => math::round(v, i64_arg(digits)?),
            _ => Err(arity_error()),
        },
        "rnd" => match args {
            [] => math::rnd(None, ctx),
            [seed] => math::rnd(Some(seed), ctx),
            _ => Err(arity_error()),
        },

        // --- date/time functions ---
        "now" => Ok(date::now(ctx)),
        "date" => Ok(date::date(ctx)),
        "time" => Ok(date::time(ctx)),
        "datevalue" => args.first().ok_or_else(arity_error).and_then(date::date_value),
        "timevalue" => args.first().ok_or_else(arity_error).and_then(date::time_value),
        "weekdayname" => match args {
            [w] => date::weekday_name(i64_arg(w)?, false, 1),
            [w, abbrev] => date::weekday_name(i64_arg(w)?, truthy(abbrev), 1),
            [w, abbrev, fdow] => date::weekday_name(i64_arg(w)?, truthy(abbrev), i64_arg(fdow)?),
            _ => Err(arity_error()),
        },
        "monthname" => match args {
            [m] => date::month_name(i64_arg(m)?, false),
            [m, abbrev] => date::month_name(i64_arg(m)?, truthy(abbrev)),
            _ => Err(arity_error()),
        },
        "datepart" => match args {
            [interval, v] => date::date_part(&str_arg(interval), v, &*ctx, None),
            [interval, v, fdow] => date::date_part(&str_arg(interval), v, &*ctx, Some(i64_arg(fdow)?)),
            _ => Err(arity_error()),
        },
        "year" => args.first().ok_or_else(arity_error).and_then(date::year),
        "month" => args.first().ok_or_else(arity_error).and_then(date::month),
        "day" => args.first().ok_or_else(arity_error).and_then(date::day),
        "hour" => args.first().ok_or_else(arity_error).and_then(date::hour),
        "minute" => args.first().ok_or_else(arity_error).and_then(date::minute),
        "second" => args.first().ok_or_else(arity_error).and_then(date::second),
        "weekday" => args.first().ok_or_else(arity_error).and_then(date::weekday),
        "dateadd" => match args {
            [interval, amount, v] => date::date_add(&str_arg(interval), f64_arg(amount)?, v),
            _ => Err(arity_error()),
        },
        "datediff" => match args {
            [interval, a, b] => date::date_diff(&str_arg(interval), a, b),
            _ => Err(arity_error()),
        },
        "dateserial" => match args {
            [y, m, d] => date::date_serial(i64_arg(y)?, i64_arg(m)?, i64_arg(d)?),
            _ => Err(arity_error()),
        },
        "timeserial" => match args {
            [h, m, s] => Ok(date::time_serial(i64_arg(h)?, i64_arg(m)?, i64_arg(s)?)),
            _ => Err(arity_error()),
        },

        // --- financial functions ---
        "pv" => match args {
            [rate, nper, pmt, fv, due] => {
                financial::pv(f64_arg(rate)?, f64_arg(nper)?, f64_arg(pmt)?, f64_arg(fv)?, truthy(due))
                    .map(Value::Double)
            }
            _ => Err(arity_error()),
        },
        "fv" => match args {
            [rate, nper, pmt, pv, due] => {
                financial::fv(f64_arg(rate)?, f64_arg(nper)?, f64_arg(pmt)?, f64_arg(pv)?, truthy(due))
                    .map(Value::Double)
            }
            _ => Err(arity_error()),
        },
        "pmt" => match args {
            [rate, nper, pv, fv, due] => {
                financial::pmt(f64_arg(rate)?, f64_arg(nper)?, f64_arg(pv)?, f64_arg(fv)?, truthy(due))
                    .map(Value::Double)
            }
            _ => Err(arity_error()),
        },
        "ipmt" => match args {
            [rate, per, nper, pv, fv, due] => financial::ipmt(
                f64_arg(rate)?,
                f64_arg(per)?,
                f64_arg(nper)?,
                f64_arg(pv)?,
                f64_arg(fv)?,
                truthy(due),
            )
            .map(Value::Double),
            _ => Err(arity_error()),
        },
        "ppmt" => match args {
            [rate, per, nper, pv, fv, due] => financial::ppmt(
                f64_arg(rate)?,
                f64_arg(per)?,
                f64_arg(nper)?,
                f64_arg(pv)?,
                f64_arg(fv)?,
                truthy(due),
            )
            .map(Value::Double),
            _ => Err(arity_error()),
        },
        "ddb" => match args {
            [cost, salvage, life, period, factor] => Ok(Value::Double(financial::ddb(
                f64_arg(cost)?,
                f64_arg(salvage)?,
                f64_arg(life)?,
                f64_arg(period)?,
                f64_arg(factor)?,
            ))),
            [cost, salvage, life, period] => Ok(Value::Double(financial::ddb(
                f64_arg(cost)?,
                f64_arg(salvage)?,
                f64_arg(life)?,
                f64_arg(period)?,
                2.0,
            ))),
            _ => Err(arity_error()),
        },
        "sln" => match args {
            [cost, salvage, life] => Ok(Value::Double(financial::sln(f64_arg(cost)?, f64_arg(salvage)?, f64_arg(life)?))),
            _ => Err(arity_error()),
        },
        "syd" => match args {
            [cost, salvage, life, period] => Ok(Value::Double(financial::syd(
                f64_arg(cost)?,
                f64_arg(salvage)?,
                f64_arg(life)?,
                f64_arg(period)?,
            ))),
            _ => Err(arity_error()),
        },
        "nper" => match args {
            [rate, pmt, pv, fv, due] => {
                financial::nper(f64_arg(rate)?, f64_arg(pmt)?, f64_arg(pv)?, f64_arg(fv)?, truthy(due))
                    .map(Value::Double)
            }
            _ => Err(arity_error()),
        },
        "rate" => match args {
            [nper, pmt, pv, fv, due, guess] => financial::rate(
                f64_arg(nper)?,
                f64_arg(pmt)?,
                f64_arg(pv)?,
                f64_arg(fv)?,
                truthy(due),
                f64_arg(guess)?,
            )
            .map(Value::Double),
            [nper, pmt, pv, fv] => {
                financial::rate(f64_arg(nper)?, f64_arg(pmt)?, f64_arg(pv)?, f64_arg(fv)?, false, 0.0)
                    .map(Value::Double)
            }
            _ => Err(arity_error()),
        },

        // --- Format() family ---
        "format" => match args {
            [v] => format::format(v, None, &*ctx).map(Value::String),
            [v, spec] => format::format(v, Some(&str_arg(spec)), &*ctx).map(Value::String),
            _ => Err(arity_error()),
        },
        "formatnumber" => args.first().ok_or_else(arity_error).and_then(|v| {
            format::format(v, Some("Standard"), &*ctx).map(Value::String)
        }),
        "formatpercent" => args.first().ok_or_else(arity_error).and_then(|v| {
            format::format(v, Some("Percent"), &*ctx).map(Value::String)
        }),
        "formatcurrency" => args.first().ok_or_else(arity_error).and_then(|v| {
            format::format(v, Some("Currency"), &*ctx).map(Value::String)
        }),
        "formatdatetime" => args.first().ok_or_else(arity_error).and_then(|v| {
            format::format(v, Some("General Date"), &*ctx).map(Value::String)
        }),

        _ => {
            log::warn!("unknown expression function {name:?}");
            Err(EvalError::UnknownFunction(name.to_string()))
        }
    }
}

fn truthy(v: &Value) -> bool {
    v.as_f64().map(|n| n != 0.0).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleContext;

    #[test]
    fn test_iif_dispatch() {
        let mut ctx = SimpleContext::default();
        let result = call("IIf", &[Value::Bool(true), Value::Long(1), Value::Long(2)], &mut ctx).unwrap();
        assert_eq!(result, Value::Long(1));
    }

    #[test]
    fn test_unknown_function_errors() {
        let mut ctx = SimpleContext::default();
        let result = call("NoSuchFunction", &[], &mut ctx);
        assert!(matches!(result, Err(EvalError::UnknownFunction(_))));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut ctx = SimpleContext::default();
        let result = call("uCaSe", &[Value::String("abc".into())], &mut ctx).unwrap();
        assert_eq!(result, Value::String("ABC".into()));
    }
}
