use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::context::EvalContext;
use crate::error::EvalError;
use crate::value::Value;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

pub fn serial_to_datetime(serial: f64) -> NaiveDateTime {
    epoch() + Duration::seconds((serial * 86400.0).round() as i64)
}

pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    (dt - epoch()).num_seconds() as f64 / 86400.0
}

fn to_datetime(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::DateTime(dt) => Some(*dt),
        other => other.as_f64().map(serial_to_datetime),
    }
}

/// Parses the text between `#...#` date literal delimiters. Accepts
/// `M/D/YYYY`, `M/D/YYYY h:mm:ss AM/PM`, and plain `h:mm:ss`.
pub fn parse_date_literal(text: &str) -> Option<NaiveDateTime> {
    let formats = [
        "%m/%d/%Y %I:%M:%S %p",
        "%m/%d/%Y %H:%M:%S",
        "%m/%d/%Y",
        "%H:%M:%S",
        "%I:%M:%S %p",
    ];
    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
        if let Ok(time) = NaiveTime::parse_from_str(text, fmt) {
            return Some(epoch().date().and_time(time));
        }
    }
    None
}

pub fn now(_ctx: &mut dyn EvalContext) -> Value {
    Value::DateTime(chrono::Local::now().naive_local())
}

/// Today's date with the time portion zeroed out.
pub fn date(_ctx: &mut dyn EvalContext) -> Value {
    let today = chrono::Local::now().naive_local().date();
    Value::DateTime(today.and_hms_opt(0, 0, 0).unwrap())
}

/// The current time-of-day, carried on the epoch date (no date component).
pub fn time(_ctx: &mut dyn EvalContext) -> Value {
    let now = chrono::Local::now().naive_local();
    Value::DateTime(epoch().date().and_time(now.time()))
}

pub fn year(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.year() as i64))
}

pub fn month(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.month() as i64))
}

pub fn day(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.day() as i64))
}

pub fn hour(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.hour() as i64))
}

pub fn minute(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.minute() as i64))
}

pub fn second(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::Long(dt.second() as i64))
}

/// 1 (Sunday) .. 7 (Saturday), matching the Access default week numbering.
pub fn weekday(v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    let n = dt.weekday().num_days_from_sunday() + 1;
    Ok(Value::Long(n as i64))
}

pub fn date_add(interval: &str, amount: f64, v: &Value) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    let result = match interval.to_ascii_lowercase().as_str() {
        "yyyy" => dt
            .with_year(dt.year() + amount as i32)
            .ok_or(EvalError::InvalidDateTime)?,
        "m" => {
            let total_months = dt.year() * 12 + dt.month() as i32 - 1 + amount as i32;
            let year = total_months.div_euclid(12);
            let month = total_months.rem_euclid(12) + 1;
            dt.with_year(year)
                .and_then(|d| d.with_month(month as u32))
                .ok_or(EvalError::InvalidDateTime)?
        }
        "d" | "y" => dt + Duration::days(amount as i64),
        "w" => dt + Duration::weeks(amount as i64),
        "h" => dt + Duration::hours(amount as i64),
        "n" => dt + Duration::minutes(amount as i64),
        "s" => dt + Duration::seconds(amount as i64),
        _ => return Err(EvalError::InvalidFunctionCall),
    };
    Ok(Value::DateTime(result))
}

pub fn date_diff(interval: &str, a: &Value, b: &Value) -> Result<Value, EvalError> {
    let a = to_datetime(a).ok_or(EvalError::InvalidDateTime)?;
    let b = to_datetime(b).ok_or(EvalError::InvalidDateTime)?;
    let delta = b - a;
    let n = match interval.to_ascii_lowercase().as_str() {
        "yyyy" => (b.year() - a.year()) as i64,
        "m" => (b.year() - a.year()) as i64 * 12 + b.month() as i64 - a.month() as i64,
        "d" | "y" => delta.num_days(),
        "w" => delta.num_weeks(),
        "h" => delta.num_hours(),
        "n" => delta.num_minutes(),
        "s" => delta.num_seconds(),
        _ => return Err(EvalError::InvalidFunctionCall),
    };
    Ok(Value::Long(n))
}

pub fn date_serial(year: i64, month: i64, day: i64) -> Result<Value, EvalError> {
    let base = NaiveDate::from_ymd_opt(year as i32, 1, 1).ok_or(EvalError::InvalidDateTime)?;
    let shifted = if month >= 1 {
        base.checked_add_months(Months::new((month - 1) as u32))
    } else {
        base.checked_sub_months(Months::new((1 - month) as u32))
    }
    .ok_or(EvalError::InvalidDateTime)?;
    let date = shifted + Duration::days(day - 1);
    Ok(Value::DateTime(date.and_hms_opt(0, 0, 0).unwrap()))
}

pub fn time_serial(hour: i64, minute: i64, second: i64) -> Value {
    Value::DateTime(epoch() + Duration::hours(hour) + Duration::minutes(minute) + Duration::seconds(second))
}

fn literal_or_datetime(v: &Value) -> Option<NaiveDateTime> {
    match v {
        Value::String(s) => parse_date_literal(s),
        other => to_datetime(other),
    }
}

/// The date portion of `v`, with the time set to midnight.
pub fn date_value(v: &Value) -> Result<Value, EvalError> {
    let dt = literal_or_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::DateTime(dt.date().and_hms_opt(0, 0, 0).unwrap()))
}

/// The time-of-day portion of `v`, carried on the epoch date.
pub fn time_value(v: &Value) -> Result<Value, EvalError> {
    let dt = literal_or_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    Ok(Value::DateTime(epoch().date().and_time(dt.time())))
}

const LONG_WEEKDAYS: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];
const SHORT_WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const LONG_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const SHORT_MONTHS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// `weekday` is 1-based according to `first_day_of_week` (1 = Sunday, the
/// Access default).
pub fn weekday_name(weekday: i64, abbreviate: bool, first_day_of_week: i64) -> Result<Value, EvalError> {
    if !(1..=7).contains(&weekday) {
        return Err(EvalError::InvalidFunctionCall);
    }
    let first = if (1..=7).contains(&first_day_of_week) { first_day_of_week } else { 1 };
    let sunday_based = (weekday - 1 + (first - 1)).rem_euclid(7) as usize;
    let name = if abbreviate { SHORT_WEEKDAYS[sunday_based] } else { LONG_WEEKDAYS[sunday_based] };
    Ok(Value::String(name.to_string()))
}

pub fn month_name(month: i64, abbreviate: bool) -> Result<Value, EvalError> {
    if !(1..=12).contains(&month) {
        return Err(EvalError::InvalidFunctionCall);
    }
    let idx = (month - 1) as usize;
    let name = if abbreviate { SHORT_MONTHS[idx] } else { LONG_MONTHS[idx] };
    Ok(Value::String(name.to_string()))
}

/// `DatePart(interval, date, [firstdayofweek])`; `first_day_of_week`
/// defaults to the context's `TemporalConfig` when not overridden.
pub fn date_part(
    interval: &str,
    v: &Value,
    ctx: &dyn EvalContext,
    first_day_of_week: Option<i64>,
) -> Result<Value, EvalError> {
    let dt = to_datetime(v).ok_or(EvalError::InvalidDateTime)?;
    let first_day = first_day_of_week.unwrap_or(ctx.temporal_config().first_day_of_week as i64).max(1);
    let n = match interval.to_ascii_lowercase().as_str() {
        "yyyy" => dt.year() as i64,
        "q" => (dt.month0() / 3 + 1) as i64,
        "m" => dt.month() as i64,
        "y" => dt.ordinal() as i64,
        "d" => dt.day() as i64,
        "w" => {
            let sunday_based = dt.weekday().num_days_from_sunday() as i64;
            (sunday_based - (first_day - 1)).rem_euclid(7) + 1
        }
        "ww" => dt.iso_week().week() as i64,
        "h" => dt.hour() as i64,
        "n" => dt.minute() as i64,
        "s" => dt.second() as i64,
        _ => return Err(EvalError::InvalidFunctionCall),
    };
    Ok(Value::Long(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimpleContext;

    #[test]
    fn test_date_value_drops_time() {
        let v = Value::String("1/2/2003 7:00:00 AM".to_string());
        let result = date_value(&v).unwrap();
        assert_eq!(result, Value::DateTime(NaiveDate::from_ymd_opt(2003, 1, 2).unwrap().and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_time_value_drops_date() {
        let v = Value::String("1/2/2003 7:00:00 AM".to_string());
        let result = time_value(&v).unwrap();
        assert_eq!(result, Value::DateTime(epoch() + Duration::hours(7)));
    }

    #[test]
    fn test_weekday_name_respects_first_day_of_week() {
        assert_eq!(weekday_name(1, false, 1).unwrap(), Value::String("Sunday".to_string()));
        assert_eq!(weekday_name(1, true, 2).unwrap(), Value::String("Mon".to_string()));
    }

    #[test]
    fn test_month_name_abbreviated() {
        assert_eq!(month_name(3, true).unwrap(), Value::String("Mar".to_string()));
        assert_eq!(month_name(3, false).unwrap(), Value::String("March".to_string()));
    }

    #[test]
    fn test_date_part_quarter() {
        let dt = NaiveDate::from_ymd_opt(2003, 8, 15).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let ctx = SimpleContext::default();
        let result = date_part("q", &Value::DateTime(dt), &ctx, None).unwrap();
        assert_eq!(result, Value::Long(3));
    }

    #[test]
    fn test_date_and_time_split_components() {
        let mut ctx = SimpleContext::default();
        let today = date(&mut ctx);
        if let Value::DateTime(dt) = today {
            assert_eq!(dt.time(), chrono::NaiveTime::MIN);
        } else {
            panic!("expected DateTime");
        }
        let tod = time(&mut ctx);
        if let Value::DateTime(dt) = tod {
            assert_eq!(dt.date(), epoch().date());
        } else {
            panic!("expected DateTime");
        }
    }
}
