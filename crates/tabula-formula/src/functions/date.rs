//! Date/time functions
//!
//! `NOW()` and `TODAY()` read the clock carried by the evaluation context and
//! are the only functions whose result is not determined by their arguments.
//! Dates are exchanged as ISO-8601 text in UTC.

use super::arg;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{EvaluationContext, FormulaValue};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// NOW(): current instant, e.g. `2024-03-15T08:30:00.000Z`
pub fn fn_now(_args: &[FormulaValue], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::String(
        ctx.now.to_rfc3339_opts(SecondsFormat::Millis, true),
    ))
}

/// TODAY(): current date as `YYYY-MM-DD`
pub fn fn_today(_args: &[FormulaValue], ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::String(ctx.now.format("%Y-%m-%d").to_string()))
}

/// DAYS(date1, date2): absolute number of whole days between two dates
pub fn fn_days(args: &[FormulaValue], _ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let first = parse_date(arg(args, 0))?;
    let second = parse_date(arg(args, 1))?;

    let millis = (first - second).num_milliseconds().abs();
    Ok(FormulaValue::Number((millis / MILLIS_PER_DAY) as f64))
}

/// Interpret a value as an instant
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD` dates (midnight UTC), naive
/// `YYYY-MM-DDTHH:MM:SS` timestamps (UTC), and numbers as epoch milliseconds.
pub fn parse_date(value: &FormulaValue) -> FormulaResult<DateTime<Utc>> {
    let invalid = || FormulaError::InvalidDate(value.as_string());

    match value {
        FormulaValue::Number(ms) if ms.is_finite() => {
            DateTime::from_timestamp_millis(*ms as i64).ok_or_else(invalid)
        }
        FormulaValue::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date
                    .and_hms_opt(0, 0, 0)
                    .map(|dt| dt.and_utc())
                    .ok_or_else(invalid);
            }
            for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
                    return Ok(dt.and_utc());
                }
            }
            Err(invalid())
        }
        _ => Err(invalid()),
    }
}
