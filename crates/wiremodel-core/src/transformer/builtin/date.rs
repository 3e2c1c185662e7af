use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{RuntimeValue, encode_date};

const EXPECTED: &str = "ISO-8601 date string or epoch milliseconds";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Dates, stored as UTC with millisecond precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTransformer;

impl Transformer for DateTransformer {
    fn name(&self) -> &str {
        "date"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Date
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Date(_) => Ok(value),
            RuntimeValue::Json(raw) => parse_date(&raw)
                .map(RuntimeValue::Date)
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Date(date) => Value::String(encode_date(date)),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_date(value).is_some()
    }
}

/// Parse a wire date.
///
/// Accepts RFC 3339 strings, offset-less date-times and plain dates (read as
/// UTC), and epoch milliseconds. Sub-millisecond digits are dropped.
pub fn parse_date(raw: &Value) -> Option<DateTime<Utc>> {
    let date = match raw {
        Value::String(text) => parse_date_str(text.trim())?,
        Value::Number(n) => {
            let millis = match n.as_i64() {
                Some(ms) => ms,
                None => {
                    let ms = n.as_f64()?;
                    if !ms.is_finite() {
                        return None;
                    }
                    ms.trunc() as i64
                }
            };
            DateTime::from_timestamp_millis(millis)?
        }
        _ => return None,
    };
    Some(date.trunc_subsecs(3))
}

fn parse_date_str(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
}
