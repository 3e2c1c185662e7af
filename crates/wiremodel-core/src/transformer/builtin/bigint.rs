use num_bigint::BigInt;
use serde_json::{Number, Value};
use std::str::FromStr;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::RuntimeValue;

const EXPECTED: &str = "decimal integer string or integral number";

/// Arbitrary-precision integers, carried on the wire as decimal strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BigIntTransformer;

impl Transformer for BigIntTransformer {
    fn name(&self) -> &str {
        "bigint"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::BigInt
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::BigInt(_) => Ok(value),
            RuntimeValue::Json(raw) => parse_bigint(&raw)
                .map(RuntimeValue::BigInt)
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::BigInt(n) => Value::String(n.to_string()),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_bigint(value).is_some()
    }
}

fn parse_bigint(raw: &Value) -> Option<BigInt> {
    match raw {
        Value::String(text) => {
            let text = text.trim();
            // from_str also accepts '_' separators, which are not valid here.
            let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            BigInt::from_str(text).ok()
        }
        Value::Number(n) => integral(n),
        _ => None,
    }
}

fn integral(n: &Number) -> Option<BigInt> {
    if let Some(i) = n.as_i64() {
        return Some(BigInt::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Some(BigInt::from(u));
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i128::MAX as f64 {
        Some(BigInt::from(f as i128))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_forms() {
        assert_eq!(
            parse_bigint(&json!("12345678901234567890")),
            Some(BigInt::from(12345678901234567890_u64))
        );
        assert_eq!(parse_bigint(&json!("-42")), Some(BigInt::from(-42)));
        assert_eq!(parse_bigint(&json!(7)), Some(BigInt::from(7)));
        assert_eq!(parse_bigint(&json!(1e20)), Some(BigInt::from(100_000_000_000_000_000_000_i128)));
    }

    #[test]
    fn test_rejects_non_integers() {
        assert_eq!(parse_bigint(&json!("1.5")), None);
        assert_eq!(parse_bigint(&json!("")), None);
        assert_eq!(parse_bigint(&json!("12abc")), None);
        assert_eq!(parse_bigint(&json!("1_000")), None);
        assert_eq!(parse_bigint(&json!(1.5)), None);
        assert_eq!(parse_bigint(&json!(null)), None);
    }
}
