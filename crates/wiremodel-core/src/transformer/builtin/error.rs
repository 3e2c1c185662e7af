use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{ErrorValue, RuntimeValue};

const EXPECTED: &str = "error (\"Name: message\" or {message, name?, stack?})";

/// Error objects carried as data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTransformer;

impl Transformer for ErrorTransformer {
    fn name(&self) -> &str {
        "error"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Error
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Error(_) => Ok(value),
            RuntimeValue::Json(raw) => parse_error(&raw)
                .map(RuntimeValue::Error)
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Error(error) => error.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_error(value).is_some()
    }
}

fn parse_error(raw: &Value) -> Option<ErrorValue> {
    match raw {
        Value::String(text) => Some(ErrorValue::parse(text)),
        Value::Object(object) => {
            if let Some(marker) = object.get("__type") {
                if marker.as_str() != Some("Error") {
                    return None;
                }
            }
            ErrorValue::from_object(object)
        }
        _ => None,
    }
}
