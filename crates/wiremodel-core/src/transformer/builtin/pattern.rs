use serde_json::{Map, Value};

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{Pattern, PatternError, RuntimeValue};

const EXPECTED: &str = "regular expression (\"/source/flags\", bare source or {source, flags})";

/// Wire type marker for tagged pattern objects.
const TYPE_MARKER: &str = "RegExp";

/// Regular expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternTransformer;

impl Transformer for PatternTransformer {
    fn name(&self) -> &str {
        "regexp"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::RegExp
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::RegExp(_) => Ok(value),
            RuntimeValue::Json(raw) => match parse_pattern(&raw) {
                Some(Ok(pattern)) => Ok(RuntimeValue::RegExp(pattern)),
                Some(Err(reason)) => {
                    let mut error = ctx.mismatch(EXPECTED, &raw);
                    error.message = format!("{} ({})", error.message, reason);
                    Err(error)
                }
                None => Err(ctx.mismatch(EXPECTED, &raw)),
            },
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::RegExp(pattern) => pattern.to_wire(),
            other => other.to_wire(),
        }
    }
}

/// `None` for shapes that are not patterns at all, `Some(Err)` for pattern
/// shapes that fail to compile.
fn parse_pattern(raw: &Value) -> Option<Result<Pattern, PatternError>> {
    match raw {
        Value::String(text) => Some(Pattern::parse(text)),
        Value::Object(object) => pattern_object(object),
        _ => None,
    }
}

fn pattern_object(object: &Map<String, Value>) -> Option<Result<Pattern, PatternError>> {
    if let Some(marker) = object.get("__type") {
        if marker.as_str() != Some(TYPE_MARKER) {
            return None;
        }
    }
    let source = object.get("source")?.as_str()?;
    let flags = match object.get("flags") {
        None | Some(Value::Null) => "",
        Some(flags) => flags.as_str()?,
    };
    Some(Pattern::new(source, flags))
}
