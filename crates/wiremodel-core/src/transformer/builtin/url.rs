use serde_json::Value;
use url::Url;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::RuntimeValue;

const EXPECTED: &str = "absolute URL string";

#[derive(Debug, Clone, Copy, Default)]
pub struct UrlTransformer;

impl Transformer for UrlTransformer {
    fn name(&self) -> &str {
        "url"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Url
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Url(_) => Ok(value),
            RuntimeValue::Json(Value::String(ref text)) => match Url::parse(text.trim()) {
                Ok(url) => Ok(RuntimeValue::Url(url)),
                Err(reason) => {
                    let mut error = ctx.mismatch_value(EXPECTED, &value);
                    error.message = format!("{} ({})", error.message, reason);
                    Err(error)
                }
            },
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Url(url) => Value::String(url.as_str().to_string()),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        value.as_str().is_some_and(|text| Url::parse(text.trim()).is_ok())
    }
}
