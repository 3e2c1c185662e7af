use serde_json::{Map, Value};

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{QueryParams, RuntimeValue};

const EXPECTED: &str = "query string or object of scalar values";

/// URL query parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryTransformer;

impl Transformer for QueryTransformer {
    fn name(&self) -> &str {
        "urlsearchparams"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::UrlSearchParams
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Query(_) => Ok(value),
            RuntimeValue::Json(raw) => parse_query(&raw)
                .map(RuntimeValue::Query)
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Query(params) => Value::String(params.to_query_string()),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_query(value).is_some()
    }
}

fn parse_query(raw: &Value) -> Option<QueryParams> {
    match raw {
        Value::String(text) => Some(QueryParams::parse(text)),
        Value::Object(object) => from_object(object),
        _ => None,
    }
}

/// Array values repeat their key.
fn from_object(object: &Map<String, Value>) -> Option<QueryParams> {
    let mut params = QueryParams::new();
    for (key, value) in object {
        match value {
            Value::Array(items) => {
                for item in items {
                    params.append(key.as_str(), scalar(item)?);
                }
            }
            other => params.append(key.as_str(), scalar(other)?),
        }
    }
    Some(params)
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_form() {
        let params = parse_query(&json!({"q": "rust", "page": 2, "tag": ["a", "b"]})).unwrap();
        assert_eq!(params.to_query_string(), "q=rust&page=2&tag=a&tag=b");
        assert!(parse_query(&json!({"nested": {"x": 1}})).is_none());
    }
}
