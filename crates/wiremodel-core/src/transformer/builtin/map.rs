use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{RuntimeValue, ValueMap, entries_pairs, map_to_wire};

const EXPECTED: &str = "object, {entries: [[key, value], ...]} or array of pairs";

/// String-keyed maps with insertion order.
///
/// Values are kept as plain JSON. The engine runs them through inference
/// after this transformer returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapTransformer;

impl Transformer for MapTransformer {
    fn name(&self) -> &str {
        "map"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Map
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Map(_) => Ok(value),
            RuntimeValue::Json(raw) => parse_map(&raw)
                .map(RuntimeValue::Map)
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Map(entries) => map_to_wire(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_wire()))
                    .collect(),
            ),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_map(value).is_some()
    }
}

fn parse_map(raw: &Value) -> Option<ValueMap> {
    match raw {
        Value::Object(object) => match entries_pairs(object) {
            Some(pairs) => from_pairs(pairs),
            None => Some(
                object
                    .iter()
                    .map(|(key, value)| (key.clone(), RuntimeValue::Json(value.clone())))
                    .collect(),
            ),
        },
        Value::Array(pairs) => from_pairs(pairs),
        _ => None,
    }
}

fn from_pairs(pairs: &[Value]) -> Option<ValueMap> {
    let mut map = ValueMap::with_capacity(pairs.len());
    for pair in pairs {
        let [key, value] = pair.as_array()?.as_slice() else {
            return None;
        };
        let key = match key {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        map.insert(key, RuntimeValue::Json(value.clone()));
    }
    Some(map)
}
