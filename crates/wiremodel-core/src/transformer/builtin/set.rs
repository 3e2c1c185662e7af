use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{RuntimeValue, UniqueSet};

const EXPECTED: &str = "array";

/// Sets; duplicates in the wire array collapse to their first occurrence.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetTransformer;

impl Transformer for SetTransformer {
    fn name(&self) -> &str {
        "set"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Set
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Set(_) => Ok(value),
            RuntimeValue::Json(Value::Array(items)) => {
                Ok(RuntimeValue::Set(items.into_iter().collect()))
            }
            RuntimeValue::Array(items) => Ok(RuntimeValue::Set(
                items.iter().map(RuntimeValue::to_wire).collect::<UniqueSet>(),
            )),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Set(set) => set.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_array()
    }
}
