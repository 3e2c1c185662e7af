use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::RuntimeValue;

/// Checks that a value is of one primitive JSON type and passes it through.
#[derive(Debug, Clone, Copy)]
pub struct PrimitiveTransformer {
    tag: TypeTag,
}

impl PrimitiveTransformer {
    /// `tag` must be `String`, `Number` or `Boolean`; any other tag accepts
    /// nothing.
    pub fn new(tag: TypeTag) -> Self {
        Self { tag }
    }

    fn expected(&self) -> &'static str {
        match self.tag {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            _ => "primitive",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self.tag {
            TypeTag::String => value.is_string(),
            TypeTag::Number => value.is_number(),
            TypeTag::Boolean => value.is_boolean(),
            _ => false,
        }
    }
}

impl Transformer for PrimitiveTransformer {
    fn name(&self) -> &str {
        self.expected()
    }

    fn tag(&self) -> TypeTag {
        self.tag
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        if value.as_json().is_some_and(|raw| self.accepts(raw)) {
            Ok(value)
        } else {
            Err(ctx.mismatch_value(self.expected(), &value))
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        value.to_wire()
    }

    fn validate(&self, value: &Value) -> bool {
        self.accepts(value)
    }
}
