use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{ElementError, ElementKind, RuntimeValue, TypedArray, array_like};

/// Fixed-width numeric arrays, one transformer per element kind.
#[derive(Debug, Clone, Copy)]
pub struct TypedArrayTransformer {
    kind: ElementKind,
    name: &'static str,
}

impl TypedArrayTransformer {
    pub fn new(kind: ElementKind) -> Self {
        let name = match kind {
            ElementKind::Int8 => "int8array",
            ElementKind::Uint8 => "uint8array",
            ElementKind::Int16 => "int16array",
            ElementKind::Uint16 => "uint16array",
            ElementKind::Int32 => "int32array",
            ElementKind::Uint32 => "uint32array",
            ElementKind::Float32 => "float32array",
            ElementKind::Float64 => "float64array",
        };
        Self { kind, name }
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    fn expected(&self) -> String {
        if self.kind.is_float() {
            format!("{} (array of numbers)", self.kind.tag())
        } else {
            format!("{} (array of in-range integers)", self.kind.tag())
        }
    }

    fn parse(&self, raw: &Value) -> Result<TypedArray, Option<ElementError>> {
        let elements = array_like(raw).ok_or(None)?;
        TypedArray::from_elements(self.kind, &elements).map_err(Some)
    }
}

impl Transformer for TypedArrayTransformer {
    fn name(&self) -> &str {
        self.name
    }

    fn tag(&self) -> TypeTag {
        self.kind.tag()
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        if matches!(&value, RuntimeValue::Typed(array) if array.kind() == self.kind) {
            return Ok(value);
        }
        let raw = match value {
            // Other numeric arrays convert element-wise.
            RuntimeValue::Typed(_) | RuntimeValue::Buffer(_) | RuntimeValue::View(_) => value.to_wire(),
            RuntimeValue::Json(raw) => raw,
            other => return Err(ctx.mismatch_value(&self.expected(), &other)),
        };

        match self.parse(&raw) {
            Ok(array) => Ok(RuntimeValue::Typed(array)),
            Err(reason) => {
                let mut error = ctx.mismatch(&self.expected(), &raw);
                if let Some(reason) = reason {
                    error.message = format!("{} ({})", error.message, reason);
                }
                Err(error)
            }
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Typed(array) => array.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        self.parse(value).is_ok()
    }
}
