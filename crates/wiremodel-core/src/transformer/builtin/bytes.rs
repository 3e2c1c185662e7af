use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{ByteView, Bytes, ElementKind, RuntimeValue, TypedArray, array_like};

const EXPECTED: &str = "array of byte values (0-255)";

fn parse_bytes(raw: &Value) -> Option<Vec<u8>> {
    let elements = array_like(raw)?;
    match TypedArray::from_elements(ElementKind::Uint8, &elements).ok()? {
        TypedArray::Uint8(bytes) => Some(bytes),
        _ => None,
    }
}

/// Raw buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferTransformer;

impl Transformer for BufferTransformer {
    fn name(&self) -> &str {
        "arraybuffer"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::ArrayBuffer
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Buffer(_) => Ok(value),
            RuntimeValue::View(view) => Ok(RuntimeValue::Buffer(Bytes(view.0))),
            RuntimeValue::Typed(TypedArray::Uint8(bytes)) => Ok(RuntimeValue::Buffer(Bytes(bytes))),
            RuntimeValue::Json(raw) => parse_bytes(&raw)
                .map(|bytes| RuntimeValue::Buffer(Bytes(bytes)))
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Buffer(bytes) => bytes.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_bytes(value).is_some()
    }
}

/// Views over a buffer. A buffer value is copied into a new view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewTransformer;

impl Transformer for ViewTransformer {
    fn name(&self) -> &str {
        "dataview"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::DataView
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::View(_) => Ok(value),
            RuntimeValue::Buffer(bytes) => Ok(RuntimeValue::View(ByteView(bytes.0))),
            RuntimeValue::Json(raw) => parse_bytes(&raw)
                .map(|bytes| RuntimeValue::View(ByteView(bytes)))
                .ok_or_else(|| ctx.mismatch(EXPECTED, &raw)),
            other => Err(ctx.mismatch_value(EXPECTED, &other)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::View(view) => view.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        parse_bytes(value).is_some()
    }
}
