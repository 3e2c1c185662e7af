use serde_json::Value;

use crate::error::TransformResult;
use crate::key::TypeTag;
use crate::logging::log_lenient_default;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{RuntimeValue, WideIntArray, WideKind, array_like};

/// 64-bit integer arrays.
///
/// In lenient mode (the default) an element that cannot be read as a 64-bit
/// integer becomes `0` and a warning is logged. The input must still be an
/// array.
#[derive(Debug, Clone, Copy)]
pub struct WideIntTransformer {
    kind: WideKind,
}

impl WideIntTransformer {
    pub fn new(kind: WideKind) -> Self {
        Self { kind }
    }

    fn expected(&self) -> &'static str {
        match self.kind {
            WideKind::Signed => "BigInt64Array (array of integer strings or numbers)",
            WideKind::Unsigned => "BigUint64Array (array of integer strings or numbers)",
        }
    }

    fn parse(&self, raw: &Value, ctx: &FieldContext<'_>) -> Option<WideIntArray> {
        let elements = array_like(raw)?;
        match self.kind {
            WideKind::Signed => elements
                .iter()
                .enumerate()
                .map(|(index, element)| element_or_default(signed(element), index, element, ctx))
                .collect::<Option<Vec<i64>>>()
                .map(WideIntArray::Signed),
            WideKind::Unsigned => elements
                .iter()
                .enumerate()
                .map(|(index, element)| element_or_default(unsigned(element), index, element, ctx))
                .collect::<Option<Vec<u64>>>()
                .map(WideIntArray::Unsigned),
        }
    }
}

impl Transformer for WideIntTransformer {
    fn name(&self) -> &str {
        match self.kind {
            WideKind::Signed => "bigint64array",
            WideKind::Unsigned => "biguint64array",
        }
    }

    fn tag(&self) -> TypeTag {
        self.kind.tag()
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        if matches!(&value, RuntimeValue::WideInt(array) if array.kind() == self.kind) {
            return Ok(value);
        }
        let raw = match value {
            RuntimeValue::WideInt(_) | RuntimeValue::Typed(_) => value.to_wire(),
            RuntimeValue::Json(raw) => raw,
            other => return Err(ctx.mismatch_value(self.expected(), &other)),
        };
        self.parse(&raw, ctx)
            .map(RuntimeValue::WideInt)
            .ok_or_else(|| ctx.mismatch(self.expected(), &raw))
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::WideInt(array) => array.to_wire(),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        array_like(value).is_some()
    }
}

fn element_or_default<T: Default>(
    parsed: Option<T>,
    index: usize,
    element: &Value,
    ctx: &FieldContext<'_>,
) -> Option<T> {
    match parsed {
        Some(n) => Some(n),
        None if ctx.lenient_wide_ints => {
            log_lenient_default(ctx.owner, ctx.field, index, &element.to_string());
            Some(T::default())
        }
        None => None,
    }
}

fn signed(element: &Value) -> Option<i64> {
    match element {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
        }),
        _ => None,
    }
}

fn unsigned(element: &Value) -> Option<u64> {
    match element {
        Value::String(text) => text.trim().parse().ok(),
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64).then(|| f as u64)
        }),
        _ => None,
    }
}
