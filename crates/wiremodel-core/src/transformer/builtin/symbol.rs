use serde_json::Value;

use crate::error::{TransformError, TransformResult};
use crate::key::TypeTag;
use crate::transformer::{FieldContext, Transformer};
use crate::value::{RuntimeValue, SymbolTable};

/// Symbols, interned by string key.
#[derive(Debug, Default)]
pub struct SymbolTransformer {
    table: SymbolTable,
}

impl SymbolTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> &SymbolTable {
        &self.table
    }
}

impl Transformer for SymbolTransformer {
    fn name(&self) -> &str {
        "symbol"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Symbol
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        match value {
            RuntimeValue::Symbol(_) => Ok(value),
            RuntimeValue::Json(Value::String(key)) => Ok(RuntimeValue::Symbol(self.table.intern(&key))),
            other => Err(TransformError::invalid_intern_key(
                ctx.owner,
                ctx.field,
                &other.to_wire(),
            )),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Symbol(symbol) => Value::String(symbol.key().to_string()),
            other => other.to_wire(),
        }
    }

    fn validate(&self, value: &Value) -> bool {
        value.is_string()
    }
}
