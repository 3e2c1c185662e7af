//! Transformers: two-way converters between wire values and runtime values.
//!
//! A transformer owns one runtime type. `from_wire` accepts every wire form
//! the type is known to travel in, and also values that were already
//! converted, so applying it twice is harmless. `to_wire` produces the one
//! canonical wire form.
//!
//! # Example
//! ```rust,ignore
//! use wiremodel_core::transformer::{FieldContext, Transformer};
//! use wiremodel_core::transformer::builtin::DateTransformer;
//!
//! let ctx = FieldContext::new("User", "createdAt");
//! let date = DateTransformer.from_wire(json!("2024-01-01T00:00:00Z").into(), &ctx)?;
//! assert_eq!(DateTransformer.to_wire(&date), json!("2024-01-01T00:00:00.000Z"));
//! ```

pub mod builtin;
mod registry;

pub use registry::TransformerRegistry;

use serde_json::Value;

use crate::error::{TransformError, TransformResult};
use crate::key::TypeTag;
use crate::value::RuntimeValue;

/// Where a conversion happens, for error messages and logs.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Owning model class name
    pub owner: &'a str,
    /// Field being converted
    pub field: &'a str,
    /// Zero-default unparseable 64-bit integer array elements
    pub lenient_wide_ints: bool,
}

impl<'a> FieldContext<'a> {
    pub fn new(owner: &'a str, field: &'a str) -> Self {
        Self {
            owner,
            field,
            lenient_wide_ints: true,
        }
    }

    /// Context for conversions outside any model.
    pub fn detached() -> FieldContext<'static> {
        FieldContext::new("", "")
    }

    pub fn with_lenient_wide_ints(mut self, lenient: bool) -> Self {
        self.lenient_wide_ints = lenient;
        self
    }

    /// `ShapeMismatch` located at this field.
    pub fn mismatch(&self, expected: &str, received: &Value) -> TransformError {
        TransformError::shape_mismatch(self.owner, self.field, expected, received)
    }

    /// `ShapeMismatch` for a runtime value, reported through its wire form.
    pub fn mismatch_value(&self, expected: &str, received: &RuntimeValue) -> TransformError {
        self.mismatch(expected, &received.to_wire())
    }
}

/// Two-way converter for one runtime type.
pub trait Transformer: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Tag of the runtime type this transformer produces.
    fn tag(&self) -> TypeTag;

    /// Convert a wire value (or an already converted value) into the runtime
    /// type.
    ///
    /// # Errors
    ///
    /// Fails when the value matches none of the accepted forms.
    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue>;

    /// Wire form of `value`. Values of other runtime types fall back to
    /// [`RuntimeValue::to_wire`].
    fn to_wire(&self, value: &RuntimeValue) -> Value;

    /// Whether `from_wire` would accept `value`.
    fn validate(&self, value: &Value) -> bool {
        self.from_wire(RuntimeValue::Json(value.clone()), &FieldContext::detached())
            .is_ok()
    }
}
