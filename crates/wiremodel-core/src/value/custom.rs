//! Host-defined runtime values.
//!
//! Applications that register their own transformers need somewhere to put
//! the values those transformers produce. A [`CustomType`] describes itself
//! (its tag and wire form), so the rest of the engine can carry it around
//! without knowing the concrete type.

use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::key::TypeTag;

/// A value type defined outside this crate.
pub trait CustomType: fmt::Debug + Send + Sync + 'static {
    /// Tag used to find the transformer that serializes this value.
    fn type_tag(&self) -> TypeTag;

    /// Wire form used when no transformer is registered for the tag.
    fn to_wire(&self) -> Value;

    fn as_any(&self) -> &dyn Any;

    /// Equality against another custom value of unknown type.
    fn eq_custom(&self, other: &dyn CustomType) -> bool;
}

/// `eq_custom` for types that implement `PartialEq`.
pub fn custom_eq<T: CustomType + PartialEq>(this: &T, other: &dyn CustomType) -> bool {
    other
        .as_any()
        .downcast_ref::<T>()
        .is_some_and(|other| other == this)
}

/// Shared handle to a [`CustomType`].
#[derive(Debug, Clone)]
pub struct CustomValue(Arc<dyn CustomType>);

impl CustomValue {
    pub fn new<T: CustomType>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn type_tag(&self) -> TypeTag {
        self.0.type_tag()
    }

    pub fn to_wire(&self) -> Value {
        self.0.to_wire()
    }

    pub fn downcast_ref<T: CustomType>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for CustomValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_custom(other.0.as_ref())
    }
}
