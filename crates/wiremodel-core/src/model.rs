//! Model instances.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::metadata::ModelClass;
use crate::value::RuntimeValue;

/// One instance of a [`ModelClass`].
///
/// Only declared fields can hold a value. A declared field that was absent
/// from the wire data is unset, which is different from holding `null`.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    class: Arc<ModelClass>,
    values: IndexMap<String, RuntimeValue>,
}

impl ModelInstance {
    /// An instance with every field unset.
    pub fn new(class: Arc<ModelClass>) -> Self {
        Self {
            class,
            values: IndexMap::new(),
        }
    }

    pub fn class(&self) -> &Arc<ModelClass> {
        &self.class
    }

    pub fn class_name(&self) -> &str {
        self.class.name()
    }

    pub fn is_instance_of(&self, class_name: &str) -> bool {
        self.class.name() == class_name
    }

    pub fn get(&self, field: &str) -> Option<&RuntimeValue> {
        self.values.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut RuntimeValue> {
        self.values.get_mut(field)
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Set a declared field.
    ///
    /// Returns `Err(value)` when the class has no such field, otherwise the
    /// previous value.
    pub fn set(
        &mut self,
        field: &str,
        value: RuntimeValue,
    ) -> Result<Option<RuntimeValue>, RuntimeValue> {
        if !self.class.has_field(field) {
            return Err(value);
        }
        Ok(self.values.insert(field.to_string(), value))
    }

    /// Store a converted value for a field the class is known to declare.
    pub(crate) fn insert_declared(&mut self, field: &str, value: RuntimeValue) {
        self.values.insert(field.to_string(), value);
    }

    /// Unset a field, returning its value.
    pub fn unset(&mut self, field: &str) -> Option<RuntimeValue> {
        self.values.shift_remove(field)
    }

    /// Set fields with their values, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &RuntimeValue)> {
        self.class
            .field_names()
            .filter_map(|name| self.values.get(name).map(|value| (name, value)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wire object built from each value's own wire form.
    ///
    /// Use `Engine::serialize_model` to honor registered transformers.
    pub fn to_wire(&self) -> Value {
        Value::Object(
            self.fields()
                .map(|(name, value)| (name.to_string(), value.to_wire()))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.class.name() == other.class.name()
            && self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .all(|(name, value)| other.values.get(name) == Some(value))
    }
}
