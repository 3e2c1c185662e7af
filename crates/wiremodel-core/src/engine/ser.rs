//! Runtime to wire conversion.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::Engine;
use crate::key::TransformerKey;
use crate::metadata::FieldDescriptor;
use crate::model::ModelInstance;
use crate::transformer::Transformer;
use crate::value::{RuntimeValue, map_to_wire};

impl Engine {
    /// Wire form of one field value.
    ///
    /// Leaf values of annotated fields go through the field's transformer.
    /// Models, arrays and maps are walked element by element. Never fails.
    pub fn serialize_field(&self, value: &RuntimeValue, descriptor: &FieldDescriptor) -> Value {
        if !value.is_container() {
            if let Some(transformer) = self.field_transformer(descriptor) {
                return transformer.to_wire(value);
            }
        }
        self.serialize_value(value)
    }

    /// Wire object holding the set fields of `instance`, in declaration order.
    pub fn serialize_model(&self, instance: &ModelInstance) -> Value {
        Value::Object(self.serialize_fields(instance))
    }

    /// Wire form of a value with no field annotation to go by.
    ///
    /// Values owned by a transformer are encoded by the transformer registered
    /// under their tag, so overrides apply.
    pub fn serialize_value(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Model(instance) => self.serialize_model(instance),
            RuntimeValue::Array(items) => {
                Value::Array(items.iter().map(|item| self.serialize_value(item)).collect())
            }
            RuntimeValue::Map(entries) => map_to_wire(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), self.serialize_value(entry)))
                    .collect(),
            ),
            leaf => match leaf
                .type_tag()
                .and_then(|tag| self.transformers.lookup(&TransformerKey::Tag(tag)))
            {
                Some(transformer) => transformer.to_wire(leaf),
                None => leaf.to_wire(),
            },
        }
    }

    pub(super) fn serialize_fields(&self, instance: &ModelInstance) -> Map<String, Value> {
        let class = instance.class();
        instance
            .fields()
            .map(|(name, value)| {
                let wire = match class.field(name) {
                    Some(descriptor) => self.serialize_field(value, descriptor),
                    None => self.serialize_value(value),
                };
                (name.to_string(), wire)
            })
            .collect()
    }

    fn field_transformer(&self, descriptor: &FieldDescriptor) -> Option<Arc<dyn Transformer>> {
        descriptor
            .transformer
            .as_ref()
            .and_then(|key| self.transformers.lookup(key))
            .or_else(|| {
                descriptor
                    .declared
                    .and_then(|declared| self.transformers.lookup(&TransformerKey::Tag(declared.tag())))
            })
    }
}
