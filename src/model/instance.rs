use serde_json::Value;
use std::sync::Arc;

use wiremodel_core::{Engine, ModelClass, ModelInstance, RuntimeValue};

use crate::error::{ModelError, ModelResult};

/// A model instance bound to the engine that built it.
///
/// Keeps the wire snapshot taken right after construction; later mutation
/// never touches it.
#[derive(Debug, Clone)]
pub struct Model {
    instance: ModelInstance,
    initial: Value,
    engine: Arc<Engine>,
}

impl Model {
    pub(crate) fn new(instance: ModelInstance, engine: Arc<Engine>) -> Self {
        let initial = engine.serialize_model(&instance);
        Self {
            instance,
            initial,
            engine,
        }
    }

    pub fn class_name(&self) -> &str {
        self.instance.class_name()
    }

    pub fn class(&self) -> &Arc<ModelClass> {
        self.instance.class()
    }

    pub fn instance(&self) -> &ModelInstance {
        &self.instance
    }

    pub fn into_instance(self) -> ModelInstance {
        self.instance
    }

    pub fn get(&self, field: &str) -> Option<&RuntimeValue> {
        self.instance.get(field)
    }

    /// Store an already converted value, returning the previous one.
    ///
    /// # Errors
    ///
    /// `UnknownField` when the class does not declare `field`.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<RuntimeValue>,
    ) -> ModelResult<Option<RuntimeValue>> {
        self.instance
            .set(field, value.into())
            .map_err(|_| ModelError::unknown_field(self.instance.class_name(), field))
    }

    /// Convert a wire value with the field's rules, then store it.
    pub fn assign(&mut self, field: &str, wire: Value) -> ModelResult<Option<RuntimeValue>> {
        let class = self.instance.class().clone();
        let descriptor = class
            .field(field)
            .ok_or_else(|| ModelError::unknown_field(class.name(), field))?;
        let value = self
            .engine
            .deserialize_field(wire, descriptor, class.name())?;
        self.set(field, value)
    }

    pub fn unset(&mut self, field: &str) -> Option<RuntimeValue> {
        self.instance.unset(field)
    }

    /// Set fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &RuntimeValue)> {
        self.instance.fields()
    }

    pub fn to_wire(&self) -> Value {
        self.engine.serialize_model(&self.instance)
    }

    pub fn to_json_string(&self) -> ModelResult<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }

    /// Wire snapshot taken right after construction.
    pub fn initial_state(&self) -> &Value {
        &self.initial
    }

    pub fn initial_field(&self, field: &str) -> Option<&Value> {
        self.initial.get(field)
    }

    /// Independent copy made by a round trip through the wire shape.
    ///
    /// The copy's initial state is its own construction snapshot.
    pub fn duplicate(&self) -> ModelResult<Self> {
        let instance = self
            .engine
            .deserialize_model(self.instance.class(), self.to_wire())?;
        Ok(Self::new(instance, self.engine.clone()))
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.instance == other.instance
    }
}
