//! Mapper - entry point that owns the engine and builds models
//!
//! All model classes and custom transformers are handed to [`MapperBuilder`]
//! and defined in [`MapperBuilder::build`], before the first model is
//! constructed. Later definitions are still possible through
//! [`Mapper::define`] or lazily through [`Mapper::construct_with`].

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use wiremodel_core::{
    Engine, EngineConfig, ModelClass, RuntimeValue, TransformError, Transformer, TransformerKey,
};

use crate::error::ModelResult;
use crate::model::{Model, ModelSchema};

/// Owns a shared [`Engine`] and constructs [`Model`]s with it.
#[derive(Debug, Clone)]
pub struct Mapper {
    engine: Arc<Engine>,
}

impl Mapper {
    pub fn builder() -> MapperBuilder {
        MapperBuilder::default()
    }

    /// Mapper with the default configuration, built-in transformers and no
    /// model classes.
    pub fn new() -> ModelResult<Self> {
        Self::builder().build()
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Define a model class on the underlying engine.
    pub fn define(&self, class: impl Into<Arc<ModelClass>>) -> ModelResult<Arc<ModelClass>> {
        Ok(self.engine.define(class)?)
    }

    /// Build a model of an already defined class.
    ///
    /// # Errors
    ///
    /// `UnknownModel` when `class_name` is not defined, otherwise any
    /// conversion error of the engine.
    pub fn construct(&self, class_name: &str, wire: impl Into<RuntimeValue>) -> ModelResult<Model> {
        let instance = self.engine.deserialize_named(class_name, wire)?;
        Ok(Model::new(instance, self.engine.clone()))
    }

    /// Build a model of `class`, defining it first if no class of that name is
    /// known yet.
    pub fn construct_with(
        &self,
        class: &Arc<ModelClass>,
        wire: impl Into<RuntimeValue>,
    ) -> ModelResult<Model> {
        let class = self.engine.ensure_defined(class.clone())?;
        let instance = self.engine.deserialize_model(&class, wire)?;
        Ok(Model::new(instance, self.engine.clone()))
    }

    /// Build a model of the schema type `S`, defining it lazily.
    pub fn construct_as<S: ModelSchema>(&self, wire: impl Into<RuntimeValue>) -> ModelResult<Model> {
        let class = match self.engine.class(S::model_name()) {
            Some(class) => class,
            None => self.engine.ensure_defined(S::model_class())?,
        };
        let instance = self.engine.deserialize_model(&class, wire)?;
        Ok(Model::new(instance, self.engine.clone()))
    }

    /// Parse JSON text and build a model from it.
    pub fn from_json_str(&self, class_name: &str, text: &str) -> ModelResult<Model> {
        let wire: Value = serde_json::from_str(text).map_err(TransformError::from)?;
        self.construct(class_name, wire)
    }
}

/// Collects configuration, transformers and classes for a [`Mapper`].
#[derive(Default)]
pub struct MapperBuilder {
    config: EngineConfig,
    transformers: Vec<(Vec<TransformerKey>, Arc<dyn Transformer>)>,
    classes: Vec<ModelClass>,
}

impl MapperBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a custom transformer under `keys`. Replaces built-ins that
    /// share a key.
    pub fn transformer<I>(mut self, keys: I, transformer: Arc<dyn Transformer>) -> Self
    where
        I: IntoIterator<Item = TransformerKey>,
    {
        self.transformers
            .push((keys.into_iter().collect(), transformer));
        self
    }

    pub fn model(mut self, class: ModelClass) -> Self {
        self.classes.push(class);
        self
    }

    pub fn schema<S: ModelSchema>(self) -> Self {
        self.model(S::model_class())
    }

    /// Create the engine, register transformers, then define every class.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for a bad configuration, `SignatureCollision` in strict
    /// mode when two classes share a field set.
    pub fn build(self) -> ModelResult<Mapper> {
        let engine = Engine::new(self.config)?;
        for (keys, transformer) in self.transformers {
            engine.register_transformer(keys, transformer);
        }
        let count = self.classes.len();
        for class in self.classes {
            engine.define(class)?;
        }
        debug!(classes = count, "Mapper ready");

        Ok(Mapper {
            engine: Arc::new(engine),
        })
    }
}
