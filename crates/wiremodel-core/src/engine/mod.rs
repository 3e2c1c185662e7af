//! The conversion engine.
//!
//! [`Engine`] ties together the transformer registry, the signature registry
//! and the metadata store, and runs conversions in both directions:
//!
//! - [`Engine::deserialize_model`] builds a [`ModelInstance`] from wire data
//! - [`Engine::serialize_model`] turns an instance back into wire data
//!
//! Nothing is global: two engines never share registrations.
//!
//! # Example
//! ```rust,ignore
//! use wiremodel_core::{Engine, EngineConfig, ModelClass, TypeTag};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let user = engine.define(
//!     ModelClass::builder("User")
//!         .field("id")
//!         .tagged("createdAt", TypeTag::Date)
//!         .build(),
//! )?;
//! let instance = engine.deserialize_model(&user, json!({"id": 1, "createdAt": "2024-01-01"}))?;
//! ```
//!
//! [`ModelInstance`]: crate::model::ModelInstance

mod de;
mod ser;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{TransformError, TransformResult};
use crate::key::TransformerKey;
use crate::logging::{log_engine_init, log_model_defined};
use crate::metadata::{MetadataStore, ModelClass, ModelRef};
use crate::signature::{Signature, SignatureRegistry};
use crate::transformer::{Transformer, TransformerRegistry};

/// Conversion engine.
#[derive(Debug)]
pub struct Engine {
    transformers: TransformerRegistry,
    signatures: SignatureRegistry,
    classes: MetadataStore,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with every built-in transformer.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the configuration does not validate.
    pub fn new(config: EngineConfig) -> TransformResult<Self> {
        Self::with_registry(config, TransformerRegistry::with_builtins())
    }

    /// Create an engine around a caller-supplied transformer registry.
    pub fn with_registry(
        config: EngineConfig,
        transformers: TransformerRegistry,
    ) -> TransformResult<Self> {
        config.validate()?;
        log_engine_init(&config.summary(), transformers.len());

        Ok(Self {
            signatures: SignatureRegistry::new(config.collision_mode),
            classes: MetadataStore::new(),
            transformers,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn transformers(&self) -> &TransformerRegistry {
        &self.transformers
    }

    pub fn signatures(&self) -> &SignatureRegistry {
        &self.signatures
    }

    pub fn classes(&self) -> &MetadataStore {
        &self.classes
    }

    /// Register a transformer under `keys`, replacing existing entries.
    pub fn register_transformer<I>(&self, keys: I, transformer: Arc<dyn Transformer>)
    where
        I: IntoIterator<Item = TransformerKey>,
    {
        self.transformers.register(keys, transformer);
    }

    /// Define a model class: register its signature, then store it.
    ///
    /// Redefining a name replaces the old class and drops every signature
    /// registered for it, including extra ones.
    ///
    /// # Errors
    ///
    /// `SignatureCollision` in strict mode when another class already owns
    /// the same field set. The class is not stored in that case.
    pub fn define(&self, class: impl Into<Arc<ModelClass>>) -> TransformResult<Arc<ModelClass>> {
        let class = class.into();
        let signature = Signature::of_class(&class);
        self.signatures
            .register_signature(signature.clone(), class.clone())?;
        if let Some(previous) = self.classes.define(class.clone()) {
            if !Arc::ptr_eq(&previous, &class) {
                self.signatures.retain_current(&class);
            }
        }
        log_model_defined(class.name(), signature.as_str());
        Ok(class)
    }

    /// Define `class` unless a class of the same name is already stored.
    ///
    /// Returns the stored class.
    pub fn ensure_defined(&self, class: impl Into<Arc<ModelClass>>) -> TransformResult<Arc<ModelClass>> {
        let class = class.into();
        match self.classes.get(class.name()) {
            Some(existing) => Ok(existing),
            None => self.define(class),
        }
    }

    /// Register an additional signature for an already defined class.
    ///
    /// # Errors
    ///
    /// `UnknownModel` when the class is not defined, `SignatureCollision` as
    /// for [`Engine::define`].
    pub fn register_model_signature<I, S>(&self, class_name: &str, field_names: I) -> TransformResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let class = self
            .classes
            .get(class_name)
            .ok_or_else(|| TransformError::unknown_model(class_name))?;
        self.signatures.register_fields(class, field_names)
    }

    /// Look up a defined class by name.
    pub fn class(&self, name: &str) -> Option<Arc<ModelClass>> {
        self.classes.get(name)
    }

    fn resolve(&self, model: &ModelRef) -> TransformResult<Arc<ModelClass>> {
        self.classes
            .get(model.class_name())
            .ok_or_else(|| TransformError::unknown_model(model.class_name()))
    }

    fn resolve_key(&self, key: &TransformerKey, owner: &str, field: &str) -> TransformResult<Arc<dyn Transformer>> {
        self.transformers
            .lookup(key)
            .ok_or_else(|| TransformError::unknown_transformer(owner, field, &key.to_string()))
    }
}
