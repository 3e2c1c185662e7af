//! Wire to runtime conversion.
//!
//! Each field is converted by the first strategy that applies:
//!
//! 1. an explicit transformer annotation
//! 2. an explicit nested model annotation
//! 3. a declared intrinsic type
//! 4. structural inference against registered signatures
//! 5. plain copy
//!
//! Failures in 1-3 abort the whole instance. Inference is best effort: a miss
//! copies the value, and an inferred model that fails to build degrades to a
//! copy as well. Depth errors always propagate.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::Engine;
use crate::error::{ErrorCode, TransformError, TransformResult};
use crate::key::TransformerKey;
use crate::logging::{
    log_field_strategy, log_inference_fallback, log_inference_hit, log_inference_miss,
    log_undeclared_keys,
};
use crate::metadata::{FieldDescriptor, ModelClass};
use crate::model::ModelInstance;
use crate::signature::Signature;
use crate::transformer::FieldContext;
use crate::value::{RuntimeValue, ValueMap};

/// Owner and field a conversion is running for.
#[derive(Debug, Clone, Copy)]
struct Site<'a> {
    owner: &'a str,
    field: &'a str,
}

impl Engine {
    /// Convert one raw field value according to its descriptor.
    ///
    /// `null` is returned unchanged whatever the descriptor says.
    ///
    /// # Errors
    ///
    /// - `UnknownTransformer` / `UnknownModel` for annotations that resolve to
    ///   nothing
    /// - `ShapeMismatch` (or `InvalidInternKey`) when a transformer or nested
    ///   model rejects the value
    /// - `DepthExceeded` when nesting goes past `max_depth`
    pub fn deserialize_field(
        &self,
        raw: impl Into<RuntimeValue>,
        descriptor: &FieldDescriptor,
        owner: &str,
    ) -> TransformResult<RuntimeValue> {
        self.convert_field(raw.into(), descriptor, owner, 0)
    }

    /// Build an instance of `class` from a wire object.
    ///
    /// Declared fields are converted in declaration order; absent keys leave
    /// the field unset and undeclared keys are ignored. An instance of the same
    /// class is returned as-is, an instance of another class is read through
    /// its wire form.
    pub fn deserialize_model(
        &self,
        class: &Arc<ModelClass>,
        raw: impl Into<RuntimeValue>,
    ) -> TransformResult<ModelInstance> {
        let site = Site {
            owner: class.name(),
            field: "",
        };
        self.build_model(class, raw.into(), 0, site)
    }

    /// [`Engine::deserialize_model`] for a class looked up by name.
    ///
    /// # Errors
    ///
    /// `UnknownModel` when no class of that name is defined.
    pub fn deserialize_named(
        &self,
        class_name: &str,
        raw: impl Into<RuntimeValue>,
    ) -> TransformResult<ModelInstance> {
        let class = self
            .class(class_name)
            .ok_or_else(|| TransformError::unknown_model(class_name))?;
        self.deserialize_model(&class, raw)
    }

    fn context<'a>(&self, site: Site<'a>) -> FieldContext<'a> {
        FieldContext::new(site.owner, site.field)
            .with_lenient_wide_ints(self.config.lenient_wide_ints)
    }

    fn check_depth(&self, depth: usize, site: Site<'_>) -> TransformResult<()> {
        if depth > self.config.max_depth {
            return Err(TransformError::depth_exceeded(
                site.owner,
                site.field,
                self.config.max_depth,
            ));
        }
        Ok(())
    }

    fn convert_field(
        &self,
        raw: RuntimeValue,
        descriptor: &FieldDescriptor,
        owner: &str,
        depth: usize,
    ) -> TransformResult<RuntimeValue> {
        if raw.is_null() {
            return Ok(raw);
        }
        let site = Site {
            owner,
            field: &descriptor.name,
        };
        let verbose = self.config.debug_logging;

        if let Some(key) = &descriptor.transformer {
            log_field_strategy(owner, site.field, "transformer", verbose);
            let transformer = self.resolve_key(key, owner, site.field)?;
            let value = transformer.from_wire(raw, &self.context(site))?;
            return self.infer_map_values(value, site, depth);
        }

        if let Some(model) = &descriptor.model {
            log_field_strategy(owner, site.field, "nested model", verbose);
            let class = self
                .resolve(model)
                .map_err(|e| e.with_location(owner, site.field))?;
            return self.convert_nested(&class, raw, site, depth);
        }

        if let Some(declared) = descriptor.declared {
            // A registry without the matching built-in leaves the field to inference.
            if let Some(transformer) = self.transformers.lookup(&TransformerKey::Tag(declared.tag())) {
                log_field_strategy(owner, site.field, "declared type", verbose);
                let value = transformer.from_wire(raw, &self.context(site))?;
                return self.infer_map_values(value, site, depth);
            }
        }

        log_field_strategy(owner, site.field, "inference", verbose);
        self.infer(raw, site, depth)
    }

    /// One instance for an object, one per element for an array.
    fn convert_nested(
        &self,
        class: &Arc<ModelClass>,
        raw: RuntimeValue,
        site: Site<'_>,
        depth: usize,
    ) -> TransformResult<RuntimeValue> {
        let items = match raw {
            RuntimeValue::Json(Value::Array(items)) => {
                items.into_iter().map(RuntimeValue::Json).collect()
            }
            RuntimeValue::Array(items) => items,
            single => {
                return self
                    .build_model(class, single, depth + 1, site)
                    .map(RuntimeValue::Model);
            }
        };

        self.check_depth(depth + 1, site)?;
        items
            .into_iter()
            .map(|item| {
                if item.is_null() {
                    Ok(item)
                } else {
                    self.build_model(class, item, depth + 2, site)
                        .map(RuntimeValue::Model)
                }
            })
            .collect::<TransformResult<Vec<_>>>()
            .map(RuntimeValue::Array)
    }

    fn build_model(
        &self,
        class: &Arc<ModelClass>,
        raw: RuntimeValue,
        depth: usize,
        site: Site<'_>,
    ) -> TransformResult<ModelInstance> {
        self.check_depth(depth, site)?;

        let mut object = match raw {
            RuntimeValue::Model(instance) if instance.class_name() == class.name() => {
                return Ok(instance);
            }
            RuntimeValue::Model(instance) => self.serialize_fields(&instance),
            RuntimeValue::Json(Value::Object(object)) => object,
            other => {
                return Err(TransformError::shape_mismatch(
                    site.owner,
                    site.field,
                    format!("object for model {}", class.name()),
                    &other.to_wire(),
                ));
            }
        };

        let mut instance = ModelInstance::new(class.clone());
        for descriptor in class.fields() {
            let Some(raw) = object.remove(&descriptor.name) else {
                continue;
            };
            let value = self.convert_field(RuntimeValue::Json(raw), descriptor, class.name(), depth)?;
            instance.insert_declared(&descriptor.name, value);
        }

        if !object.is_empty() {
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            log_undeclared_keys(class.name(), &keys);
        }
        Ok(instance)
    }

    /// Structural inference, applied through nested arrays.
    fn infer(&self, raw: RuntimeValue, site: Site<'_>, depth: usize) -> TransformResult<RuntimeValue> {
        match raw {
            RuntimeValue::Json(Value::Object(object)) => self.infer_object(object, site, depth),
            RuntimeValue::Json(Value::Array(items)) => {
                let converted = self.infer_elements(
                    items.into_iter().map(RuntimeValue::Json).collect(),
                    site,
                    depth,
                )?;
                // Arrays where nothing was inferred stay plain JSON.
                if converted.iter().all(|item| matches!(item, RuntimeValue::Json(_))) {
                    Ok(RuntimeValue::Json(Value::Array(
                        converted
                            .into_iter()
                            .map(|item| match item {
                                RuntimeValue::Json(value) => value,
                                other => other.to_wire(),
                            })
                            .collect(),
                    )))
                } else {
                    Ok(RuntimeValue::Array(converted))
                }
            }
            RuntimeValue::Array(items) => self
                .infer_elements(items, site, depth)
                .map(RuntimeValue::Array),
            other => Ok(other),
        }
    }

    fn infer_elements(
        &self,
        items: Vec<RuntimeValue>,
        site: Site<'_>,
        depth: usize,
    ) -> TransformResult<Vec<RuntimeValue>> {
        self.check_depth(depth + 1, site)?;
        items
            .into_iter()
            .map(|item| self.infer(item, site, depth + 1))
            .collect()
    }

    fn infer_object(
        &self,
        object: Map<String, Value>,
        site: Site<'_>,
        depth: usize,
    ) -> TransformResult<RuntimeValue> {
        let signature = Signature::of_object(&object);
        let Some(class) = self.signatures.lookup(&signature) else {
            log_inference_miss(site.owner, site.field, signature.as_str());
            return Ok(RuntimeValue::Json(Value::Object(object)));
        };
        log_inference_hit(site.owner, site.field, class.name());

        let fallback = object.clone();
        match self.build_model(&class, RuntimeValue::Json(Value::Object(object)), depth + 1, site) {
            Ok(instance) => Ok(RuntimeValue::Model(instance)),
            Err(error) if error.code == ErrorCode::DepthExceeded => Err(error),
            Err(error) => {
                log_inference_fallback(site.owner, site.field, class.name(), &error.to_string());
                Ok(RuntimeValue::Json(Value::Object(fallback)))
            }
        }
    }

    /// Run inference over the values of a map a transformer produced.
    fn infer_map_values(
        &self,
        value: RuntimeValue,
        site: Site<'_>,
        depth: usize,
    ) -> TransformResult<RuntimeValue> {
        let RuntimeValue::Map(entries) = value else {
            return Ok(value);
        };
        entries
            .into_iter()
            .map(|(key, entry)| Ok((key, self.infer(entry, site, depth + 1)?)))
            .collect::<TransformResult<ValueMap>>()
            .map(RuntimeValue::Map)
    }
}
