//! # wiremodel-core
//!
//! Conversion engine that turns plain JSON into typed model instances and
//! back again without losing information.
//!
//! ## Overview
//!
//! - **Transformers** convert one runtime type (dates, big integers, regular
//!   expressions, typed arrays, maps, sets, ...) to and from its wire form
//! - **Transformer registry** finds a transformer by tag, lowercase alias or
//!   Rust type
//! - **Model classes** describe the fields of a model and how each one is
//!   converted
//! - **Signature registry** recognizes untyped nested objects by their exact
//!   key set
//! - **Engine** runs deserialization and serialization over all of the above
//!
//! ## Architecture
//!
//! ```text
//!   wire JSON ──► Engine::deserialize_model ──► ModelInstance
//!                  │  per field, first match wins:
//!                  │   1. explicit transformer ──► TransformerRegistry
//!                  │   2. explicit nested model ──► MetadataStore
//!                  │   3. declared type ─────────► TransformerRegistry
//!                  │   4. inference ─────────────► SignatureRegistry
//!                  │   5. plain copy
//!                  ▼
//!   wire JSON ◄── Engine::serialize_model ◄─── ModelInstance
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wiremodel_core::prelude::*;
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let account = engine.define(
//!     ModelClass::builder("Account")
//!         .field("owner")
//!         .aliased("balance", "bigint")
//!         .build(),
//! )?;
//!
//! let instance = engine.deserialize_model(
//!     &account,
//!     json!({"owner": "ada", "balance": "12345678901234567890"}),
//! )?;
//! assert!(instance.get("balance").unwrap().as_bigint().is_some());
//! assert_eq!(
//!     engine.serialize_model(&instance),
//!     json!({"owner": "ada", "balance": "12345678901234567890"}),
//! );
//! ```
//!
//! ## Custom Transformers
//!
//! Implement [`Transformer`] and register it under any keys:
//!
//! ```rust,ignore
//! engine.register_transformer(
//!     [TransformerKey::Tag(TypeTag::Custom("Money")), TransformerKey::alias("money")],
//!     Arc::new(MoneyTransformer),
//! );
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`] - The conversion engine
//! - [`transformer`] - Transformer trait, registry and built-ins
//! - [`value`] - Runtime value types
//! - [`metadata`] - Model classes and field descriptors
//! - [`signature`] - Structural signatures and inference
//! - [`logging`] - Structured log events

mod config;
pub mod engine;
mod error;
mod key;
pub mod logging;
pub mod metadata;
mod model;
pub mod signature;
pub mod transformer;
pub mod value;

#[cfg(test)]
mod tests;

// Public API
pub use config::{CollisionMode, ConfigValidationError, DEFAULT_MAX_DEPTH, EngineConfig};
pub use engine::Engine;
pub use error::{ErrorCode, TransformError, TransformResult, describe};
pub use key::{NativeType, TransformerKey, TypeTag};
pub use metadata::{
    DeclaredType, FieldDescriptor, MetadataStore, ModelClass, ModelClassBuilder, ModelRef,
};
pub use model::ModelInstance;
pub use signature::{Signature, SignatureRegistry};
pub use transformer::{FieldContext, Transformer, TransformerRegistry};
pub use value::{
    ByteView, Bytes, CustomType, CustomValue, ElementKind, ErrorValue, Pattern, QueryParams,
    RuntimeValue, Symbol, TypedArray, UniqueSet, ValueMap, WideIntArray, WideKind,
};

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use wiremodel_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Configuration
        CollisionMode,
        // Models
        DeclaredType,
        // Engine
        Engine,
        EngineConfig,
        // Errors
        ErrorCode,
        FieldContext,
        FieldDescriptor,
        ModelClass,
        ModelInstance,
        // Values
        RuntimeValue,
        TransformError,
        TransformResult,
        // Transformers
        Transformer,
        TransformerKey,
        TypeTag,
    };
    pub use serde_json::{Value, json};
    pub use std::sync::Arc;
}
