//! # wiremodel
//!
//! Typed model instances from plain JSON, with lossless round trips.
//!
//! ## Overview
//!
//! This crate is the user-facing layer over [`wiremodel_core`]:
//!
//! - **Mapper** owns a shared engine. Every model class and custom
//!   transformer is registered up front in [`MapperBuilder::build`]
//! - **Model** wraps one converted instance and keeps the wire snapshot taken
//!   when it was constructed
//! - **ModelSchema** declares a model class statically on a Rust type
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wiremodel::prelude::*;
//!
//! struct Account;
//!
//! impl ModelSchema for Account {
//!     fn model_name() -> &'static str {
//!         "Account"
//!     }
//!
//!     fn declare(builder: ModelClassBuilder) -> ModelClassBuilder {
//!         builder.field("owner").aliased("balance", "bigint")
//!     }
//! }
//!
//! let mapper = Mapper::builder().schema::<Account>().build()?;
//! let mut account = mapper.construct_as::<Account>(json!({
//!     "owner": "ada",
//!     "balance": "12345678901234567890",
//! }))?;
//!
//! account.assign("balance", json!("1"))?;
//! assert_eq!(account.to_wire()["balance"], json!("1"));
//! assert_eq!(account.initial_field("balance"), Some(&json!("12345678901234567890")));
//! ```
//!
//! ## Module Structure
//!
//! - [`mapper`] - Mapper and its builder
//! - [`model`] - Model instances and static schemas
//! - [`error`] - Facade error type

pub mod error;
pub mod mapper;
pub mod model;

pub use error::{ModelError, ModelResult};
pub use mapper::{Mapper, MapperBuilder};
pub use model::{Model, ModelSchema};

pub use wiremodel_core as core;
pub use wiremodel_core::{
    CollisionMode, CustomType, CustomValue, DeclaredType, Engine, EngineConfig, ErrorCode,
    FieldContext, FieldDescriptor, ModelClass, ModelClassBuilder, ModelInstance, RuntimeValue,
    TransformError, TransformResult, Transformer, TransformerKey, TypeTag,
};

/// Prelude for convenient imports
///
/// ```rust,ignore
/// use wiremodel::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Configuration
        CollisionMode,
        DeclaredType,
        EngineConfig,
        // Errors
        ErrorCode,
        FieldContext,
        // Facade
        Mapper,
        Model,
        ModelClass,
        ModelClassBuilder,
        ModelError,
        ModelResult,
        ModelSchema,
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
