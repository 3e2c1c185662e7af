//! Error type of the model facade

use thiserror::Error;
use wiremodel_core::{ErrorCode, TransformError};

/// Errors raised by [`Mapper`](crate::Mapper) and [`Model`](crate::Model).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// Conversion failed inside the engine
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A field that the model class does not declare was assigned
    #[error("model {model} has no field '{field}'")]
    UnknownField { model: String, field: String },
}

impl ModelError {
    pub fn unknown_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Engine error code, when the failure came from the engine.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Transform(error) => Some(error.code),
            Self::UnknownField { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transform(error.into())
    }
}

/// Result type for facade operations.
pub type ModelResult<T> = Result<T, ModelError>;
