//! Error types for conversion operations
//!
//! Every fatal failure in the engine surfaces as a [`TransformError`]. The
//! error always names the owning model class and the field being converted,
//! together with the expected shape and the value that was actually received,
//! so callers can pinpoint malformed wire data without looking at engine
//! internals.
//!
//! # Error Codes
//!
//! Error codes are represented by the [`ErrorCode`] enum. When serialized,
//! codes are converted to SCREAMING_SNAKE_CASE strings.
//!
//! # Example
//! ```rust,ignore
//! use wiremodel_core::{ErrorCode, TransformError};
//!
//! let error = TransformError::shape_mismatch("User", "createdAt", "ISO-8601 string", &json!(true));
//! assert_eq!(error.code, ErrorCode::ShapeMismatch);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Type-safe error codes for conversion failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorCode {
    /// A transformer received a value of an unconvertible shape
    ShapeMismatch,
    /// The symbol transformer received something that is not an intern key
    InvalidInternKey,
    /// A field referenced a transformer key that is not registered
    UnknownTransformer,
    /// A field or call referenced a model class that is not defined
    UnknownModel,
    /// Two different model classes produced the same structural signature
    SignatureCollision,
    /// Recursive conversion went deeper than the configured ceiling
    DepthExceeded,
    /// The engine configuration is invalid
    InvalidConfig,
    /// JSON text could not be parsed or produced
    SerializationError,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ShapeMismatch => "SHAPE_MISMATCH",
            Self::InvalidInternKey => "INVALID_INTERN_KEY",
            Self::UnknownTransformer => "UNKNOWN_TRANSFORMER",
            Self::UnknownModel => "UNKNOWN_MODEL",
            Self::SignatureCollision => "SIGNATURE_COLLISION",
            Self::DepthExceeded => "DEPTH_EXCEEDED",
            Self::InvalidConfig => "INVALID_CONFIG",
            Self::SerializationError => "SERIALIZATION_ERROR",
        }
    }

    /// Returns true if the error comes from the data being converted rather
    /// than from how the engine was set up.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch | Self::InvalidInternKey | Self::DepthExceeded
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Conversion error with a typed code and the field it happened on.
///
/// `owner` and `field` are empty for errors that are not tied to a field
/// (configuration problems, registry collisions).
///
/// # Example
/// ```rust,ignore
/// use wiremodel_core::{ErrorCode, TransformError};
///
/// let error = TransformError::new(ErrorCode::UnknownModel, "Model 'Ghost' is not defined")
///     .with_location("Order", "customer");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {}: {message}", location_label(.owner, .field))]
pub struct TransformError {
    /// Type-safe error code
    pub code: ErrorCode,
    /// Owning model class name
    pub owner: String,
    /// Field name within the owner
    pub field: String,
    /// Description of the accepted shape(s)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// The offending wire value, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received: Option<Value>,
    /// Human-readable error message
    pub message: String,
}

impl TransformError {
    /// Create a new error with code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            owner: String::new(),
            field: String::new(),
            expected: None,
            received: None,
            message: message.into(),
        }
    }

    /// Attach the owning class and field name.
    pub fn with_location(mut self, owner: impl Into<String>, field: impl Into<String>) -> Self {
        self.owner = owner.into();
        self.field = field.into();
        self
    }

    /// Attach the expected shape description.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Attach the received wire value.
    pub fn with_received(mut self, received: Value) -> Self {
        self.received = Some(received);
        self
    }

    /// `Owner.field`, or just the owner when no field is known.
    pub fn location(&self) -> String {
        location_label(&self.owner, &self.field)
    }

    // Convenience constructors

    /// Create a SHAPE_MISMATCH error.
    pub fn shape_mismatch(
        owner: &str,
        field: &str,
        expected: impl Into<String>,
        received: &Value,
    ) -> Self {
        let expected = expected.into();
        Self::new(
            ErrorCode::ShapeMismatch,
            format!("expected {}, received {}", expected, describe(received)),
        )
        .with_location(owner, field)
        .with_expected(expected)
        .with_received(received.clone())
    }

    /// Create an INVALID_INTERN_KEY error.
    pub fn invalid_intern_key(owner: &str, field: &str, received: &Value) -> Self {
        Self::new(
            ErrorCode::InvalidInternKey,
            format!("expected a string intern key, received {}", describe(received)),
        )
        .with_location(owner, field)
        .with_expected("string key")
        .with_received(received.clone())
    }

    /// Create an UNKNOWN_TRANSFORMER error.
    pub fn unknown_transformer(owner: &str, field: &str, key: &str) -> Self {
        Self::new(
            ErrorCode::UnknownTransformer,
            format!("no transformer registered for key {}", key),
        )
        .with_location(owner, field)
    }

    /// Create an UNKNOWN_MODEL error.
    pub fn unknown_model(name: &str) -> Self {
        Self::new(
            ErrorCode::UnknownModel,
            format!("model class '{}' is not defined", name),
        )
    }

    /// Create a SIGNATURE_COLLISION error.
    pub fn signature_collision(signature: &str, existing: &str, incoming: &str) -> Self {
        Self::new(
            ErrorCode::SignatureCollision,
            format!(
                "signature '{}' is already registered by '{}', cannot register '{}'",
                signature, existing, incoming
            ),
        )
        .with_location(incoming, "")
    }

    /// Create a DEPTH_EXCEEDED error.
    pub fn depth_exceeded(owner: &str, field: &str, max_depth: usize) -> Self {
        Self::new(
            ErrorCode::DepthExceeded,
            format!("nesting exceeds the maximum depth of {}", max_depth),
        )
        .with_location(owner, field)
    }

    /// Create an INVALID_CONFIG error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, message)
    }

    /// Create a SERIALIZATION_ERROR error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

fn location_label(owner: &str, field: &str) -> String {
    match (owner.is_empty(), field.is_empty()) {
        (true, true) => "<engine>".to_string(),
        (false, true) => owner.to_string(),
        (true, false) => field.to_string(),
        (false, false) => format!("{}.{}", owner, field),
    }
}

/// Short description of a wire value for error messages.
///
/// Long strings and containers are summarized so messages stay readable.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) if s.chars().count() > 48 => {
            let head: String = s.chars().take(48).collect();
            format!("string \"{}...\"", head)
        }
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(items) => format!("array of {} element(s)", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).take(6).collect();
            format!("object {{{}}}", keys.join(", "))
        }
    }
}

/// Result type alias for conversion operations.
pub type TransformResult<T> = Result<T, TransformError>;
