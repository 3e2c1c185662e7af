//! Configuration module for the conversion engine.
//!
//! This module provides the [`EngineConfig`] struct for customizing engine
//! behavior, and [`CollisionMode`] for choosing how the signature registry
//! reacts when two model classes share a structural signature.
//!
//! # Example
//! ```rust,ignore
//! use wiremodel_core::{CollisionMode, EngineConfig};
//!
//! let config = EngineConfig::new()
//!     .with_max_depth(32)
//!     .with_collision_mode(CollisionMode::Overwrite)
//!     .with_debug_logging(true);
//! config.validate()?;
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::TransformError;

/// Default ceiling for nested model and array descent.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Error type for configuration validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// max_depth must be greater than 0
    InvalidMaxDepth,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMaxDepth => write!(f, "max_depth must be greater than 0"),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl From<ConfigValidationError> for TransformError {
    fn from(err: ConfigValidationError) -> Self {
        TransformError::invalid_config(err.to_string())
    }
}

/// What the signature registry does when a second model class registers a
/// signature that another class already owns.
///
/// # Variants
///
/// * `Strict` - Reject the registration with a `SignatureCollision` error.
///   The ambiguity surfaces at definition time instead of as a confusing
///   misclassification at conversion time.
///
/// * `Overwrite` - The later class replaces the earlier one and a warning is
///   logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CollisionMode {
    /// Reject a colliding registration.
    #[default]
    Strict,
    /// Last registration wins.
    Overwrite,
}

impl fmt::Display for CollisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Engine configuration.
///
/// All fields have defaults that let the engine work out of the box. Use
/// [`EngineConfig::default()`] to get the default configuration.
///
/// # Fields
///
/// * `max_depth` - Maximum nesting of models and arrays a single conversion may
///   descend through before failing with `DepthExceeded`. Default: 64.
///
/// * `collision_mode` - How duplicate structural signatures are handled.
///   Default: `Strict`.
///
/// * `lenient_wide_ints` - When true, 64-bit integer arrays turn unparseable
///   elements into zero instead of failing. Default: true.
///
/// * `debug_logging` - Emit per-field strategy decisions at debug level instead
///   of trace level. Default: false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum nesting depth (default: 64)
    pub max_depth: usize,
    /// Signature collision handling (default: Strict)
    pub collision_mode: CollisionMode,
    /// Zero-default unparseable 64-bit array elements (default: true)
    pub lenient_wide_ints: bool,
    /// Verbose strategy logging (default: false)
    pub debug_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            collision_mode: CollisionMode::default(),
            lenient_wide_ints: true,
            debug_logging: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return an error if invalid.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_depth` is 0.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.max_depth == 0 {
            return Err(ConfigValidationError::InvalidMaxDepth);
        }
        Ok(())
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the signature collision mode.
    pub fn with_collision_mode(mut self, mode: CollisionMode) -> Self {
        self.collision_mode = mode;
        self
    }

    /// Enable or disable lenient 64-bit integer array parsing.
    pub fn with_lenient_wide_ints(mut self, lenient: bool) -> Self {
        self.lenient_wide_ints = lenient;
        self
    }

    /// Enable or disable verbose strategy logging.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// One-line summary used in the engine initialization log.
    pub fn summary(&self) -> String {
        format!(
            "max_depth: {}, collisions: {}, lenient_wide_ints: {}",
            self.max_depth, self.collision_mode, self.lenient_wide_ints
        )
    }
}
