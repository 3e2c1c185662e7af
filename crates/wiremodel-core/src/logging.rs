//! Engine logging functions.
//!
//! Thin wrappers around `tracing` macros so every event the engine emits has
//! the same field names and level. The crate never installs a subscriber;
//! applications choose their own.

// =============================================================================
// Lifecycle
// =============================================================================

/// Log engine initialization. Logged at Info level.
///
/// # Example
///
/// ```rust,ignore
/// log_engine_init("max_depth: 64, collisions: strict, lenient_wide_ints: true", 24);
/// ```
pub fn log_engine_init(config_summary: &str, transformer_keys: usize) {
    tracing::info!(
        config = %config_summary,
        transformer_keys = %transformer_keys,
        "Conversion engine initialized"
    );
}

/// Log transformer registration under one or more keys. Logged at Trace level.
pub fn log_transformer_registered(name: &str, keys: &[String]) {
    tracing::trace!(
        transformer = %name,
        keys = %keys.join(", "),
        "Transformer registered"
    );
}

/// Log a model class definition. Logged at Debug level.
///
/// # Example
///
/// ```rust,ignore
/// log_model_defined("User", "balance,createdAt,id");
/// ```
pub fn log_model_defined(class_name: &str, signature: &str) {
    tracing::debug!(
        class = %class_name,
        signature = %signature,
        "Model class defined"
    );
}

// =============================================================================
// Signatures and inference
// =============================================================================

/// Log a signature collision. Logged at Warn level.
///
/// Emitted in both collision modes; `replaced` tells whether the incoming class
/// took over the signature.
pub fn log_signature_collision(signature: &str, existing: &str, incoming: &str, replaced: bool) {
    tracing::warn!(
        signature = %signature,
        existing = %existing,
        incoming = %incoming,
        replaced = %replaced,
        "Structural signature collision"
    );
}

/// Log a successful inference. Logged at Trace level.
pub fn log_inference_hit(owner: &str, field: &str, class_name: &str) {
    tracing::trace!(
        owner = %owner,
        field = %field,
        inferred = %class_name,
        "Inferred nested model"
    );
}

/// Log an inference miss. Logged at Debug level.
pub fn log_inference_miss(owner: &str, field: &str, signature: &str) {
    tracing::debug!(
        owner = %owner,
        field = %field,
        signature = %signature,
        "No model matches object signature, copying as-is"
    );
}

/// Log an inferred model whose construction failed. Logged at Debug level.
pub fn log_inference_fallback(owner: &str, field: &str, class_name: &str, error: &str) {
    tracing::debug!(
        owner = %owner,
        field = %field,
        inferred = %class_name,
        error = %error,
        "Inferred model could not be built, copying as-is"
    );
}

// =============================================================================
// Field conversion
// =============================================================================

/// Log the strategy chosen for a field.
///
/// Logged at Trace level, or Debug level when `verbose` is set.
pub fn log_field_strategy(owner: &str, field: &str, strategy: &str, verbose: bool) {
    if verbose {
        tracing::debug!(owner = %owner, field = %field, strategy = %strategy, "Converting field");
    } else {
        tracing::trace!(owner = %owner, field = %field, strategy = %strategy, "Converting field");
    }
}

/// Log wire keys that the class does not declare. Logged at Trace level.
pub fn log_undeclared_keys(class_name: &str, keys: &[&str]) {
    tracing::trace!(
        class = %class_name,
        keys = %keys.join(", "),
        "Ignoring undeclared keys"
    );
}

/// Log a lenient zero default for an unparseable element. Logged at Warn level.
pub fn log_lenient_default(owner: &str, field: &str, index: usize, element: &str) {
    tracing::warn!(
        owner = %owner,
        field = %field,
        index = %index,
        element = %element,
        "Unparseable 64-bit integer element, defaulting to 0"
    );
}
