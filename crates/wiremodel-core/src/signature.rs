//! Structural signatures and model inference.
//!
//! A signature is the sorted, deduplicated set of field names of a model
//! class, joined with commas. A plain object whose own keys produce exactly
//! the signature of a registered class is treated as an instance of that
//! class.
//!
//! Matching is exact: an object with a missing or an extra key does not match.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::config::CollisionMode;
use crate::error::{TransformError, TransformResult};
use crate::logging::log_signature_collision;
use crate::metadata::ModelClass;

/// Separator between field names in a signature.
pub const SIGNATURE_DELIMITER: &str = ",";

/// Canonical form of a set of field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(String);

impl Signature {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let sorted: BTreeSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        Self(
            sorted
                .into_iter()
                .collect::<Vec<_>>()
                .join(SIGNATURE_DELIMITER),
        )
    }

    /// Signature of a class's declared fields.
    pub fn of_class(class: &ModelClass) -> Self {
        Self::from_names(class.field_names())
    }

    /// Signature of an object's own keys.
    pub fn of_object(object: &Map<String, Value>) -> Self {
        Self::from_names(object.keys())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signature to model class index used for inference.
#[derive(Debug)]
pub struct SignatureRegistry {
    entries: DashMap<Signature, Arc<ModelClass>>,
    mode: CollisionMode,
}

impl SignatureRegistry {
    pub fn new(mode: CollisionMode) -> Self {
        Self {
            entries: DashMap::new(),
            mode,
        }
    }

    pub fn mode(&self) -> CollisionMode {
        self.mode
    }

    /// Register a class under the signature of its declared fields.
    pub fn register(&self, class: Arc<ModelClass>) -> TransformResult<()> {
        let signature = Signature::of_class(&class);
        self.register_signature(signature, class)
    }

    /// Register a class under an explicit list of field names.
    pub fn register_fields<I, S>(&self, class: Arc<ModelClass>, field_names: I) -> TransformResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.register_signature(Signature::from_names(field_names), class)
    }

    /// Register a class under `signature`.
    ///
    /// An empty signature is never registered since every empty object would
    /// match it.
    ///
    /// # Errors
    ///
    /// `SignatureCollision` in strict mode when a different class already owns
    /// the signature.
    pub fn register_signature(
        &self,
        signature: Signature,
        class: Arc<ModelClass>,
    ) -> TransformResult<()> {
        if signature.is_empty() {
            tracing::trace!(class = %class.name(), "Skipping empty signature");
            return Ok(());
        }

        match self.entries.entry(signature) {
            Entry::Vacant(slot) => {
                slot.insert(class);
                Ok(())
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get().name().to_string();
                if existing == class.name() {
                    slot.insert(class);
                    return Ok(());
                }
                match self.mode {
                    CollisionMode::Strict => {
                        log_signature_collision(slot.key().as_str(), &existing, class.name(), false);
                        Err(TransformError::signature_collision(
                            slot.key().as_str(),
                            &existing,
                            class.name(),
                        ))
                    }
                    CollisionMode::Overwrite => {
                        log_signature_collision(slot.key().as_str(), &existing, class.name(), true);
                        slot.insert(class);
                        Ok(())
                    }
                }
            }
        }
    }

    pub fn remove(&self, signature: &Signature) -> Option<Arc<ModelClass>> {
        self.entries.remove(signature).map(|(_, class)| class)
    }

    /// Drop every signature held by an older definition of `current`'s name.
    ///
    /// Returns the number of signatures removed.
    pub fn retain_current(&self, current: &Arc<ModelClass>) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, class| class.name() != current.name() || Arc::ptr_eq(class, current));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(class = %current.name(), removed, "Dropped stale signatures");
        }
        removed
    }

    pub fn lookup(&self, signature: &Signature) -> Option<Arc<ModelClass>> {
        self.entries.get(signature).map(|entry| entry.value().clone())
    }

    /// The class whose signature equals the object's key set.
    ///
    /// Non-object values never match.
    pub fn infer(&self, value: &Value) -> Option<Arc<ModelClass>> {
        let object = value.as_object()?;
        self.lookup(&Signature::of_object(object))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SignatureRegistry {
    fn default() -> Self {
        Self::new(CollisionMode::default())
    }
}
