//! Transformer lookup table.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

use super::Transformer;
use super::builtin;
use crate::key::{NativeType, TransformerKey};
use crate::logging::log_transformer_registered;

/// Concurrent map from [`TransformerKey`] to transformer.
///
/// One transformer is normally reachable under several keys: its tag, its
/// lowercase alias and the Rust type that represents it.
#[derive(Default)]
pub struct TransformerRegistry {
    entries: DashMap<TransformerKey, Arc<dyn Transformer>>,
}

impl TransformerRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in transformer.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        builtin::register_all(&registry);
        registry
    }

    /// Register `transformer` under every key in `keys`.
    ///
    /// Existing entries for the same keys are replaced.
    pub fn register<I>(&self, keys: I, transformer: Arc<dyn Transformer>)
    where
        I: IntoIterator<Item = TransformerKey>,
    {
        let mut labels = Vec::new();
        for key in keys {
            labels.push(key.to_string());
            self.entries.insert(key, transformer.clone());
        }
        log_transformer_registered(transformer.name(), &labels);
    }

    /// Register under the transformer's own tag and alias plus `natives`.
    pub fn register_standard(&self, transformer: Arc<dyn Transformer>, natives: &[NativeType]) {
        let tag = transformer.tag();
        let keys = [TransformerKey::Tag(tag), TransformerKey::alias(tag.alias())]
            .into_iter()
            .chain(natives.iter().copied().map(TransformerKey::Native));
        self.register(keys, transformer);
    }

    /// Find the transformer for `key`. Alias lookups ignore case.
    pub fn lookup(&self, key: &TransformerKey) -> Option<Arc<dyn Transformer>> {
        let found = match key {
            TransformerKey::Alias(alias) if alias.chars().any(|c| c.is_ascii_uppercase()) => {
                self.entries.get(&TransformerKey::alias(alias))
            }
            _ => self.entries.get(key),
        };
        found.map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &TransformerKey) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of keys, not distinct transformers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("keys", &self.entries.len())
            .finish()
    }
}
