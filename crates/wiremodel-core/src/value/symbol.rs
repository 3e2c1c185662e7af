//! Interned symbols.

use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;

/// A symbol identified by its intern key.
///
/// Two symbols with the same key are equal, whether or not they came from
/// the same [`SymbolTable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// A symbol for `key` that is not backed by any table.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(Arc::from(key.as_ref()))
    }

    /// The intern key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Process-wide table that hands out one shared allocation per key.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: DashMap<String, Arc<str>>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the symbol registered under `key`, creating it on first use.
    pub fn intern(&self, key: &str) -> Symbol {
        if let Some(existing) = self.entries.get(key) {
            return Symbol(existing.clone());
        }
        let shared = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::from(key))
            .clone();
        Symbol(shared)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_shares_allocation() {
        let table = SymbolTable::new();
        let a = table.intern("status");
        let b = table.intern("status");
        assert_eq!(a, b);
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_equality_is_by_key() {
        let table = SymbolTable::new();
        assert_eq!(table.intern("k"), Symbol::new("k"));
        assert_ne!(table.intern("k"), Symbol::new("j"));
    }
}
