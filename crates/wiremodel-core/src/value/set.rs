//! Insertion-ordered set of wire values.

use indexmap::IndexMap;
use serde_json::Value;

/// A collection of unique wire values, in first-insertion order.
///
/// Uniqueness is structural: two objects with the same contents count as
/// the same member, whatever their key order. Members are indexed by a
/// canonical text form, so inserts and lookups do not scan the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueSet {
    items: IndexMap<String, Value>,
}

impl UniqueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`; returns false when an equal member already exists.
    pub fn insert(&mut self, value: Value) -> bool {
        let key = canonical_key(&value);
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.contains_key(&canonical_key(value))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Values<'_, String, Value> {
        self.items.values()
    }

    pub fn to_wire(&self) -> Value {
        Value::Array(self.items.values().cloned().collect())
    }
}

impl FromIterator<Value> for UniqueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<'a> IntoIterator for &'a UniqueSet {
    type Item = &'a Value;
    type IntoIter = indexmap::map::Values<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// JSON text with object keys sorted at every level.
fn canonical_key(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(object) => {
            let mut keys: Vec<&String> = object.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_canonical(&object[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
