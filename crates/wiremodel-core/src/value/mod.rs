//! Runtime values produced by conversion.
//!
//! Wire data is plain JSON. After conversion a field holds a [`RuntimeValue`]:
//! either the JSON value untouched, or one of the richer types that a
//! transformer reconstructed from it.
//!
//! Every runtime value has a wire form ([`RuntimeValue::to_wire`]). The
//! engine normally serializes through the transformer registry; `to_wire` is
//! the fallback that applies when no transformer is involved.

mod arrays;
mod custom;
mod error_value;
mod pattern;
mod query;
mod set;
mod symbol;

pub use arrays::{
    ByteView, Bytes, ElementError, ElementKind, TypedArray, WideIntArray, WideKind, array_like,
};
pub use custom::{CustomType, CustomValue, custom_eq};
pub use error_value::{DEFAULT_ERROR_NAME, ErrorValue};
pub use pattern::{Pattern, PatternError};
pub use query::QueryParams;
pub use set::UniqueSet;
pub use symbol::{Symbol, SymbolTable};

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use num_bigint::BigInt;
use serde_json::{Map, Value};
use url::Url;

use crate::key::TypeTag;
use crate::model::ModelInstance;

/// String-keyed map with insertion order.
pub type ValueMap = IndexMap<String, RuntimeValue>;

/// A field value after conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeValue {
    /// Plain JSON, not reconstructed
    Json(Value),
    Date(DateTime<Utc>),
    BigInt(BigInt),
    Symbol(Symbol),
    RegExp(Pattern),
    Error(ErrorValue),
    Url(Url),
    Query(QueryParams),
    Typed(TypedArray),
    WideInt(WideIntArray),
    Buffer(Bytes),
    View(ByteView),
    Map(ValueMap),
    Set(UniqueSet),
    /// Array whose elements went through conversion
    Array(Vec<RuntimeValue>),
    Model(ModelInstance),
    Custom(CustomValue),
}

impl RuntimeValue {
    pub fn null() -> Self {
        Self::Json(Value::Null)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Tag of the transformer that owns this kind of value, if any.
    ///
    /// Plain JSON, arrays and models are not owned by a transformer.
    pub fn type_tag(&self) -> Option<TypeTag> {
        Some(match self {
            Self::Date(_) => TypeTag::Date,
            Self::BigInt(_) => TypeTag::BigInt,
            Self::Symbol(_) => TypeTag::Symbol,
            Self::RegExp(_) => TypeTag::RegExp,
            Self::Error(_) => TypeTag::Error,
            Self::Url(_) => TypeTag::Url,
            Self::Query(_) => TypeTag::UrlSearchParams,
            Self::Typed(array) => array.kind().tag(),
            Self::WideInt(array) => array.kind().tag(),
            Self::Buffer(_) => TypeTag::ArrayBuffer,
            Self::View(_) => TypeTag::DataView,
            Self::Map(_) => TypeTag::Map,
            Self::Set(_) => TypeTag::Set,
            Self::Custom(custom) => custom.type_tag(),
            Self::Json(_) | Self::Array(_) | Self::Model(_) => return None,
        })
    }

    /// Whether the value holds other runtime values.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Map(_) | Self::Array(_) | Self::Model(_))
    }

    /// Wire form without consulting any registry.
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::Date(date) => Value::String(encode_date(date)),
            Self::BigInt(n) => Value::String(n.to_string()),
            Self::Symbol(symbol) => Value::String(symbol.key().to_string()),
            Self::RegExp(pattern) => pattern.to_wire(),
            Self::Error(error) => error.to_wire(),
            Self::Url(url) => Value::String(url.as_str().to_string()),
            Self::Query(params) => Value::String(params.to_query_string()),
            Self::Typed(array) => array.to_wire(),
            Self::WideInt(array) => array.to_wire(),
            Self::Buffer(bytes) => bytes.to_wire(),
            Self::View(view) => view.to_wire(),
            Self::Map(entries) => map_to_wire(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_wire()))
                    .collect(),
            ),
            Self::Set(set) => set.to_wire(),
            Self::Array(items) => Value::Array(items.iter().map(RuntimeValue::to_wire).collect()),
            Self::Model(model) => model.to_wire(),
            Self::Custom(custom) => custom.to_wire(),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// String content of a plain JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(date) => Some(date),
            _ => None,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            Self::BigInt(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&Pattern> {
        match self {
            Self::RegExp(pattern) => Some(pattern),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelInstance> {
        match self {
            Self::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[RuntimeValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&UniqueSet> {
        match self {
            Self::Set(set) => Some(set),
            _ => None,
        }
    }
}

/// ISO-8601 UTC form with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn encode_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<Value> for RuntimeValue {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<DateTime<Utc>> for RuntimeValue {
    fn from(date: DateTime<Utc>) -> Self {
        Self::Date(date)
    }
}

impl From<BigInt> for RuntimeValue {
    fn from(n: BigInt) -> Self {
        Self::BigInt(n)
    }
}

impl From<Pattern> for RuntimeValue {
    fn from(pattern: Pattern) -> Self {
        Self::RegExp(pattern)
    }
}

impl From<ErrorValue> for RuntimeValue {
    fn from(error: ErrorValue) -> Self {
        Self::Error(error)
    }
}

impl From<Url> for RuntimeValue {
    fn from(url: Url) -> Self {
        Self::Url(url)
    }
}

impl From<ModelInstance> for RuntimeValue {
    fn from(model: ModelInstance) -> Self {
        Self::Model(model)
    }
}

impl From<&str> for RuntimeValue {
    fn from(text: &str) -> Self {
        Self::Json(Value::String(text.to_string()))
    }
}

impl From<String> for RuntimeValue {
    fn from(text: String) -> Self {
        Self::Json(Value::String(text))
    }
}

/// Wire form of an encoded map.
///
/// A map whose only key is `entries` holding pairs would read back as the
/// `{entries: [...]}` form, so it is written as an array of pairs instead.
pub fn map_to_wire(object: Map<String, Value>) -> Value {
    if entries_pairs(&object).is_none() {
        return Value::Object(object);
    }
    Value::Array(
        object
            .into_iter()
            .map(|(key, value)| Value::Array(vec![Value::String(key), value]))
            .collect(),
    )
}

/// The pair list of a `{entries: [[key, value], ...]}` object.
pub fn entries_pairs(object: &Map<String, Value>) -> Option<&Vec<Value>> {
    if object.len() != 1 {
        return None;
    }
    let entries = object.get("entries")?.as_array()?;
    entries
        .iter()
        .all(|pair| pair.as_array().is_some_and(|p| p.len() == 2))
        .then_some(entries)
}
