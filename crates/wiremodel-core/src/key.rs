//! Registry keys for transformers.
//!
//! A transformer can be reached three equivalent ways: by its symbolic
//! [`TypeTag`], by a lowercase string alias, or by the Rust type that plays the
//! role of the runtime constructor ([`NativeType`]).

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Symbolic type tag.
///
/// Built-in runtime types have a dedicated variant. Host applications use
/// [`TypeTag::Custom`] for their own types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Date,
    BigInt,
    Symbol,
    RegExp,
    Error,
    Url,
    UrlSearchParams,
    Int8Array,
    Uint8Array,
    Int16Array,
    Uint16Array,
    Int32Array,
    Uint32Array,
    Float32Array,
    Float64Array,
    BigInt64Array,
    BigUint64Array,
    ArrayBuffer,
    DataView,
    Map,
    Set,
    String,
    Number,
    Boolean,
    /// Host-defined type, identified by name
    Custom(&'static str),
}

impl TypeTag {
    /// Every built-in tag, in registration order.
    pub const BUILTIN: [TypeTag; 24] = [
        TypeTag::Date,
        TypeTag::BigInt,
        TypeTag::Symbol,
        TypeTag::RegExp,
        TypeTag::Error,
        TypeTag::Url,
        TypeTag::UrlSearchParams,
        TypeTag::Int8Array,
        TypeTag::Uint8Array,
        TypeTag::Int16Array,
        TypeTag::Uint16Array,
        TypeTag::Int32Array,
        TypeTag::Uint32Array,
        TypeTag::Float32Array,
        TypeTag::Float64Array,
        TypeTag::BigInt64Array,
        TypeTag::BigUint64Array,
        TypeTag::ArrayBuffer,
        TypeTag::DataView,
        TypeTag::Map,
        TypeTag::Set,
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
    ];

    /// Display name, matching the runtime constructor name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::BigInt => "BigInt",
            Self::Symbol => "Symbol",
            Self::RegExp => "RegExp",
            Self::Error => "Error",
            Self::Url => "URL",
            Self::UrlSearchParams => "URLSearchParams",
            Self::Int8Array => "Int8Array",
            Self::Uint8Array => "Uint8Array",
            Self::Int16Array => "Int16Array",
            Self::Uint16Array => "Uint16Array",
            Self::Int32Array => "Int32Array",
            Self::Uint32Array => "Uint32Array",
            Self::Float32Array => "Float32Array",
            Self::Float64Array => "Float64Array",
            Self::BigInt64Array => "BigInt64Array",
            Self::BigUint64Array => "BigUint64Array",
            Self::ArrayBuffer => "ArrayBuffer",
            Self::DataView => "DataView",
            Self::Map => "Map",
            Self::Set => "Set",
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Custom(name) => *name,
        }
    }

    /// The lowercase string alias the tag is registered under.
    pub fn alias(&self) -> String {
        self.name().to_ascii_lowercase()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type standing in for a runtime constructor reference.
#[derive(Debug, Clone, Copy)]
pub struct NativeType {
    id: TypeId,
    name: &'static str,
}

impl NativeType {
    /// The native key for `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Full Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NativeType {}

impl Hash for NativeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Lookup key of the transformer registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransformerKey {
    /// Symbolic type tag
    Tag(TypeTag),
    /// Lowercase string literal, e.g. `"date"`
    Alias(String),
    /// Native constructor stand-in
    Native(NativeType),
}

impl TransformerKey {
    /// Alias key, normalized to lowercase.
    pub fn alias(name: impl AsRef<str>) -> Self {
        Self::Alias(name.as_ref().to_ascii_lowercase())
    }

    /// Native key for `T`.
    pub fn native<T: ?Sized + 'static>() -> Self {
        Self::Native(NativeType::of::<T>())
    }
}

impl From<TypeTag> for TransformerKey {
    fn from(tag: TypeTag) -> Self {
        Self::Tag(tag)
    }
}

impl From<&str> for TransformerKey {
    fn from(alias: &str) -> Self {
        Self::alias(alias)
    }
}

impl From<NativeType> for TransformerKey {
    fn from(native: NativeType) -> Self {
        Self::Native(native)
    }
}

impl fmt::Display for TransformerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(tag) => write!(f, "tag {}", tag),
            Self::Alias(alias) => write!(f, "alias \"{}\"", alias),
            Self::Native(native) => write!(f, "type {}", native.type_name()),
        }
    }
}
