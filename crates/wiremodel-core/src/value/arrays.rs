//! Fixed-width numeric arrays and raw byte buffers.

use serde_json::{Number, Value};
use thiserror::Error;

use crate::key::TypeTag;

/// Element type of a [`TypedArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 8] = [
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::Float32,
        Self::Float64,
    ];

    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Int8 => TypeTag::Int8Array,
            Self::Uint8 => TypeTag::Uint8Array,
            Self::Int16 => TypeTag::Int16Array,
            Self::Uint16 => TypeTag::Uint16Array,
            Self::Int32 => TypeTag::Int32Array,
            Self::Uint32 => TypeTag::Uint32Array,
            Self::Float32 => TypeTag::Float32Array,
            Self::Float64 => TypeTag::Float64Array,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }
}

/// Why a number could not become an array element.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ElementError {
    #[error("element {index} is not a number")]
    NotANumber { index: usize },
    #[error("element {index} ({value}) is not an integer")]
    NotIntegral { index: usize, value: f64 },
    #[error("element {index} ({value}) is out of range")]
    OutOfRange { index: usize, value: f64 },
}

/// A fixed-width numeric array.
///
/// Equality treats NaN elements as equal to each other.
#[derive(Debug, Clone)]
pub enum TypedArray {
    Int8(Vec<i8>),
    Uint8(Vec<u8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl TypedArray {
    /// Build an array of `kind` from wire elements.
    ///
    /// Integer kinds reject fractional and out-of-range elements instead of
    /// wrapping them. Float kinds also accept `"NaN"`, `"Infinity"` and
    /// `"-Infinity"`.
    pub fn from_elements(kind: ElementKind, elements: &[&Value]) -> Result<Self, ElementError> {
        let numbers = elements
            .iter()
            .enumerate()
            .map(|(index, v)| number(kind, v).ok_or(ElementError::NotANumber { index }))
            .collect::<Result<Vec<f64>, _>>()?;

        Ok(match kind {
            ElementKind::Int8 => Self::Int8(integers(&numbers)?),
            ElementKind::Uint8 => Self::Uint8(integers(&numbers)?),
            ElementKind::Int16 => Self::Int16(integers(&numbers)?),
            ElementKind::Uint16 => Self::Uint16(integers(&numbers)?),
            ElementKind::Int32 => Self::Int32(integers(&numbers)?),
            ElementKind::Uint32 => Self::Uint32(integers(&numbers)?),
            ElementKind::Float32 => Self::Float32(numbers.iter().map(|&n| n as f32).collect()),
            ElementKind::Float64 => Self::Float64(numbers),
        })
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Int8(_) => ElementKind::Int8,
            Self::Uint8(_) => ElementKind::Uint8,
            Self::Int16(_) => ElementKind::Int16,
            Self::Uint16(_) => ElementKind::Uint16,
            Self::Int32(_) => ElementKind::Int32,
            Self::Uint32(_) => ElementKind::Uint32,
            Self::Float32(_) => ElementKind::Float32,
            Self::Float64(_) => ElementKind::Float64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Int8(v) => v.len(),
            Self::Uint8(v) => v.len(),
            Self::Int16(v) => v.len(),
            Self::Uint16(v) => v.len(),
            Self::Int32(v) => v.len(),
            Self::Uint32(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain array of numbers. Non-finite floats are written as strings.
    pub fn to_wire(&self) -> Value {
        let numbers: Vec<Value> = match self {
            Self::Int8(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Uint8(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Int16(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Uint16(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Int32(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Uint32(v) => v.iter().map(|&n| Value::from(n)).collect(),
            Self::Float32(v) => v.iter().map(|&n| float(f64::from(n))).collect(),
            Self::Float64(v) => v.iter().map(|&n| float(n)).collect(),
        };
        Value::Array(numbers)
    }
}

impl PartialEq for TypedArray {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int8(a), Self::Int8(b)) => a == b,
            (Self::Uint8(a), Self::Uint8(b)) => a == b,
            (Self::Int16(a), Self::Int16(b)) => a == b,
            (Self::Uint16(a), Self::Uint16(b)) => a == b,
            (Self::Int32(a), Self::Int32(b)) => a == b,
            (Self::Uint32(a), Self::Uint32(b)) => a == b,
            (Self::Float32(a), Self::Float32(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
            }
            (Self::Float64(a), Self::Float64(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(x, y)| x == y || (x.is_nan() && y.is_nan()))
            }
            _ => false,
        }
    }
}

fn number(kind: ElementKind, value: &Value) -> Option<f64> {
    match value {
        Value::String(text) if kind.is_float() => match text.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        other => other.as_f64(),
    }
}

fn integers<T: TryFrom<i64>>(numbers: &[f64]) -> Result<Vec<T>, ElementError> {
    numbers
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(ElementError::NotIntegral { index, value });
            }
            T::try_from(value as i64).map_err(|_| ElementError::OutOfRange { index, value })
        })
        .collect()
}

fn float(n: f64) -> Value {
    match Number::from_f64(n) {
        Some(number) => Value::Number(number),
        None if n.is_nan() => Value::from("NaN"),
        None if n > 0.0 => Value::from("Infinity"),
        None => Value::from("-Infinity"),
    }
}

/// Signedness of a [`WideIntArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WideKind {
    Signed,
    Unsigned,
}

impl WideKind {
    pub fn tag(&self) -> TypeTag {
        match self {
            Self::Signed => TypeTag::BigInt64Array,
            Self::Unsigned => TypeTag::BigUint64Array,
        }
    }
}

/// 64-bit integer array.
///
/// Elements travel as decimal strings since JSON numbers cannot hold the full
/// 64-bit range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WideIntArray {
    Signed(Vec<i64>),
    Unsigned(Vec<u64>),
}

impl WideIntArray {
    pub fn kind(&self) -> WideKind {
        match self {
            Self::Signed(_) => WideKind::Signed,
            Self::Unsigned(_) => WideKind::Unsigned,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Signed(v) => v.len(),
            Self::Unsigned(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_wire(&self) -> Value {
        let items = match self {
            Self::Signed(v) => v.iter().map(|n| Value::String(n.to_string())).collect(),
            Self::Unsigned(v) => v.iter().map(|n| Value::String(n.to_string())).collect(),
        };
        Value::Array(items)
    }
}

/// Raw byte buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bytes(pub Vec<u8>);

/// Byte-addressable view over a buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView(pub Vec<u8>);

impl Bytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn to_wire(&self) -> Value {
        bytes_to_wire(&self.0)
    }
}

impl ByteView {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn byte_length(&self) -> usize {
        self.0.len()
    }

    /// Byte at `offset`.
    pub fn get_uint8(&self, offset: usize) -> Option<u8> {
        self.0.get(offset).copied()
    }

    pub fn to_wire(&self) -> Value {
        bytes_to_wire(&self.0)
    }
}

fn bytes_to_wire(bytes: &[u8]) -> Value {
    Value::Array(bytes.iter().map(|&b| Value::from(b)).collect())
}

/// Elements of an array or array-like object (`{"0": .., "1": ..}`).
///
/// Array-like keys must be contiguous from zero; a `length` key is ignored.
pub fn array_like(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => {
            let mut indexed = Vec::with_capacity(map.len());
            for (key, item) in map {
                if key == "length" {
                    continue;
                }
                indexed.push((key.parse::<usize>().ok()?, item));
            }
            indexed.sort_by_key(|(index, _)| *index);
            indexed
                .iter()
                .enumerate()
                .all(|(expected, (index, _))| expected == *index)
                .then(|| indexed.into_iter().map(|(_, item)| item).collect())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_elements_are_checked() {
        let values = [json!(1), json!(2.5)];
        let refs: Vec<&Value> = values.iter().collect();
        assert_eq!(
            TypedArray::from_elements(ElementKind::Int8, &refs),
            Err(ElementError::NotIntegral { index: 1, value: 2.5 })
        );

        let values = [json!(300)];
        let refs: Vec<&Value> = values.iter().collect();
        assert!(matches!(
            TypedArray::from_elements(ElementKind::Uint8, &refs),
            Err(ElementError::OutOfRange { index: 0, .. })
        ));
    }

    #[test]
    fn test_float_elements() {
        let values = [json!(1.5), json!(-2)];
        let refs: Vec<&Value> = values.iter().collect();
        let array = TypedArray::from_elements(ElementKind::Float64, &refs).unwrap();
        assert_eq!(array, TypedArray::Float64(vec![1.5, -2.0]));
        assert_eq!(array.to_wire(), json!([1.5, -2.0]));
    }

    #[test]
    fn test_non_finite_floats_travel_as_strings() {
        let array = TypedArray::Float64(vec![1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY]);
        let wire = array.to_wire();
        assert_eq!(wire, json!([1.0, "NaN", "Infinity", "-Infinity"]));

        let elements = wire.as_array().unwrap();
        let refs: Vec<&Value> = elements.iter().collect();
        assert_eq!(TypedArray::from_elements(ElementKind::Float64, &refs).unwrap(), array);
        assert_eq!(
            TypedArray::from_elements(ElementKind::Int32, &refs[1..2]),
            Err(ElementError::NotANumber { index: 0 })
        );
    }

    #[test]
    fn test_array_like_object() {
        let object = json!({"1": 20, "0": 10, "length": 2});
        let items = array_like(&object).unwrap();
        assert_eq!(items, vec![&json!(10), &json!(20)]);

        assert!(array_like(&json!({"0": 1, "2": 3})).is_none());
        assert!(array_like(&json!({"a": 1})).is_none());
        assert!(array_like(&json!("text")).is_none());
    }

    #[test]
    fn test_wide_ints_travel_as_strings() {
        let array = WideIntArray::Unsigned(vec![u64::MAX]);
        assert_eq!(array.to_wire(), json!(["18446744073709551615"]));
    }
}
