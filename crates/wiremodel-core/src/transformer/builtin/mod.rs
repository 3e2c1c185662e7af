//! Built-in transformers.
//!
//! One transformer per runtime type. [`register_all`] installs them under
//! their tag, their lowercase alias and the Rust type that stands in for the
//! runtime constructor.

mod bigint;
mod bytes;
mod date;
mod error;
mod map;
mod pattern;
mod primitive;
mod query;
mod set;
mod symbol;
mod typed_array;
mod url;
mod wide_int;

pub use bigint::BigIntTransformer;
pub use bytes::{BufferTransformer, ViewTransformer};
pub use date::{DateTransformer, parse_date};
pub use error::ErrorTransformer;
pub use map::MapTransformer;
pub use pattern::PatternTransformer;
pub use primitive::PrimitiveTransformer;
pub use query::QueryTransformer;
pub use set::SetTransformer;
pub use symbol::SymbolTransformer;
pub use typed_array::TypedArrayTransformer;
pub use url::UrlTransformer;
pub use wide_int::WideIntTransformer;

use chrono::{DateTime, Utc};
use num_bigint::BigInt;
use std::sync::Arc;

use super::TransformerRegistry;
use crate::key::{NativeType, TypeTag};
use crate::value::{
    ByteView, Bytes, ElementKind, ErrorValue, Pattern, QueryParams, Symbol, UniqueSet, ValueMap,
    WideKind,
};

/// Install every built-in transformer into `registry`.
pub fn register_all(registry: &TransformerRegistry) {
    registry.register_standard(
        Arc::new(DateTransformer),
        &[NativeType::of::<DateTime<Utc>>()],
    );
    registry.register_standard(Arc::new(BigIntTransformer), &[NativeType::of::<BigInt>()]);
    registry.register_standard(
        Arc::new(SymbolTransformer::new()),
        &[NativeType::of::<Symbol>()],
    );
    registry.register_standard(
        Arc::new(PatternTransformer),
        &[NativeType::of::<Pattern>(), NativeType::of::<regex::Regex>()],
    );
    registry.register_standard(Arc::new(ErrorTransformer), &[NativeType::of::<ErrorValue>()]);
    registry.register_standard(Arc::new(UrlTransformer), &[NativeType::of::<::url::Url>()]);
    registry.register_standard(Arc::new(QueryTransformer), &[NativeType::of::<QueryParams>()]);

    for kind in ElementKind::ALL {
        registry.register_standard(
            Arc::new(TypedArrayTransformer::new(kind)),
            &[typed_array_native(kind)],
        );
    }
    registry.register_standard(
        Arc::new(WideIntTransformer::new(WideKind::Signed)),
        &[NativeType::of::<Vec<i64>>()],
    );
    registry.register_standard(
        Arc::new(WideIntTransformer::new(WideKind::Unsigned)),
        &[NativeType::of::<Vec<u64>>()],
    );

    registry.register_standard(Arc::new(BufferTransformer), &[NativeType::of::<Bytes>()]);
    registry.register_standard(Arc::new(ViewTransformer), &[NativeType::of::<ByteView>()]);
    registry.register_standard(Arc::new(MapTransformer), &[NativeType::of::<ValueMap>()]);
    registry.register_standard(Arc::new(SetTransformer), &[NativeType::of::<UniqueSet>()]);

    registry.register_standard(
        Arc::new(PrimitiveTransformer::new(TypeTag::String)),
        &[NativeType::of::<String>()],
    );
    registry.register_standard(
        Arc::new(PrimitiveTransformer::new(TypeTag::Number)),
        &[NativeType::of::<f64>()],
    );
    registry.register_standard(
        Arc::new(PrimitiveTransformer::new(TypeTag::Boolean)),
        &[NativeType::of::<bool>()],
    );
}

fn typed_array_native(kind: ElementKind) -> NativeType {
    match kind {
        ElementKind::Int8 => NativeType::of::<Vec<i8>>(),
        ElementKind::Uint8 => NativeType::of::<Vec<u8>>(),
        ElementKind::Int16 => NativeType::of::<Vec<i16>>(),
        ElementKind::Uint16 => NativeType::of::<Vec<u16>>(),
        ElementKind::Int32 => NativeType::of::<Vec<i32>>(),
        ElementKind::Uint32 => NativeType::of::<Vec<u32>>(),
        ElementKind::Float32 => NativeType::of::<Vec<f32>>(),
        ElementKind::Float64 => NativeType::of::<Vec<f64>>(),
    }
}
