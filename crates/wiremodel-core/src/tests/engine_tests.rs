//! Engine tests - strategy priority, nesting, inference, depth guard and
//! round trips through Engine

use proptest::prelude::*;
use serde_json::{Value, json};
use std::any::Any;
use std::sync::Arc;

use crate::config::{CollisionMode, EngineConfig};
use crate::engine::Engine;
use crate::error::{ErrorCode, TransformResult};
use crate::key::{TransformerKey, TypeTag};
use crate::metadata::{DeclaredType, FieldDescriptor, ModelClass};
use crate::transformer::{FieldContext, Transformer};
use crate::value::{CustomType, CustomValue, RuntimeValue, custom_eq};

fn engine() -> Engine {
    Engine::new(EngineConfig::default()).unwrap()
}

// =============================================================================
// Strategy Priority
// =============================================================================

#[test]
fn test_explicit_transformer_beats_everything() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Stamp").fields(["at"]).build())
        .unwrap();
    let descriptor = FieldDescriptor::new("value")
        .with_transformer(TypeTag::BigInt)
        .with_model("Stamp")
        .with_declared(DeclaredType::Date);

    let value = engine
        .deserialize_field(json!("42"), &descriptor, "Owner")
        .unwrap();
    assert_eq!(value.to_wire(), json!("42"));
    assert!(value.as_bigint().is_some());
}

#[test]
fn test_nested_model_beats_declared_and_inference() {
    let engine = engine();
    engine
        .define(ModelClass::builder("A").fields(["x"]).build())
        .unwrap();
    engine
        .define(ModelClass::builder("B").fields(["x", "y"]).build())
        .unwrap();
    let descriptor = FieldDescriptor::new("child")
        .with_model("A")
        .with_declared(DeclaredType::Map);

    // The object has B's signature, but the annotation says A.
    let value = engine
        .deserialize_field(json!({"x": 1, "y": 2}), &descriptor, "Owner")
        .unwrap();
    let model = value.as_model().unwrap();
    assert_eq!(model.class_name(), "A");
    assert!(!model.is_set("y"));
}

#[test]
fn test_declared_type_beats_inference() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let descriptor = FieldDescriptor::new("lookup").with_declared(DeclaredType::Map);

    let value = engine
        .deserialize_field(json!({"x": 1, "y": 2}), &descriptor, "Owner")
        .unwrap();
    assert!(value.as_map().is_some());
}

#[test]
fn test_plain_field_copies_unmatched_values() {
    let engine = engine();
    let descriptor = FieldDescriptor::new("anything");
    for raw in [json!(1), json!("text"), json!({"free": "form"}), json!([1, "two"])] {
        let value = engine
            .deserialize_field(raw.clone(), &descriptor, "Owner")
            .unwrap();
        assert_eq!(value, RuntimeValue::Json(raw));
    }
}

#[test]
fn test_null_is_kept_for_every_strategy() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let descriptors = [
        FieldDescriptor::new("a").with_transformer(TypeTag::Date),
        FieldDescriptor::new("b").with_model("Point"),
        FieldDescriptor::new("c").with_declared(DeclaredType::Set),
        FieldDescriptor::new("d"),
    ];
    for descriptor in &descriptors {
        let value = engine
            .deserialize_field(Value::Null, descriptor, "Owner")
            .unwrap();
        assert!(value.is_null());
    }
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unknown_annotations_fail() {
    let engine = engine();
    let error = engine
        .deserialize_field(json!(1), &FieldDescriptor::new("f").with_transformer("money"), "Owner")
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::UnknownTransformer);
    assert_eq!(error.location(), "Owner.f");

    let error = engine
        .deserialize_field(json!({}), &FieldDescriptor::new("f").with_model("Ghost"), "Owner")
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::UnknownModel);
    assert_eq!(error.location(), "Owner.f");

    let error = engine.deserialize_named("Ghost", json!({})).unwrap_err();
    assert_eq!(error.code, ErrorCode::UnknownModel);

    let error = engine
        .register_model_signature("Ghost", ["a", "b"])
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::UnknownModel);
}

#[test]
fn test_transformer_error_aborts_instance() {
    let engine = engine();
    let user = engine
        .define(
            ModelClass::builder("User")
                .field("id")
                .tagged("createdAt", TypeTag::Date)
                .build(),
        )
        .unwrap();
    let error = engine
        .deserialize_model(&user, json!({"id": 1, "createdAt": "soon"}))
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ShapeMismatch);
    assert_eq!(error.location(), "User.createdAt");
    assert_eq!(error.received, Some(json!("soon")));
}

#[test]
fn test_nested_model_shape_mismatch() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let error = engine
        .deserialize_field(json!("0,0"), &FieldDescriptor::new("origin").with_model("Point"), "Shape")
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ShapeMismatch);
    assert_eq!(error.location(), "Shape.origin");
}

#[test]
fn test_define_collision_leaves_class_undefined() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let error = engine
        .define(ModelClass::builder("Vector").fields(["x", "y"]).build())
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::SignatureCollision);
    assert!(engine.class("Vector").is_none());
}

#[test]
fn test_redefinition_releases_old_signature() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Shape").fields(["x", "y"]).build())
        .unwrap();
    engine
        .register_model_signature("Shape", ["x", "y", "z"])
        .unwrap();
    engine
        .define(ModelClass::builder("Shape").fields(["p", "q"]).build())
        .unwrap();

    assert!(engine.signatures().infer(&json!({"x": 1, "y": 2})).is_none());
    assert!(engine.signatures().infer(&json!({"x": 1, "y": 2, "z": 3})).is_none());
    let current = engine.signatures().infer(&json!({"p": 1, "q": 2})).unwrap();
    assert_eq!(current.field_names().collect::<Vec<_>>(), ["p", "q"]);

    let point = engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let inferred = engine.signatures().infer(&json!({"x": 1, "y": 2})).unwrap();
    assert!(Arc::ptr_eq(&inferred, &point));
}

#[test]
fn test_identical_redefinition_keeps_class_inferable() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let again = engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let inferred = engine.signatures().infer(&json!({"x": 1, "y": 2})).unwrap();
    assert!(Arc::ptr_eq(&inferred, &again));
}

// =============================================================================
// Models
// =============================================================================

#[test]
fn test_absent_and_undeclared_keys() {
    let engine = engine();
    let point = engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let instance = engine
        .deserialize_model(&point, json!({"x": 1, "color": "red"}))
        .unwrap();
    assert!(instance.is_set("x"));
    assert!(!instance.is_set("y"));
    assert!(instance.get("color").is_none());
    assert_eq!(engine.serialize_model(&instance), json!({"x": 1}));
}

#[test]
fn test_array_of_nested_models() {
    let engine = engine();
    engine
        .define(
            ModelClass::builder("Line")
                .field("sku")
                .aliased("qty", "bigint")
                .build(),
        )
        .unwrap();
    let order = engine
        .define(ModelClass::builder("Order").nested("lines", "Line").build())
        .unwrap();

    let wire = json!({"lines": [{"sku": "a", "qty": "1"}, null, {"sku": "b", "qty": "2"}]});
    let instance = engine.deserialize_model(&order, wire.clone()).unwrap();
    let lines = instance.get("lines").unwrap().as_array().unwrap();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0].as_model().unwrap().class_name(), "Line");
    assert!(lines[1].is_null());
    assert_eq!(engine.serialize_model(&instance), wire);
}

#[test]
fn test_self_referencing_model() {
    let engine = engine();
    let node = engine
        .define(
            ModelClass::builder("Node")
                .field("label")
                .nested("next", "Node")
                .build(),
        )
        .unwrap();
    let wire = json!({"label": "a", "next": {"label": "b", "next": {"label": "c", "next": null}}});
    let instance = engine.deserialize_model(&node, wire.clone()).unwrap();
    let second = instance.get("next").unwrap().as_model().unwrap();
    assert_eq!(second.get("label"), Some(&RuntimeValue::from("b")));
    assert_eq!(engine.serialize_model(&instance), wire);
}

#[test]
fn test_instance_of_other_class_is_read_through_wire() {
    let engine = engine();
    let point = engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let labeled = engine
        .define(ModelClass::builder("Labeled").fields(["x", "y", "label"]).build())
        .unwrap();
    let source = engine
        .deserialize_model(&labeled, json!({"x": 1, "y": 2, "label": "p"}))
        .unwrap();
    let converted = engine
        .deserialize_model(&point, RuntimeValue::Model(source))
        .unwrap();
    assert_eq!(converted.class_name(), "Point");
    assert_eq!(engine.serialize_model(&converted), json!({"x": 1, "y": 2}));
}

// =============================================================================
// Inference
// =============================================================================

#[test]
fn test_inference_through_nested_arrays() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let value = engine
        .deserialize_field(
            json!([[{"x": 1, "y": 2}], [{"x": 3}], 5]),
            &FieldDescriptor::new("grid"),
            "Plot",
        )
        .unwrap();
    let rows = value.as_array().unwrap();
    let first = rows[0].as_array().unwrap();
    assert_eq!(first[0].as_model().unwrap().class_name(), "Point");
    // A partial object does not match and the row stays plain.
    assert_eq!(rows[1], RuntimeValue::Json(json!([{"x": 3}])));
    assert_eq!(rows[2], RuntimeValue::Json(json!(5)));
}

#[test]
fn test_failed_inferred_model_degrades_to_copy() {
    let engine = engine();
    engine
        .define(
            ModelClass::builder("Event")
                .field("name")
                .tagged("at", TypeTag::Date)
                .build(),
        )
        .unwrap();
    let raw = json!({"name": "launch", "at": "not a date"});
    let value = engine
        .deserialize_field(raw.clone(), &FieldDescriptor::new("event"), "Log")
        .unwrap();
    assert_eq!(value, RuntimeValue::Json(raw));
}

#[test]
fn test_map_values_are_inferred() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    let value = engine
        .deserialize_field(
            json!({"home": {"x": 0, "y": 0}, "count": 2}),
            &FieldDescriptor::new("places").with_declared(DeclaredType::Map),
            "Atlas",
        )
        .unwrap();
    let map = value.as_map().unwrap();
    assert!(map["home"].as_model().is_some());
    assert_eq!(map["count"], RuntimeValue::Json(json!(2)));
}

#[test]
fn test_map_with_lone_entries_key_round_trips() {
    let engine = engine();
    let holder = engine
        .define(
            ModelClass::builder("Holder")
                .declared("m", DeclaredType::Map)
                .build(),
        )
        .unwrap();
    let mut entries = crate::value::ValueMap::new();
    entries.insert("entries".into(), RuntimeValue::Json(json!([["a", 1]])));
    let mut instance = engine.deserialize_model(&holder, json!({})).unwrap();
    instance.set("m", RuntimeValue::Map(entries.clone())).unwrap();

    let wire = engine.serialize_model(&instance);
    let back = engine.deserialize_model(&holder, wire).unwrap();
    assert_eq!(back.get("m"), Some(&RuntimeValue::Map(entries)));
}

#[test]
fn test_registered_extra_signature() {
    let engine = engine();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    engine
        .register_model_signature("Point", ["x", "y", "z"])
        .unwrap();
    let value = engine
        .deserialize_field(json!({"x": 1, "y": 2, "z": 3}), &FieldDescriptor::new("p"), "Space")
        .unwrap();
    assert_eq!(value.as_model().unwrap().class_name(), "Point");
}

// =============================================================================
// Depth Guard
// =============================================================================

fn chain(levels: usize) -> Value {
    let mut wire = json!({"label": "leaf", "next": null});
    for i in 0..levels {
        wire = json!({"label": format!("n{}", i), "next": wire});
    }
    wire
}

#[test]
fn test_depth_guard_on_explicit_nesting() {
    let engine = Engine::new(EngineConfig::new().with_max_depth(3)).unwrap();
    let node = engine
        .define(
            ModelClass::builder("Node")
                .field("label")
                .nested("next", "Node")
                .build(),
        )
        .unwrap();
    assert!(engine.deserialize_model(&node, chain(3)).is_ok());
    let error = engine.deserialize_model(&node, chain(10)).unwrap_err();
    assert_eq!(error.code, ErrorCode::DepthExceeded);
}

#[test]
fn test_depth_guard_on_inference() {
    let engine = Engine::new(EngineConfig::new().with_max_depth(4)).unwrap();
    engine
        .define(ModelClass::builder("Node").fields(["label", "next"]).build())
        .unwrap();
    let error = engine
        .deserialize_field(chain(20), &FieldDescriptor::new("root"), "Tree")
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::DepthExceeded);
}

// =============================================================================
// Custom Values
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Money {
    cents: i64,
    currency: String,
}

impl CustomType for Money {
    fn type_tag(&self) -> TypeTag {
        TypeTag::Custom("Money")
    }

    fn to_wire(&self) -> Value {
        json!(format!("{}.{:02} {}", self.cents / 100, self.cents % 100, self.currency))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_custom(&self, other: &dyn CustomType) -> bool {
        custom_eq(self, other)
    }
}

struct MoneyTransformer;

impl Transformer for MoneyTransformer {
    fn name(&self) -> &str {
        "money"
    }

    fn tag(&self) -> TypeTag {
        TypeTag::Custom("Money")
    }

    fn from_wire(&self, value: RuntimeValue, ctx: &FieldContext<'_>) -> TransformResult<RuntimeValue> {
        if matches!(&value, RuntimeValue::Custom(custom) if custom.downcast_ref::<Money>().is_some()) {
            return Ok(value);
        }
        let object = value.as_json().and_then(Value::as_object);
        let parsed = object.and_then(|o| Some((o.get("cents")?.as_i64()?, o.get("currency")?.as_str()?)));
        match parsed {
            Some((cents, currency)) => Ok(RuntimeValue::Custom(CustomValue::new(Money {
                cents,
                currency: currency.to_string(),
            }))),
            None => Err(ctx.mismatch_value("{cents, currency}", &value)),
        }
    }

    fn to_wire(&self, value: &RuntimeValue) -> Value {
        match value {
            RuntimeValue::Custom(custom) => match custom.downcast_ref::<Money>() {
                Some(money) => json!({"cents": money.cents, "currency": money.currency}),
                None => custom.to_wire(),
            },
            other => other.to_wire(),
        }
    }
}

#[test]
fn test_custom_transformer_round_trip() {
    let engine = engine();
    engine.register_transformer(
        [TransformerKey::Tag(TypeTag::Custom("Money")), TransformerKey::alias("money")],
        Arc::new(MoneyTransformer),
    );
    let invoice = engine
        .define(ModelClass::builder("Invoice").aliased("total", "money").build())
        .unwrap();

    let wire = json!({"total": {"cents": 1250, "currency": "EUR"}});
    let instance = engine.deserialize_model(&invoice, wire.clone()).unwrap();
    let RuntimeValue::Custom(total) = instance.get("total").unwrap() else {
        panic!("expected a custom value");
    };
    assert_eq!(total.downcast_ref::<Money>().unwrap().cents, 1250);
    assert_eq!(engine.serialize_model(&instance), wire);
    // Without the registry the value falls back to its own wire form.
    assert_eq!(instance.to_wire(), json!({"total": "12.50 EUR"}));
}

// =============================================================================
// Round Trips
// =============================================================================

fn kitchen_sink(engine: &Engine) -> Arc<ModelClass> {
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    engine
        .define(
            ModelClass::builder("Sink")
                .field("id")
                .tagged("createdAt", TypeTag::Date)
                .aliased("balance", "bigint")
                .native::<regex::Regex>("rule")
                .declared("tags", DeclaredType::Set)
                .declared("attrs", DeclaredType::Map)
                .tagged("samples", TypeTag::Int16Array)
                .nested("origin", "Point")
                .field("extra")
                .build(),
        )
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: deserialize(serialize(m)) == m, and deserializing a converted
    /// instance again is a no-op
    #[test]
    fn prop_model_round_trip(
        id in any::<i64>(),
        millis in 0_i64..4_102_444_800_000,
        balance in any::<i128>(),
        tags in prop::collection::vec("[a-z]{1,4}", 0..6),
        samples in prop::collection::vec(any::<i16>(), 0..8),
        x in any::<i32>(),
        y in any::<i32>(),
        with_extra in any::<bool>(),
    ) {
        let engine = engine();
        let sink = kitchen_sink(&engine);
        let mut wire = json!({
            "id": id,
            "createdAt": millis,
            "balance": balance.to_string(),
            "rule": "/^[a-z]+$/i",
            "tags": tags,
            "attrs": {"p": {"x": x, "y": y}, "n": 1},
            "samples": samples,
            "origin": {"x": x, "y": y},
        });
        if with_extra {
            wire["extra"] = json!([{"x": y, "y": x}, "plain"]);
        }

        let first = engine.deserialize_model(&sink, wire).unwrap();
        let encoded = engine.serialize_model(&first);
        let second = engine.deserialize_model(&sink, encoded.clone()).unwrap();
        prop_assert_eq!(&second, &first);
        prop_assert_eq!(engine.serialize_model(&second), encoded);

        let again = engine
            .deserialize_model(&sink, RuntimeValue::Model(first.clone()))
            .unwrap();
        prop_assert_eq!(again, first);
    }

    /// Property: re-applying field conversion to converted data yields equal data
    #[test]
    fn prop_field_conversion_is_idempotent(x in any::<i32>(), y in any::<i32>(), n in any::<i64>()) {
        let engine = engine();
        let sink = kitchen_sink(&engine);
        let raw = json!([{"x": x, "y": y}, {"inner": {"x": y, "y": x}}, n]);
        for descriptor in sink.fields() {
            let Ok(first) = engine.deserialize_field(raw.clone(), descriptor, "Sink") else {
                continue;
            };
            let again = engine.deserialize_field(first.clone(), descriptor, "Sink").unwrap();
            prop_assert_eq!(again, first);
        }
    }
}

#[test]
fn test_overwrite_mode_engine() {
    let engine = Engine::new(EngineConfig::new().with_collision_mode(CollisionMode::Overwrite)).unwrap();
    engine
        .define(ModelClass::builder("Point").fields(["x", "y"]).build())
        .unwrap();
    engine
        .define(ModelClass::builder("Vector").fields(["x", "y"]).build())
        .unwrap();
    let value = engine
        .deserialize_field(json!({"x": 1, "y": 2}), &FieldDescriptor::new("v"), "Owner")
        .unwrap();
    assert_eq!(value.as_model().unwrap().class_name(), "Vector");
}
