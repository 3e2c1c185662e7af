//! Signature tests - canonical signatures, exact inference and collision
//! handling

use proptest::prelude::*;
use serde_json::json;
use std::sync::Arc;

use crate::config::CollisionMode;
use crate::error::ErrorCode;
use crate::metadata::ModelClass;
use crate::signature::{Signature, SignatureRegistry};

fn class(name: &str, fields: &[&str]) -> Arc<ModelClass> {
    Arc::new(ModelClass::builder(name).fields(fields.iter().copied()).build())
}

proptest! {
    /// Property: signatures ignore order and duplicates
    #[test]
    fn prop_signature_is_canonical(names in prop::collection::vec("[a-z]{1,6}", 1..8)) {
        let mut reversed = names.clone();
        reversed.reverse();
        let mut doubled = names.clone();
        doubled.extend(names.iter().cloned());

        let signature = Signature::from_names(&names);
        prop_assert_eq!(&signature, &Signature::from_names(&reversed));
        prop_assert_eq!(&signature, &Signature::from_names(&doubled));

        let parts: Vec<&str> = signature.as_str().split(',').collect();
        let mut sorted = parts.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(parts, sorted);
    }

    /// Property: an object matches only when its key set is exactly the class's
    #[test]
    fn prop_inference_is_exact(extra in "[A-Z]{1,4}") {
        let registry = SignatureRegistry::default();
        registry.register(class("Point", &["x", "y"])).unwrap();

        let reordered = json!({"y": 1, "x": 2});
        let partial = json!({"x": 1});
        prop_assert!(registry.infer(&reordered).is_some());
        prop_assert!(registry.infer(&partial).is_none());
        let mut object = json!({"x": 1, "y": 2});
        object[extra.as_str()] = json!(true);
        prop_assert!(registry.infer(&object).is_none());
    }
}

#[test]
fn test_signature_forms() {
    let point = class("Point", &["y", "x"]);
    assert_eq!(Signature::of_class(&point).as_str(), "x,y");
    let object = json!({"y": 0, "x": 0});
    assert_eq!(
        Signature::of_object(object.as_object().unwrap()),
        Signature::of_class(&point)
    );
}

#[test]
fn test_non_objects_never_match() {
    let registry = SignatureRegistry::default();
    registry.register(class("Point", &["x", "y"])).unwrap();
    assert!(registry.infer(&json!(["x", "y"])).is_none());
    assert!(registry.infer(&json!("x,y")).is_none());
    assert!(registry.infer(&json!(null)).is_none());
}

#[test]
fn test_strict_collision_is_rejected() {
    let registry = SignatureRegistry::new(CollisionMode::Strict);
    registry.register(class("Point", &["x", "y"])).unwrap();

    let error = registry.register(class("Vector", &["y", "x"])).unwrap_err();
    assert_eq!(error.code, ErrorCode::SignatureCollision);
    assert!(error.message.contains("Point"));
    assert!(error.message.contains("Vector"));
    assert_eq!(registry.infer(&json!({"x": 0, "y": 0})).unwrap().name(), "Point");
}

#[test]
fn test_overwrite_collision_last_wins() {
    let registry = SignatureRegistry::new(CollisionMode::Overwrite);
    registry.register(class("Point", &["x", "y"])).unwrap();
    registry.register(class("Vector", &["x", "y"])).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.infer(&json!({"x": 0, "y": 0})).unwrap().name(), "Vector");
}

#[test]
fn test_same_class_registers_idempotently() {
    let registry = SignatureRegistry::new(CollisionMode::Strict);
    registry.register(class("Point", &["x", "y"])).unwrap();
    registry.register(class("Point", &["x", "y"])).unwrap();
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_explicit_field_signature() {
    let registry = SignatureRegistry::default();
    registry
        .register_fields(class("Point", &["x", "y"]), ["x", "y", "z"])
        .unwrap();
    assert!(registry.infer(&json!({"x": 1, "y": 2})).is_none());
    assert!(registry.infer(&json!({"x": 1, "y": 2, "z": 3})).is_some());
}

#[test]
fn test_empty_signature_is_not_registered() {
    let registry = SignatureRegistry::default();
    registry.register(class("Marker", &[])).unwrap();
    assert!(registry.is_empty());
    assert!(registry.infer(&json!({})).is_none());
}

#[test]
fn test_retain_current_drops_older_definitions() {
    let registry = SignatureRegistry::default();
    let old = class("Shape", &["x", "y"]);
    registry.register(old.clone()).unwrap();
    registry
        .register_fields(old, ["x", "y", "z"])
        .unwrap();
    registry.register(class("Other", &["a"])).unwrap();
    let current = class("Shape", &["p", "q"]);
    registry.register(current.clone()).unwrap();

    assert_eq!(registry.retain_current(&current), 2);
    assert_eq!(registry.len(), 2);
    assert!(registry.infer(&json!({"x": 1, "y": 2})).is_none());
    assert!(registry.infer(&json!({"a": 1})).is_some());
    registry.register(class("Point", &["x", "y"])).unwrap();
}

#[test]
fn test_remove_signature() {
    let registry = SignatureRegistry::default();
    registry.register(class("Point", &["x", "y"])).unwrap();
    let removed = registry.remove(&Signature::from_names(["y", "x"])).unwrap();
    assert_eq!(removed.name(), "Point");
    assert!(registry.is_empty());
}
