//! Error tests - codes, display format and serialization of TransformError

use proptest::prelude::*;
use serde_json::json;

use crate::error::{ErrorCode, TransformError};

fn all_codes() -> Vec<ErrorCode> {
    vec![
        ErrorCode::ShapeMismatch,
        ErrorCode::InvalidInternKey,
        ErrorCode::UnknownTransformer,
        ErrorCode::UnknownModel,
        ErrorCode::SignatureCollision,
        ErrorCode::DepthExceeded,
        ErrorCode::InvalidConfig,
        ErrorCode::SerializationError,
    ]
}

proptest! {
    /// Property: codes serialize to the same string `as_str` reports
    #[test]
    fn prop_code_serialization_matches_as_str(index in 0usize..8) {
        let code = all_codes()[index];
        let serialized = serde_json::to_value(code).unwrap();
        prop_assert_eq!(serialized, json!(code.as_str()));
    }

    /// Property: display always names the code and the location
    #[test]
    fn prop_display_names_location(owner in "[A-Z][a-z]{1,8}", field in "[a-z]{1,8}") {
        let error = TransformError::shape_mismatch(&owner, &field, "string", &json!(1));
        let text = error.to_string();
        prop_assert!(text.starts_with("[SHAPE_MISMATCH]"));
        let location = format!("{}.{}", owner, field);
        prop_assert!(text.contains(&location));
    }
}

#[test]
fn test_shape_mismatch_carries_context() {
    let error = TransformError::shape_mismatch("User", "createdAt", "ISO-8601 string", &json!(true));
    assert_eq!(error.code, ErrorCode::ShapeMismatch);
    assert_eq!(error.owner, "User");
    assert_eq!(error.field, "createdAt");
    assert_eq!(error.expected.as_deref(), Some("ISO-8601 string"));
    assert_eq!(error.received, Some(json!(true)));
    assert_eq!(
        error.to_string(),
        "[SHAPE_MISMATCH] User.createdAt: expected ISO-8601 string, received boolean true"
    );
}

#[test]
fn test_location_without_field() {
    let error = TransformError::unknown_model("Ghost");
    assert_eq!(error.location(), "<engine>");
    assert!(error.to_string().contains("'Ghost'"));

    let error = TransformError::signature_collision("a,b", "First", "Second");
    assert_eq!(error.location(), "Second");
}

#[test]
fn test_error_serde_round_trip() {
    let error = TransformError::invalid_intern_key("Token", "kind", &json!(5));
    let text = serde_json::to_string(&error).unwrap();
    assert!(text.contains("INVALID_INTERN_KEY"));
    let parsed: TransformError = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, error);
}

#[test]
fn test_from_serde_json_error() {
    let json_error = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
    let error: TransformError = json_error.into();
    assert_eq!(error.code, ErrorCode::SerializationError);
}

#[test]
fn test_data_error_classification() {
    assert!(ErrorCode::ShapeMismatch.is_data_error());
    assert!(ErrorCode::DepthExceeded.is_data_error());
    assert!(!ErrorCode::UnknownModel.is_data_error());
    assert!(!ErrorCode::SignatureCollision.is_data_error());
}
