//! Property-based tests for whole-model round trips through a Mapper.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use wiremodel::prelude::*;

fn mapper() -> Mapper {
    Mapper::builder()
        .model(ModelClass::builder("Point").fields(["x", "y"]).build())
        .model(
            ModelClass::builder("Ledger")
                .field("name")
                .aliased("total", "bigint")
                .tagged("openedAt", TypeTag::Date)
                .tagged("limits", TypeTag::BigUint64Array)
                .declared("labels", DeclaredType::Set)
                .nested("anchor", "Point")
                .field("path")
                .build(),
        )
        .build()
        .unwrap()
}

fn ledger_wire() -> impl Strategy<Value = Value> {
    (
        "[a-z]{1,10}",
        any::<i128>(),
        0_i64..4_102_444_800_000,
        prop::collection::vec(any::<u64>(), 0..6),
        prop::collection::vec("[a-c]", 0..6),
        any::<(i32, i32)>(),
        prop::collection::vec(any::<(i16, i16)>(), 0..5),
    )
        .prop_map(|(name, total, millis, limits, labels, anchor, path)| {
            let opened = Utc.timestamp_millis_opt(millis).single().unwrap_or_default();
            let limits: Vec<String> = limits.iter().map(|n| n.to_string()).collect();
            let path: Vec<Value> = path
                .into_iter()
                .map(|(x, y)| json!({"x": x, "y": y}))
                .collect();
            json!({
                "name": name,
                "total": total.to_string(),
                "openedAt": opened.to_rfc3339(),
                "limits": limits,
                "labels": labels,
                "anchor": {"x": anchor.0, "y": anchor.1},
                "path": path,
            })
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: construct(to_wire(m)) == m and the wire form is stable
    #[test]
    fn prop_model_round_trip(wire in ledger_wire()) {
        let mapper = mapper();
        let model = mapper.construct("Ledger", wire).unwrap();
        let encoded = model.to_wire();

        let rebuilt = mapper.construct("Ledger", encoded.clone()).unwrap();
        prop_assert_eq!(&rebuilt, &model);
        prop_assert_eq!(rebuilt.to_wire(), encoded.clone());
        prop_assert_eq!(model.initial_state(), &encoded);
    }

    /// Property: duplicates equal the original and keep their own snapshot
    #[test]
    fn prop_duplicate_matches(wire in ledger_wire(), name in "[A-Z]{1,6}") {
        let mapper = mapper();
        let mut model = mapper.construct("Ledger", wire).unwrap();
        let copy = model.duplicate().unwrap();
        prop_assert_eq!(&copy, &model);

        model.set("name", name.as_str()).unwrap();
        prop_assert_ne!(copy.to_wire()["name"].clone(), json!(name));
    }
}
