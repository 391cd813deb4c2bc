//! Union discrimination behavior.

use serde_json::json;
use triage::{IssueCode, Schema, SchemaLike};

#[test]
fn test_string_or_number_batch() {
    // Scenario: union [string, number] over ["a", 1, true, [1,2]].
    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::number());
    let verdicts = schema.validate_batch(&[json!("a"), json!(1), json!(true), json!([1, 2])]);
    assert_eq!(verdicts, vec![true, true, false, false]);
}

#[test]
fn test_discriminate_is_stable() {
    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::number())
        .variant(Schema::array(Schema::number()));

    for value in [json!("x"), json!(1.5), json!([1]), json!(true), json!(null)] {
        let first = schema.discriminate(&value);
        for _ in 0..5 {
            assert_eq!(schema.discriminate(&value), first);
        }
    }
    assert_eq!(schema.discriminate(&json!("x")), Some(0));
    assert_eq!(schema.discriminate(&json!(1.5)), Some(1));
    assert_eq!(schema.discriminate(&json!([1])), Some(2));
    assert_eq!(schema.discriminate(&json!(true)), None);
}

#[test]
fn test_object_members_discriminate_by_shape() {
    let circle = Schema::object()
        .field("radius", Schema::number());
    let rect = Schema::object()
        .field("width", Schema::number())
        .field("height", Schema::number());
    let schema = Schema::union().variant(circle).variant(rect);

    assert_eq!(schema.discriminate(&json!({"radius": 2})), Some(0));
    assert_eq!(
        schema.discriminate(&json!({"width": 2, "height": 3})),
        Some(1)
    );
    assert_eq!(schema.discriminate(&json!({"side": 4})), None);
}

#[test]
fn test_overlapping_members_resolve_to_first() {
    // Both members accept objects; an input satisfying both picks the
    // earlier registration.
    let loose = Schema::object().optional("id", Schema::number());
    let tight = Schema::object().field("id", Schema::number());
    let schema = Schema::union().variant(loose).variant(tight);
    assert_eq!(schema.discriminate(&json!({"id": 1})), Some(0));
}

#[test]
fn test_validate_failure_is_no_matching_variant() {
    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::array(Schema::string()));

    let err = schema.validate(&json!(42)).unwrap_err();
    assert_eq!(err.first().code, IssueCode::NoMatchingVariant);

    let failure = schema.safe_parse(&json!(42)).into_result().unwrap_err();
    assert_eq!(failure.first().code, IssueCode::NoMatchingVariant);
}

#[test]
fn test_union_inside_object_field() {
    let schema = Schema::object().field(
        "id",
        Schema::union()
            .variant(Schema::string())
            .variant(Schema::number()),
    );
    assert!(schema.validate(&json!({"id": "abc"})).is_ok());
    assert!(schema.validate(&json!({"id": 42})).is_ok());

    let err = schema
        .safe_parse(&json!({"id": true}))
        .into_result()
        .unwrap_err();
    assert_eq!(err.first().code, IssueCode::NoMatchingVariant);
    assert_eq!(err.first().path.to_string(), "id");
}

#[test]
fn test_union_validate_returns_member_data() {
    let schema = Schema::union()
        .variant(Schema::object().field("id", Schema::number()))
        .variant(Schema::number());
    assert_eq!(schema.validate(&json!(5)).unwrap(), json!(5));
    assert_eq!(
        schema.validate(&json!({"id": 5, "noise": 1})).unwrap(),
        json!({"id": 5})
    );
}

#[test]
fn test_member_accessors() {
    let schema = Schema::union()
        .variant(Schema::string())
        .variant(Schema::number());
    assert_eq!(schema.len(), 2);
    assert!(!schema.is_empty());
    assert!(schema.member(0).is_some());
    assert!(schema.member(2).is_none());
}
