//! Large-batch behavior and the verdicts-then-diagnose flow.

use serde_json::{json, Value};
use triage::{Schema, SchemaLike};

#[test]
fn test_ten_thousand_alternating_items() {
    // Scenario: {id: string, tags: array(string)} over 10,000 alternating
    // valid/invalid items.
    let schema = Schema::object()
        .field("id", Schema::string())
        .field("tags", Schema::array(Schema::string()));

    let values: Vec<Value> = (0..10_000)
        .map(|i| {
            if i % 2 == 0 {
                json!({"id": format!("item-{}", i), "tags": ["a", "b"]})
            } else {
                json!({"id": i, "tags": ["a", "b"]})
            }
        })
        .collect();

    let verdicts = schema.validate_batch(&values);
    assert_eq!(verdicts.len(), 10_000);
    let true_count = verdicts.iter().filter(|&&ok| ok).count();
    assert_eq!(true_count, 5_000);
    assert!(verdicts[0]);
    assert!(!verdicts[1]);
}

#[test]
fn test_batch_never_fails_per_element() {
    let schema = Schema::string();
    let values = vec![json!(null), json!({}), json!([]), json!(1)];
    // Garbage inputs reduce to false verdicts, nothing more.
    assert_eq!(schema.validate_batch(&values), vec![false; 4]);
}

#[test]
fn test_failing_subset_diagnosed_with_safe_parse() {
    // The documented recovery: verdicts first, then safe_parse on the
    // slots that came back false.
    let schema = Schema::object()
        .field("name", Schema::string())
        .field("age", Schema::number());

    let values = vec![
        json!({"name": "Ann", "age": 30}),
        json!({"name": 42, "age": 30}),
        json!({"name": "Bee", "age": "old"}),
    ];

    let verdicts = schema.validate_batch(&values);
    assert_eq!(verdicts, vec![true, false, false]);

    let mut diagnosed = 0;
    for (value, ok) in values.iter().zip(&verdicts) {
        if !ok {
            let err = schema.safe_parse(value).into_result().unwrap_err();
            assert!(err.len() >= 1);
            diagnosed += 1;
        }
    }
    assert_eq!(diagnosed, 2);
}

#[test]
fn test_batch_agrees_with_singles_across_variants() {
    let schemas: Vec<Box<dyn SchemaLike>> = vec![
        Box::new(Schema::string().min_len(1)),
        Box::new(Schema::array(Schema::number())),
        Box::new(
            Schema::object()
                .field("k", Schema::string())
                .field("v", Schema::array(Schema::number())),
        ),
        Box::new(
            Schema::union()
                .variant(Schema::string())
                .variant(Schema::array(Schema::boolean())),
        ),
    ];
    let values = vec![
        json!("a"),
        json!(""),
        json!([1, 2]),
        json!([true]),
        json!({"k": "x", "v": [1]}),
        json!({"k": "x", "v": [true]}),
        json!(null),
    ];

    for schema in &schemas {
        let batch = schema.validate_batch(&values);
        let singles: Vec<bool> = values.iter().map(|v| schema.matches(v)).collect();
        assert_eq!(batch, singles);
    }
}

#[test]
fn test_empty_batch() {
    let schema = Schema::number();
    assert!(schema.validate_batch(&[]).is_empty());
}
