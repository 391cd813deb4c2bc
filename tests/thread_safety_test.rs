//! Concurrent use of shared schemas, validators, and the registry.

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use triage::{
    BatchEngine, EngineError, HybridConfig, HybridValidator, Schema, SchemaLike, SchemaRegistry,
};

#[test]
fn test_schema_shared_across_threads() {
    let schema: Arc<dyn SchemaLike> = Arc::new(
        Schema::object()
            .field("id", Schema::string())
            .field("tags", Schema::array(Schema::string())),
    );

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let values: Vec<Value> = (0..500)
                    .map(|i| {
                        if (i + t) % 2 == 0 {
                            json!({"id": format!("{}:{}", t, i), "tags": []})
                        } else {
                            json!({"id": i, "tags": []})
                        }
                    })
                    .collect();
                schema.validate_batch(&values).iter().filter(|&&ok| ok).count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 250);
    }
}

struct RejectAll;

impl BatchEngine for RejectAll {
    fn validate_batch(&self, values: &[Value]) -> Result<Vec<bool>, EngineError> {
        Ok(vec![false; values.len()])
    }
}

#[test]
fn test_hybrid_validator_shared_across_threads() {
    let validator = Arc::new(HybridValidator::with_config(
        Schema::number(),
        Arc::new(RejectAll),
        HybridConfig {
            threshold: 0.5,
            sample_size: 10,
        },
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let values: Vec<Value> = (0..100).map(|i| json!(i)).collect();
                validator.validate_batch(&values).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), vec![true; 100]);
    }
}

#[test]
fn test_registry_concurrent_reads_and_writes() {
    let registry = SchemaRegistry::new();
    registry.register("Base", Schema::string()).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let registry = registry.clone();
            thread::spawn(move || {
                registry
                    .register(format!("Schema{}", t), Schema::number())
                    .unwrap();
                for _ in 0..100 {
                    assert!(registry
                        .validate("Base", &json!("hello"))
                        .unwrap()
                        .is_success());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(registry.names().len(), 9);
}
