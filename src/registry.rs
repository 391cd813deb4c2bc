//! Named schema storage.
//!
//! Applications typically compile their schemas once at startup; the
//! registry gives those compiled schemas stable names so boundary code can
//! validate by name without threading schema values around.

use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::interop::ToJsonSchema;
use crate::schema::{SchemaLike, ValidationResult};

type SchemaMap = Arc<RwLock<HashMap<String, Arc<dyn SchemaLike>>>>;

/// A thread-safe store of named, compiled schemas.
///
/// Reads (validation) run concurrently; registration serializes on a write
/// lock. Cloning the registry clones the handle, not the contents.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaRegistry};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
/// registry
///     .register("User", Schema::object()
///         .field("name", Schema::string().min_len(1))
///         .field("age", Schema::number()))
///     .unwrap();
///
/// let result = registry.validate("User", &json!({"name": "Ann", "age": 30})).unwrap();
/// assert!(result.is_success());
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a schema under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    pub fn register<S>(&self, name: impl Into<String>, schema: S) -> Result<(), RegistryError>
    where
        S: SchemaLike + 'static,
    {
        let name = name.into();
        let mut schemas = self.schemas.write();
        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn SchemaLike>> {
        self.schemas.read().get(name).cloned()
    }

    /// True if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates a value against the named schema, reporting every issue.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaNotFound`] if the name is unknown.
    pub fn validate(
        &self,
        name: &str,
        value: &Value,
    ) -> Result<ValidationResult<Value>, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;
        Ok(schema.safe_parse(value))
    }

    /// Batch-validates values against the named schema.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SchemaNotFound`] if the name is unknown.
    pub fn validate_batch(&self, name: &str, values: &[Value]) -> Result<Vec<bool>, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;
        Ok(schema.validate_batch(values))
    }

    /// Exports every registered schema as a JSON Schema document with
    /// `$defs`, following draft 2020-12. Best-effort projection; not part
    /// of the validation contract.
    pub fn to_json_schema(&self) -> Value {
        let schemas = self.schemas.read();
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();

        let mut defs = serde_json::Map::new();
        for name in names {
            if let Some(schema) = schemas.get(name) {
                defs.insert(name.clone(), schema.to_json_schema());
            }
        }

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$defs": defs
        })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A schema with this name is already registered.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// No schema with this name exists.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    #[test]
    fn test_register_and_get() {
        let registry = SchemaRegistry::new();
        registry.register("Email", Schema::string()).unwrap();
        assert!(registry.contains("Email"));
        assert!(registry.get("Email").is_some());
        assert!(registry.get("Unknown").is_none());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = SchemaRegistry::new();
        registry.register("Email", Schema::string()).unwrap();
        let err = registry.register("Email", Schema::string()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(_)));
    }

    #[test]
    fn test_validate_by_name() {
        let registry = SchemaRegistry::new();
        registry
            .register("User", Schema::object().field("name", Schema::string()))
            .unwrap();

        assert!(registry
            .validate("User", &json!({"name": "Ann"}))
            .unwrap()
            .is_success());
        assert!(registry
            .validate("User", &json!({"name": 1}))
            .unwrap()
            .is_failure());
        assert!(matches!(
            registry.validate("Nope", &json!({})),
            Err(RegistryError::SchemaNotFound(_))
        ));
    }

    #[test]
    fn test_validate_batch_by_name() {
        let registry = SchemaRegistry::new();
        registry.register("Id", Schema::string()).unwrap();
        let verdicts = registry
            .validate_batch("Id", &[json!("a"), json!(1)])
            .unwrap();
        assert_eq!(verdicts, vec![true, false]);
    }

    #[test]
    fn test_names_sorted() {
        let registry = SchemaRegistry::new();
        registry.register("b", Schema::string()).unwrap();
        registry.register("a", Schema::number()).unwrap();
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_clone_shares_contents() {
        let registry = SchemaRegistry::new();
        let clone = registry.clone();
        registry.register("X", Schema::boolean()).unwrap();
        assert!(clone.contains("X"));
    }

    #[test]
    fn test_export_includes_defs() {
        let registry = SchemaRegistry::new();
        registry.register("Id", Schema::string()).unwrap();
        let doc = registry.to_json_schema();
        assert_eq!(
            doc["$schema"],
            json!("https://json-schema.org/draft/2020-12/schema")
        );
        assert_eq!(doc["$defs"]["Id"]["type"], json!("string"));
    }
}
