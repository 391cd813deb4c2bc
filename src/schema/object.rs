//! Object schema and its field classification.
//!
//! [`ObjectSchema`] analyzes its shape at build time: fields are
//! partitioned into primitive-typed and complex-typed groups, and the batch
//! path for mixed shapes checks every primitive field before evaluating any
//! complex one. Malformed inputs usually fail on a cheap field, so the
//! expensive nested work never runs for them.

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, ValidationResult};
use super::value_type_name;

/// One declared field: its schema and whether it must be present.
struct FieldDef {
    schema: Box<dyn SchemaLike>,
    required: bool,
}

/// Build-time partition of an object's fields.
///
/// Indices point into the declared field map. Primitives are ordered first;
/// the asymmetric batch path walks the two groups in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct FieldAnalysis {
    primitive: Vec<usize>,
    complex: Vec<usize>,
}

impl FieldAnalysis {
    /// True when the shape mixes both groups, enabling the asymmetric path.
    fn is_mixed(&self) -> bool {
        !self.primitive.is_empty() && !self.complex.is_empty()
    }
}

/// A schema accepting JSON objects with declared fields.
///
/// The validated output of a successful parse contains exactly the declared
/// keys; undeclared input keys are never copied through. With
/// [`strict`](ObjectSchema::strict), undeclared keys are rejected instead
/// of ignored.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string().min_len(1))
///     .field("age", Schema::number())
///     .optional("email", Schema::string());
///
/// assert!(schema.validate(&json!({"name": "Ann", "age": 30})).is_ok());
///
/// // Missing required field
/// assert!(schema.validate(&json!({"name": "Ann"})).is_err());
///
/// // safe_parse reports every failing field at once
/// let err = schema
///     .safe_parse(&json!({"name": 42, "age": "NaN"}))
///     .into_result()
///     .unwrap_err();
/// assert_eq!(err.len(), 2);
/// ```
pub struct ObjectSchema {
    fields: IndexMap<String, FieldDef>,
    strict: bool,
    type_message: Option<String>,
    analysis: FieldAnalysis,
}

impl ObjectSchema {
    /// Creates an object schema with no declared fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            strict: false,
            type_message: None,
            analysis: FieldAnalysis::default(),
        }
    }

    /// Declares a required field.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: true,
            },
        );
        self.reanalyze();
        self
    }

    /// Declares an optional field; if present, its value must validate.
    pub fn optional<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                schema: Box::new(schema),
                required: false,
            },
        );
        self.reanalyze();
        self
    }

    /// Rejects undeclared keys instead of ignoring them.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Sets a custom type error message (used when the value is not an
    /// object).
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Recomputes the field partition. Runs on every builder mutation so
    /// the finished schema always carries current classification.
    fn reanalyze(&mut self) {
        let mut analysis = FieldAnalysis::default();
        for (index, def) in self.fields.values().enumerate() {
            if def.schema.kind().is_primitive() {
                analysis.primitive.push(index);
            } else {
                analysis.complex.push(index);
            }
        }
        self.analysis = analysis;
    }

    fn type_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        let message = self
            .type_message
            .clone()
            .unwrap_or_else(|| format!("expected object, got {}", value_type_name(value)));
        Issue::new(IssueCode::TypeMismatch, path.clone(), message)
    }

    fn has_unknown_keys(&self, obj: &Map<String, Value>) -> bool {
        obj.keys().any(|key| !self.fields.contains_key(key))
    }

    fn field_ok(&self, obj: &Map<String, Value>, index: usize) -> bool {
        match self.fields.get_index(index) {
            Some((name, def)) => match obj.get(name) {
                Some(value) => def.schema.matches(value),
                None => !def.required,
            },
            None => false,
        }
    }

    /// Declared-order verdict: the standard path.
    fn matches_declared(&self, value: &Value) -> bool {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return false,
        };
        if self.strict && self.has_unknown_keys(obj) {
            return false;
        }
        self.fields.iter().all(|(name, def)| match obj.get(name) {
            Some(value) => def.schema.matches(value),
            None => !def.required,
        })
    }

    /// Primitives-first verdict: the asymmetric path.
    ///
    /// Complex fields run only once every primitive field has passed. Must
    /// agree with [`matches_declared`](Self::matches_declared) on every
    /// input; only the evaluation order differs.
    fn matches_primitives_first(&self, value: &Value) -> bool {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return false,
        };
        if self.strict && self.has_unknown_keys(obj) {
            return false;
        }
        self.analysis
            .primitive
            .iter()
            .all(|&index| self.field_ok(obj, index))
            && self
                .analysis
                .complex
                .iter()
                .all(|&index| self.field_ok(obj, index))
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for ObjectSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Object
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        let obj = value
            .as_object()
            .ok_or_else(|| self.type_issue(value, path))?;

        let mut out = Map::new();
        for (name, def) in &self.fields {
            let field_path = path.child(name);
            match obj.get(name) {
                Some(field_value) => {
                    out.insert(name.clone(), def.schema.validate_at(field_value, &field_path)?);
                }
                None if def.required => {
                    return Err(Issue::new(
                        IssueCode::MissingField,
                        field_path,
                        format!("required field '{}' is missing", name),
                    ));
                }
                None => {}
            }
        }

        if self.strict {
            for key in obj.keys() {
                if !self.fields.contains_key(key) {
                    return Err(Issue::new(
                        IssueCode::UnknownField,
                        path.child(key),
                        format!("unknown field '{}'", key),
                    ));
                }
            }
        }

        Ok(Value::Object(out))
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => return Validation::Failure(ParseError::single(self.type_issue(value, path))),
        };

        let mut issues = Vec::new();
        let mut out = Map::new();

        for (name, def) in &self.fields {
            let field_path = path.child(name);
            match obj.get(name) {
                Some(field_value) => match def.schema.check_at(field_value, &field_path) {
                    Validation::Success(v) => {
                        out.insert(name.clone(), v);
                    }
                    Validation::Failure(e) => issues.extend(e.into_iter()),
                },
                None if def.required => {
                    issues.push(Issue::new(
                        IssueCode::MissingField,
                        field_path,
                        format!("required field '{}' is missing", name),
                    ));
                }
                None => {}
            }
        }

        if self.strict {
            for key in obj.keys() {
                if !self.fields.contains_key(key) {
                    issues.push(Issue::new(
                        IssueCode::UnknownField,
                        path.child(key),
                        format!("unknown field '{}'", key),
                    ));
                }
            }
        }

        if issues.is_empty() {
            Validation::Success(Value::Object(out))
        } else {
            Validation::Failure(ParseError::from_vec(issues))
        }
    }

    fn matches(&self, value: &Value) -> bool {
        self.matches_declared(value)
    }

    fn validate_batch(&self, values: &[Value]) -> Vec<bool> {
        // Path selection happens once per call, off the build-time analysis.
        if self.analysis.is_mixed() {
            values
                .iter()
                .map(|v| self.matches_primitives_first(v))
                .collect()
        } else {
            values.iter().map(|v| self.matches_declared(v)).collect()
        }
    }
}

impl ToJsonSchema for ObjectSchema {
    fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, def) in &self.fields {
            properties.insert(name.clone(), def.schema.to_json_schema());
            if def.required {
                required.push(json!(name));
            }
        }

        let mut doc = Map::new();
        doc.insert("type".to_string(), json!("object"));
        doc.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            doc.insert("required".to_string(), Value::Array(required));
        }
        if self.strict {
            doc.insert("additionalProperties".to_string(), json!(false));
        }
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{NumberSchema, Schema, StringSchema};

    #[test]
    fn test_empty_object_schema() {
        let schema = ObjectSchema::new();
        assert!(schema.is_empty());
        assert!(schema.validate(&json!({})).is_ok());
    }

    #[test]
    fn test_rejects_non_objects() {
        let schema = ObjectSchema::new();
        for value in [json!("x"), json!(1), json!(null), json!([1, 2])] {
            let err = schema.validate(&value).unwrap_err();
            assert_eq!(err.first().code, IssueCode::TypeMismatch);
        }
    }

    #[test]
    fn test_required_field_missing() {
        let schema = ObjectSchema::new().field("name", StringSchema::new());
        let err = schema.validate(&json!({})).unwrap_err();
        assert_eq!(err.first().code, IssueCode::MissingField);
        assert_eq!(err.first().path.to_string(), "name");
    }

    #[test]
    fn test_optional_field() {
        let schema = ObjectSchema::new().optional("nickname", StringSchema::new());
        assert!(schema.validate(&json!({})).is_ok());
        assert!(schema.validate(&json!({"nickname": "Bo"})).is_ok());
        assert!(schema.validate(&json!({"nickname": 7})).is_err());
    }

    #[test]
    fn test_output_has_exactly_declared_keys() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .field("age", NumberSchema::new());
        let out = schema
            .validate(&json!({"name": "Ann", "age": 30, "extra": true}))
            .unwrap();
        assert_eq!(out, json!({"name": "Ann", "age": 30}));
    }

    #[test]
    fn test_strict_rejects_unknown_keys() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new())
            .strict();
        let err = schema
            .validate(&json!({"name": "Ann", "extra": true}))
            .unwrap_err();
        assert_eq!(err.first().code, IssueCode::UnknownField);
        assert!(!schema.matches(&json!({"name": "Ann", "extra": true})));
    }

    #[test]
    fn test_check_accumulates_across_fields() {
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new().min_len(5))
            .field("age", NumberSchema::new().positive());
        let err = schema
            .safe_parse(&json!({"name": "AB", "age": -5}))
            .into_result()
            .unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(err.with_code(IssueCode::ConstraintViolation).len(), 2);
    }

    #[test]
    fn test_issue_order_follows_declaration_order() {
        let schema = ObjectSchema::new()
            .field("z", StringSchema::new())
            .field("a", StringSchema::new())
            .field("m", StringSchema::new());
        let err = schema.safe_parse(&json!({})).into_result().unwrap_err();
        let paths: Vec<_> = err.iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_nested_paths() {
        let address = ObjectSchema::new().field("city", StringSchema::new().min_len(1));
        let schema = ObjectSchema::new().field("address", address);
        let err = schema
            .safe_parse(&json!({"address": {"city": ""}}))
            .into_result()
            .unwrap_err();
        assert_eq!(err.first().path.to_string(), "address.city");
    }

    #[test]
    fn test_analysis_partitions_fields() {
        let schema = ObjectSchema::new()
            .field("id", StringSchema::new())
            .field("tags", Schema::array(StringSchema::new()))
            .field("count", NumberSchema::new());
        assert_eq!(schema.analysis.primitive, vec![0, 2]);
        assert_eq!(schema.analysis.complex, vec![1]);
        assert!(schema.analysis.is_mixed());
    }

    #[test]
    fn test_all_primitive_shape_is_not_mixed() {
        let schema = ObjectSchema::new()
            .field("a", StringSchema::new())
            .field("b", NumberSchema::new());
        assert!(!schema.analysis.is_mixed());
    }

    #[test]
    fn test_paths_agree_on_every_verdict() {
        let schema = ObjectSchema::new()
            .field("id", StringSchema::new())
            .field("tags", Schema::array(StringSchema::new()));
        let inputs = vec![
            json!({"id": "a", "tags": ["x"]}),
            json!({"id": 1, "tags": ["x"]}),
            json!({"id": "a", "tags": [1]}),
            json!({"id": "a"}),
            json!({"tags": ["x"]}),
            json!("not an object"),
            json!(null),
        ];
        for input in &inputs {
            assert_eq!(
                schema.matches_declared(input),
                schema.matches_primitives_first(input),
                "paths disagree on {}",
                input
            );
        }
        let batch = schema.validate_batch(&inputs);
        let singles: Vec<bool> = inputs.iter().map(|v| schema.matches(v)).collect();
        assert_eq!(batch, singles);
    }

    #[test]
    fn test_constrained_leaf_is_still_primitive_for_analysis() {
        // The partition is by kind tag; constraints don't move a string
        // field into the complex group.
        let schema = ObjectSchema::new()
            .field("name", StringSchema::new().min_len(1))
            .field("tags", Schema::array(StringSchema::new()));
        assert!(schema.analysis.is_mixed());
        assert!(!schema.matches(&json!({"name": "", "tags": []})));
    }
}
