//! Boolean schema: a pure type predicate.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, ValidationResult};
use super::value_type_name;

/// A schema accepting JSON booleans.
#[derive(Clone, Default)]
pub struct BooleanSchema {
    type_message: Option<String>,
}

impl BooleanSchema {
    /// Creates a boolean schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom type error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    fn type_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        let message = self
            .type_message
            .clone()
            .unwrap_or_else(|| format!("expected boolean, got {}", value_type_name(value)));
        Issue::new(IssueCode::TypeMismatch, path.clone(), message)
    }
}

impl SchemaLike for BooleanSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Boolean
    }

    fn primitive_kind(&self) -> Option<SchemaKind> {
        Some(SchemaKind::Boolean)
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        if value.is_boolean() {
            Ok(value.clone())
        } else {
            Err(self.type_issue(value, path))
        }
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        if value.is_boolean() {
            Validation::Success(value.clone())
        } else {
            Validation::Failure(ParseError::single(self.type_issue(value, path)))
        }
    }

    fn matches(&self, value: &Value) -> bool {
        value.is_boolean()
    }
}

impl ToJsonSchema for BooleanSchema {
    fn to_json_schema(&self) -> Value {
        json!({"type": "boolean"})
    }
}
