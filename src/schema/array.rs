//! Array schema.
//!
//! Construction captures whether the element schema is a bare primitive
//! predicate. When it is, whole-array verdicts reduce to a single
//! membership scan; otherwise the array delegates to the element schema's
//! own batch machinery, which carries its own precomputed fast paths.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, ValidationResult};
use super::value_type_name;

/// A length constraint applied to array values.
#[derive(Clone)]
enum ArrayRule {
    MinLen { min: usize, message: Option<String> },
    MaxLen { max: usize, message: Option<String> },
}

/// A schema accepting JSON arrays of one element type.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::array(Schema::string());
///
/// assert!(schema.validate(&json!(["a", "b"])).is_ok());
/// assert!(schema.validate(&json!(["a", 1])).is_err());
/// assert!(schema.validate(&json!("not an array")).is_err());
/// ```
pub struct ArraySchema<S> {
    element: S,
    element_primitive: Option<SchemaKind>,
    rules: Vec<ArrayRule>,
    type_message: Option<String>,
}

impl<S: SchemaLike> ArraySchema<S> {
    /// Creates an array schema over `element`.
    ///
    /// The recognized-primitive detection happens here, once: an element
    /// schema that is a bare type predicate arms the membership-scan fast
    /// path for every later batch call.
    pub fn new(element: S) -> Self {
        let element_primitive = element.primitive_kind();
        Self {
            element,
            element_primitive,
            rules: Vec::new(),
            type_message: None,
        }
    }

    /// Requires at least `min` elements.
    pub fn min_len(mut self, min: usize) -> Self {
        self.rules.push(ArrayRule::MinLen { min, message: None });
        self
    }

    /// Requires at most `max` elements.
    pub fn max_len(mut self, max: usize) -> Self {
        self.rules.push(ArrayRule::MaxLen { max, message: None });
        self
    }

    /// Requires at least one element.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints exist yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(ArrayRule::MinLen { message: m, .. })
            | Some(ArrayRule::MaxLen { message: m, .. }) => *m = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }

    fn type_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        let message = self
            .type_message
            .clone()
            .unwrap_or_else(|| format!("expected array, got {}", value_type_name(value)));
        Issue::new(IssueCode::TypeMismatch, path.clone(), message)
    }

    fn rule_violation(rule: &ArrayRule, len: usize, path: &FieldPath) -> Option<Issue> {
        let message = match rule {
            ArrayRule::MinLen { min, message } if len < *min => message
                .clone()
                .unwrap_or_else(|| format!("must have at least {} elements, got {}", min, len)),
            ArrayRule::MaxLen { max, message } if len > *max => message
                .clone()
                .unwrap_or_else(|| format!("must have at most {} elements, got {}", max, len)),
            _ => return None,
        };
        Some(Issue::new(
            IssueCode::ConstraintViolation,
            path.clone(),
            message,
        ))
    }

    fn rules_hold(&self, len: usize) -> bool {
        self.rules.iter().all(|rule| match rule {
            ArrayRule::MinLen { min, .. } => len >= *min,
            ArrayRule::MaxLen { max, .. } => len <= *max,
        })
    }
}

/// Direct predicate for a recognized primitive element type.
fn primitive_matches(kind: SchemaKind, value: &Value) -> bool {
    match kind {
        SchemaKind::String => value.is_string(),
        SchemaKind::Number => value.is_number(),
        SchemaKind::Boolean => value.is_boolean(),
        _ => false,
    }
}

fn primitive_name(kind: SchemaKind) -> &'static str {
    match kind {
        SchemaKind::String => "string",
        SchemaKind::Number => "number",
        SchemaKind::Boolean => "boolean",
        _ => "value",
    }
}

impl<S: SchemaLike> SchemaLike for ArraySchema<S> {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Array
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        let arr = value
            .as_array()
            .ok_or_else(|| self.type_issue(value, path))?;

        if let Some(issue) = self
            .rules
            .iter()
            .find_map(|rule| Self::rule_violation(rule, arr.len(), path))
        {
            return Err(issue);
        }

        match self.element_primitive {
            Some(kind) => {
                // Bare predicate: no nested diagnostics exist to forward.
                for (index, item) in arr.iter().enumerate() {
                    if !primitive_matches(kind, item) {
                        return Err(Issue::new(
                            IssueCode::ElementInvalid,
                            path.element(index),
                            format!(
                                "expected {}, got {}",
                                primitive_name(kind),
                                value_type_name(item)
                            ),
                        ));
                    }
                }
                Ok(value.clone())
            }
            None => {
                let mut out = Vec::with_capacity(arr.len());
                for (index, item) in arr.iter().enumerate() {
                    out.push(self.element.validate_at(item, &path.element(index))?);
                }
                Ok(Value::Array(out))
            }
        }
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let arr = match value.as_array() {
            Some(a) => a,
            None => return Validation::Failure(ParseError::single(self.type_issue(value, path))),
        };

        let mut issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| Self::rule_violation(rule, arr.len(), path))
            .collect();

        let out = match self.element_primitive {
            Some(kind) => {
                for (index, item) in arr.iter().enumerate() {
                    if !primitive_matches(kind, item) {
                        issues.push(Issue::new(
                            IssueCode::ElementInvalid,
                            path.element(index),
                            format!(
                                "expected {}, got {}",
                                primitive_name(kind),
                                value_type_name(item)
                            ),
                        ));
                    }
                }
                value.clone()
            }
            None => {
                let mut items = Vec::with_capacity(arr.len());
                for (index, item) in arr.iter().enumerate() {
                    match self.element.check_at(item, &path.element(index)) {
                        Validation::Success(v) => items.push(v),
                        Validation::Failure(e) => issues.extend(e.into_iter()),
                    }
                }
                Value::Array(items)
            }
        };

        if issues.is_empty() {
            Validation::Success(out)
        } else {
            Validation::Failure(ParseError::from_vec(issues))
        }
    }

    fn matches(&self, value: &Value) -> bool {
        let arr = match value.as_array() {
            Some(a) => a,
            None => return false,
        };
        if !self.rules_hold(arr.len()) {
            return false;
        }
        match self.element_primitive {
            // Single membership scan for recognized primitive elements.
            Some(kind) => arr.iter().all(|item| primitive_matches(kind, item)),
            // Otherwise the element schema's own batch path decides.
            None => self.element.validate_batch(arr).into_iter().all(|ok| ok),
        }
    }
}

impl<S: SchemaLike> ToJsonSchema for ArraySchema<S> {
    fn to_json_schema(&self) -> Value {
        let mut doc = serde_json::Map::new();
        doc.insert("type".to_string(), json!("array"));
        doc.insert("items".to_string(), self.element.to_json_schema());
        for rule in &self.rules {
            match rule {
                ArrayRule::MinLen { min, .. } => {
                    doc.insert("minItems".to_string(), json!(min));
                }
                ArrayRule::MaxLen { max, .. } => {
                    doc.insert("maxItems".to_string(), json!(max));
                }
            }
        }
        Value::Object(doc)
    }
}
