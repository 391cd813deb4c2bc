//! Number schema.
//!
//! [`NumberSchema`] accepts any JSON number. Range and sign rules are
//! opt-in; the `.integer()` rule restricts to whole values.

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, ValidationResult};
use super::value_type_name;

/// A constraint applied to numeric values.
#[derive(Clone)]
enum NumberRule {
    Min { min: f64, message: Option<String> },
    Max { max: f64, message: Option<String> },
    Positive { message: Option<String> },
    Integer { message: Option<String> },
}

/// A schema accepting JSON numbers.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::number().min(0.0).max(100.0);
///
/// assert!(schema.validate(&json!(42)).is_ok());
/// assert!(schema.validate(&json!(1.5)).is_ok());
/// assert!(schema.validate(&json!(-3)).is_err());
/// assert!(schema.validate(&json!("42")).is_err());
/// ```
#[derive(Clone, Default)]
pub struct NumberSchema {
    rules: Vec<NumberRule>,
    type_message: Option<String>,
}

impl NumberSchema {
    /// Creates a bare number schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the number to be at least `min` (inclusive).
    pub fn min(mut self, min: f64) -> Self {
        self.rules.push(NumberRule::Min { min, message: None });
        self
    }

    /// Requires the number to be at most `max` (inclusive).
    pub fn max(mut self, max: f64) -> Self {
        self.rules.push(NumberRule::Max { max, message: None });
        self
    }

    /// Requires the number to be strictly greater than zero.
    pub fn positive(mut self) -> Self {
        self.rules.push(NumberRule::Positive { message: None });
        self
    }

    /// Requires the number to have no fractional part.
    pub fn integer(mut self) -> Self {
        self.rules.push(NumberRule::Integer { message: None });
        self
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints exist yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(NumberRule::Min { message: m, .. })
            | Some(NumberRule::Max { message: m, .. })
            | Some(NumberRule::Positive { message: m })
            | Some(NumberRule::Integer { message: m }) => *m = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }

    fn type_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        let message = self
            .type_message
            .clone()
            .unwrap_or_else(|| format!("expected number, got {}", value_type_name(value)));
        Issue::new(IssueCode::TypeMismatch, path.clone(), message)
    }

    fn rule_holds(rule: &NumberRule, n: f64) -> bool {
        match rule {
            NumberRule::Min { min, .. } => n >= *min,
            NumberRule::Max { max, .. } => n <= *max,
            NumberRule::Positive { .. } => n > 0.0,
            NumberRule::Integer { .. } => n.fract() == 0.0,
        }
    }

    fn rule_violation(rule: &NumberRule, n: f64, path: &FieldPath) -> Option<Issue> {
        if Self::rule_holds(rule, n) {
            return None;
        }
        let message = match rule {
            NumberRule::Min { min, message } => message
                .clone()
                .unwrap_or_else(|| format!("must be at least {}, got {}", min, n)),
            NumberRule::Max { max, message } => message
                .clone()
                .unwrap_or_else(|| format!("must be at most {}, got {}", max, n)),
            NumberRule::Positive { message } => message
                .clone()
                .unwrap_or_else(|| format!("must be positive, got {}", n)),
            NumberRule::Integer { message } => message
                .clone()
                .unwrap_or_else(|| format!("must be an integer, got {}", n)),
        };
        Some(Issue::new(
            IssueCode::ConstraintViolation,
            path.clone(),
            message,
        ))
    }
}

impl SchemaLike for NumberSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Number
    }

    fn primitive_kind(&self) -> Option<SchemaKind> {
        self.rules.is_empty().then_some(SchemaKind::Number)
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        let n = value.as_f64().ok_or_else(|| self.type_issue(value, path))?;
        if let Some(issue) = self
            .rules
            .iter()
            .find_map(|rule| Self::rule_violation(rule, n, path))
        {
            return Err(issue);
        }
        Ok(value.clone())
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let n = match value.as_f64() {
            Some(n) => n,
            None => return Validation::Failure(ParseError::single(self.type_issue(value, path))),
        };
        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| Self::rule_violation(rule, n, path))
            .collect();
        if issues.is_empty() {
            Validation::Success(value.clone())
        } else {
            Validation::Failure(ParseError::from_vec(issues))
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match value.as_f64() {
            Some(n) => self.rules.iter().all(|rule| Self::rule_holds(rule, n)),
            None => false,
        }
    }
}

impl ToJsonSchema for NumberSchema {
    fn to_json_schema(&self) -> Value {
        let mut doc = serde_json::Map::new();
        doc.insert("type".to_string(), json!("number"));
        for rule in &self.rules {
            match rule {
                NumberRule::Min { min, .. } => {
                    doc.insert("minimum".to_string(), json!(min));
                }
                NumberRule::Max { max, .. } => {
                    doc.insert("maximum".to_string(), json!(max));
                }
                NumberRule::Positive { .. } => {
                    doc.insert("exclusiveMinimum".to_string(), json!(0));
                }
                NumberRule::Integer { .. } => {
                    doc.insert("multipleOf".to_string(), json!(1));
                }
            }
        }
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_numbers() {
        let schema = NumberSchema::new();
        assert!(schema.matches(&json!(42)));
        assert!(schema.matches(&json!(-1.5)));
        assert!(schema.matches(&json!(0)));
    }

    #[test]
    fn test_rejects_non_numbers() {
        let schema = NumberSchema::new();
        for value in [json!("42"), json!(true), json!(null), json!([]), json!({})] {
            assert!(!schema.matches(&value));
            let err = schema.validate(&value).unwrap_err();
            assert_eq!(err.first().code, IssueCode::TypeMismatch);
        }
    }

    #[test]
    fn test_range_rules() {
        let schema = NumberSchema::new().min(0.0).max(100.0);
        assert!(schema.matches(&json!(0)));
        assert!(schema.matches(&json!(100)));
        assert!(!schema.matches(&json!(-1)));
        assert!(!schema.matches(&json!(101)));
    }

    #[test]
    fn test_positive_rule() {
        let schema = NumberSchema::new().positive();
        assert!(schema.matches(&json!(1)));
        assert!(!schema.matches(&json!(0)));
        assert!(!schema.matches(&json!(-5)));
    }

    #[test]
    fn test_integer_rule() {
        let schema = NumberSchema::new().integer();
        assert!(schema.matches(&json!(3)));
        assert!(schema.matches(&json!(3.0)));
        assert!(!schema.matches(&json!(3.5)));
    }

    #[test]
    fn test_safe_parse_accumulates_violations() {
        let schema = NumberSchema::new().min(10.0).integer();
        let err = schema.safe_parse(&json!(2.5)).into_result().unwrap_err();
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_custom_message() {
        let schema = NumberSchema::new().positive().error("age must be positive");
        let err = schema.validate(&json!(-3)).unwrap_err();
        assert_eq!(err.first().message, "age must be positive");
    }

    #[test]
    fn test_primitive_kind_only_when_unconstrained() {
        assert_eq!(
            NumberSchema::new().primitive_kind(),
            Some(SchemaKind::Number)
        );
        assert_eq!(NumberSchema::new().min(0.0).primitive_kind(), None);
    }
}
