//! String schema.
//!
//! [`StringSchema`] is a bare type predicate until constraints are added;
//! with constraints it still type-checks first, then applies every rule,
//! accumulating violations under `safe_parse`.

use regex::Regex;
use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{Issue, IssueCode, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

use super::traits::{SchemaKind, SchemaLike, ValidationResult};
use super::value_type_name;

/// A constraint applied to string values.
#[derive(Clone)]
enum StringRule {
    MinLen {
        min: usize,
        message: Option<String>,
    },
    MaxLen {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        source: String,
        message: Option<String>,
    },
}

/// A schema accepting JSON strings.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::string().min_len(3).max_len(20);
///
/// assert!(schema.validate(&json!("hello")).is_ok());
/// assert!(schema.validate(&json!("hi")).is_err());
/// assert!(schema.validate(&json!(42)).is_err());
/// ```
#[derive(Clone, Default)]
pub struct StringSchema {
    rules: Vec<StringRule>,
    type_message: Option<String>,
}

impl StringSchema {
    /// Creates a bare string schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least `min` characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.rules.push(StringRule::MinLen { min, message: None });
        self
    }

    /// Requires at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.rules.push(StringRule::MaxLen { max, message: None });
        self
    }

    /// Requires the string to match `pattern`.
    ///
    /// Fails at build time if the pattern is not a valid regex.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triage::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"^\d+$").unwrap();
    /// assert!(schema.validate(&json!("12345")).is_ok());
    /// assert!(schema.validate(&json!("abc")).is_err());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.rules.push(StringRule::Pattern {
            regex,
            source: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints exist yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.rules.last_mut() {
            Some(StringRule::MinLen { message: m, .. })
            | Some(StringRule::MaxLen { message: m, .. })
            | Some(StringRule::Pattern { message: m, .. }) => *m = Some(message.into()),
            None => self.type_message = Some(message.into()),
        }
        self
    }

    fn type_issue(&self, value: &Value, path: &FieldPath) -> Issue {
        let message = self
            .type_message
            .clone()
            .unwrap_or_else(|| format!("expected string, got {}", value_type_name(value)));
        Issue::new(IssueCode::TypeMismatch, path.clone(), message)
    }

    fn rule_holds(rule: &StringRule, s: &str) -> bool {
        match rule {
            StringRule::MinLen { min, .. } => s.chars().count() >= *min,
            StringRule::MaxLen { max, .. } => s.chars().count() <= *max,
            StringRule::Pattern { regex, .. } => regex.is_match(s),
        }
    }

    fn rule_violation(rule: &StringRule, s: &str, path: &FieldPath) -> Option<Issue> {
        if Self::rule_holds(rule, s) {
            return None;
        }
        let message = match rule {
            StringRule::MinLen { min, message } => message.clone().unwrap_or_else(|| {
                format!("length must be at least {}, got {}", min, s.chars().count())
            }),
            StringRule::MaxLen { max, message } => message.clone().unwrap_or_else(|| {
                format!("length must be at most {}, got {}", max, s.chars().count())
            }),
            StringRule::Pattern {
                source, message, ..
            } => message
                .clone()
                .unwrap_or_else(|| format!("must match pattern '{}'", source)),
        };
        Some(Issue::new(
            IssueCode::ConstraintViolation,
            path.clone(),
            message,
        ))
    }
}

impl SchemaLike for StringSchema {
    fn kind(&self) -> SchemaKind {
        SchemaKind::String
    }

    fn primitive_kind(&self) -> Option<SchemaKind> {
        self.rules.is_empty().then_some(SchemaKind::String)
    }

    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue> {
        let s = value.as_str().ok_or_else(|| self.type_issue(value, path))?;
        if let Some(issue) = self
            .rules
            .iter()
            .find_map(|rule| Self::rule_violation(rule, s, path))
        {
            return Err(issue);
        }
        Ok(value.clone())
    }

    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value> {
        let s = match value.as_str() {
            Some(s) => s,
            None => return Validation::Failure(ParseError::single(self.type_issue(value, path))),
        };
        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| Self::rule_violation(rule, s, path))
            .collect();
        if issues.is_empty() {
            Validation::Success(value.clone())
        } else {
            Validation::Failure(ParseError::from_vec(issues))
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match value.as_str() {
            Some(s) => self.rules.iter().all(|rule| Self::rule_holds(rule, s)),
            None => false,
        }
    }
}

impl ToJsonSchema for StringSchema {
    fn to_json_schema(&self) -> Value {
        let mut doc = serde_json::Map::new();
        doc.insert("type".to_string(), json!("string"));
        for rule in &self.rules {
            match rule {
                StringRule::MinLen { min, .. } => {
                    doc.insert("minLength".to_string(), json!(min));
                }
                StringRule::MaxLen { max, .. } => {
                    doc.insert("maxLength".to_string(), json!(max));
                }
                StringRule::Pattern { source, .. } => {
                    doc.insert("pattern".to_string(), json!(source));
                }
            }
        }
        Value::Object(doc)
    }
}
