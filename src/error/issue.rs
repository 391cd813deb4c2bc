//! Single validation failures.

use std::fmt::{self, Display};

use crate::path::FieldPath;

/// Machine-readable classification of a validation failure.
///
/// The set is closed: every failure the engine can produce maps to exactly
/// one of these codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IssueCode {
    /// The value's runtime type does not match the schema.
    TypeMismatch,
    /// A required object field is absent.
    MissingField,
    /// An array element failed its element schema.
    ElementInvalid,
    /// No union member accepted the value.
    NoMatchingVariant,
    /// The value has the right type but violates a constraint
    /// (length, range, pattern).
    ConstraintViolation,
    /// A strict object received an undeclared field.
    UnknownField,
    /// The external validation backend itself failed.
    ExternalEngineFailure,
}

impl IssueCode {
    /// Stable snake_case identifier for logs and API payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::TypeMismatch => "type_mismatch",
            IssueCode::MissingField => "missing_field",
            IssueCode::ElementInvalid => "element_invalid",
            IssueCode::NoMatchingVariant => "no_matching_variant",
            IssueCode::ConstraintViolation => "constraint_violation",
            IssueCode::UnknownField => "unknown_field",
            IssueCode::ExternalEngineFailure => "external_engine_failure",
        }
    }
}

impl Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured validation failure.
///
/// # Example
///
/// ```rust
/// use triage::{FieldPath, Issue, IssueCode};
///
/// let issue = Issue::new(
///     IssueCode::TypeMismatch,
///     FieldPath::root().child("age"),
///     "expected number, got string",
/// );
/// assert_eq!(issue.code, IssueCode::TypeMismatch);
/// assert_eq!(issue.path.to_string(), "age");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    /// Failure classification.
    pub code: IssueCode,
    /// Human-readable description.
    pub message: String,
    /// Where in the input the failure occurred.
    pub path: FieldPath,
}

impl Issue {
    /// Creates a new issue.
    pub fn new(code: IssueCode, path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path,
        }
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Issue {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Issue>();
    assert_sync::<Issue>();
};
