//! The schema trait and the compile-time classification tags.
//!
//! [`SchemaLike`] is the single contract every schema variant implements.
//! It is object-safe, so schemas compose freely: object fields, array
//! elements, and union members all store `dyn SchemaLike` (or a generic
//! bounded by it). The `Send + Sync` bounds let built schemas be shared
//! across threads without locking.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{Issue, ParseError};
use crate::interop::ToJsonSchema;
use crate::path::FieldPath;

/// Type alias for accumulating validation results.
pub type ValidationResult<T> = Validation<T, ParseError>;

/// The closed set of schema variants.
///
/// Every schema carries exactly one tag, attached at construction. All
/// classification decisions (union bucketing, field partitioning,
/// primitive-array detection) are direct lookups on this tag rather than
/// runtime probing of a schema's behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    /// Accepts JSON strings.
    String,
    /// Accepts JSON numbers.
    Number,
    /// Accepts JSON booleans.
    Boolean,
    /// Accepts JSON objects.
    Object,
    /// Accepts JSON arrays.
    Array,
    /// Accepts whatever its members accept.
    Union,
}

impl SchemaKind {
    /// True for the leaf tags (`String`, `Number`, `Boolean`).
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SchemaKind::String | SchemaKind::Number | SchemaKind::Boolean
        )
    }
}

/// The set of runtime types a schema can accept.
///
/// Union compilation buckets members by their profile. For every variant
/// except unions the profile is fully determined by the kind tag; a union's
/// profile is the merge of its members'.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypeProfile {
    /// Accepts string inputs.
    pub string: bool,
    /// Accepts numeric inputs.
    pub number: bool,
    /// Accepts boolean inputs.
    pub boolean: bool,
    /// Accepts array inputs.
    pub array: bool,
    /// Accepts object inputs.
    pub object: bool,
}

impl TypeProfile {
    /// The profile implied by a non-union kind tag.
    pub fn of_kind(kind: SchemaKind) -> Self {
        let mut profile = Self::default();
        match kind {
            SchemaKind::String => profile.string = true,
            SchemaKind::Number => profile.number = true,
            SchemaKind::Boolean => profile.boolean = true,
            SchemaKind::Array => profile.array = true,
            SchemaKind::Object => profile.object = true,
            // A bare union accepts nothing until members are added;
            // UnionSchema overrides type_profile with the member merge.
            SchemaKind::Union => {}
        }
        profile
    }

    /// The union of two profiles.
    pub fn merge(self, other: Self) -> Self {
        Self {
            string: self.string || other.string,
            number: self.number || other.number,
            boolean: self.boolean || other.boolean,
            array: self.array || other.array,
            object: self.object || other.object,
        }
    }
}

/// A compiled, immutable, reusable validation schema.
///
/// Three caller-facing operations exist on every schema:
///
/// - [`validate`](SchemaLike::validate): fail-fast; returns the validated
///   value or the first issue found.
/// - [`safe_parse`](SchemaLike::safe_parse): never panics; accumulates
///   every discoverable issue.
/// - [`validate_batch`](SchemaLike::validate_batch): one boolean verdict
///   per input, trading diagnostics for throughput.
///
/// The remaining methods are the building blocks composites use internally
/// and the tags the compilers classify by.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("name", Schema::string())
///     .field("age", Schema::number());
///
/// assert!(schema.validate(&json!({"name": "Ann", "age": 30})).is_ok());
/// assert!(schema.validate(&json!({"name": 42})).is_err());
///
/// let verdicts = schema.validate_batch(&[
///     json!({"name": "Ann", "age": 30}),
///     json!({"name": 42, "age": "NaN"}),
/// ]);
/// assert_eq!(verdicts, vec![true, false]);
/// ```
pub trait SchemaLike: Send + Sync + ToJsonSchema {
    /// The variant tag attached at construction.
    fn kind(&self) -> SchemaKind;

    /// The runtime types this schema accepts; used for union bucketing.
    fn type_profile(&self) -> TypeProfile {
        TypeProfile::of_kind(self.kind())
    }

    /// `Some(kind)` only for leaves that are bare type predicates.
    ///
    /// A constrained leaf (e.g. a string with a length rule) returns `None`,
    /// which keeps the primitive-array membership scan from skipping its
    /// constraints.
    fn primitive_kind(&self) -> Option<SchemaKind> {
        None
    }

    /// Fail-fast validation at a path; returns the first issue found.
    fn validate_at(&self, value: &Value, path: &FieldPath) -> Result<Value, Issue>;

    /// Accumulating validation at a path; gathers every discoverable issue.
    fn check_at(&self, value: &Value, path: &FieldPath) -> ValidationResult<Value>;

    /// Verdict-only check. The building block of every batch path.
    fn matches(&self, value: &Value) -> bool;

    /// Validates each value, returning one verdict per input.
    ///
    /// Never fails per element; composites override this with their
    /// precomputed fast paths. Callers wanting diagnostics for a failed
    /// slot re-run [`safe_parse`](SchemaLike::safe_parse) on it.
    fn validate_batch(&self, values: &[Value]) -> Vec<bool> {
        values.iter().map(|v| self.matches(v)).collect()
    }

    /// Fail-fast validation of a single value.
    ///
    /// Returns the validated value on success. On failure the error carries
    /// exactly one issue, the first one encountered.
    fn validate(&self, value: &Value) -> Result<Value, ParseError> {
        self.validate_at(value, &FieldPath::root())
            .map_err(ParseError::single)
    }

    /// Validation that reports every discoverable issue.
    ///
    /// Returns `Validation::Success` with the validated value, or
    /// `Validation::Failure` with all accumulated issues. Never panics.
    fn safe_parse(&self, value: &Value) -> ValidationResult<Value> {
        self.check_at(value, &FieldPath::root())
    }
}
