//! Schema construction and the per-variant compilers.
//!
//! Schemas are built once by application startup code and reused across
//! arbitrarily many validation calls. Every classification decision (field
//! partitioning, union bucketing, primitive-element detection) happens
//! inside the builders; the per-call paths only read the results.

mod array;
mod boolean;
mod number;
mod object;
mod string;
mod traits;
mod union;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use number::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;
pub use traits::{SchemaKind, SchemaLike, TypeProfile, ValidationResult};
pub use union::UnionSchema;

use serde_json::Value;

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use triage::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("id", Schema::string().min_len(1))
///     .field("tags", Schema::array(Schema::string()))
///     .optional("score", Schema::number().min(0.0));
///
/// assert!(schema.validate(&json!({"id": "u1", "tags": ["a"]})).is_ok());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a string schema.
    ///
    /// Bare, it is a pure type predicate; builder methods add length and
    /// pattern constraints.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a number schema accepting any JSON number.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates an object schema with no declared fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates an array schema over `element`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use triage::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array(Schema::number());
    /// assert!(schema.validate(&json!([1, 2, 3])).is_ok());
    /// assert!(schema.validate(&json!([1, "2"])).is_err());
    /// ```
    pub fn array<S: SchemaLike>(element: S) -> ArraySchema<S> {
        ArraySchema::new(element)
    }

    /// Creates a union schema with no members; add them with
    /// [`variant`](UnionSchema::variant).
    ///
    /// # Example
    ///
    /// ```rust
    /// use triage::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::union()
    ///     .variant(Schema::string())
    ///     .variant(Schema::number());
    ///
    /// assert!(schema.validate(&json!("a")).is_ok());
    /// assert!(schema.validate(&json!(true)).is_err());
    /// ```
    pub fn union() -> UnionSchema {
        UnionSchema::new()
    }
}

/// The JSON type name of a value, for error messages.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
