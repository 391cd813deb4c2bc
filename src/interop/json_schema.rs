//! JSON Schema projection.
//!
//! Every schema type exports a JSON Schema (draft 2020-12) rendition of
//! itself. The projection is best-effort: it captures types and the
//! constraints that have a standard encoding, and it is not consulted by
//! validation.

use serde_json::Value;

/// Conversion to a JSON Schema document.
///
/// A supertrait of [`crate::SchemaLike`], so any type-erased schema can be
/// exported; the registry relies on this for its `$defs` document.
pub trait ToJsonSchema {
    /// Renders this schema as a JSON Schema object.
    fn to_json_schema(&self) -> Value;
}
