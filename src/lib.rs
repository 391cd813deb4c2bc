//! # Triage
//!
//! Declarative schema validation built for throughput: schemas classify
//! themselves once at construction, and every per-call path (single
//! values, large batches, unions) only reads the precomputed results.
//!
//! ## Overview
//!
//! Three operations exist on every schema:
//!
//! - [`validate`](SchemaLike::validate) fails fast with the first issue.
//! - [`safe_parse`](SchemaLike::safe_parse) accumulates every discoverable
//!   issue into a structured [`ParseError`] with flattened and formatted
//!   views.
//! - [`validate_batch`](SchemaLike::validate_batch) returns one boolean
//!   verdict per input, trading diagnostics for throughput.
//!
//! Object schemas partition their fields into primitive and complex groups
//! at build time and check the cheap group first on mixed shapes. Arrays
//! over bare primitive elements reduce to a single membership scan. Unions
//! precompile their members into runtime-type buckets so dispatch never
//! tries every candidate.
//!
//! A [`HybridValidator`] wraps the in-process engine together with an
//! external natively-compiled backend (any [`BatchEngine`]) and routes each
//! whole batch to whichever engine the sampled invalid rate favors.
//!
//! ## Example
//!
//! ```rust
//! use triage::{Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("name", Schema::string().min_len(1))
//!     .field("age", Schema::number());
//!
//! // Single value, fail-fast
//! let valid = schema.validate(&json!({"name": "Ann", "age": 30}));
//! assert_eq!(valid.unwrap(), json!({"name": "Ann", "age": 30}));
//!
//! // Full diagnostics
//! let err = schema
//!     .safe_parse(&json!({"name": 42, "age": "NaN"}))
//!     .into_result()
//!     .unwrap_err();
//! assert_eq!(err.len(), 2);
//!
//! // Batch verdicts
//! let verdicts = schema.validate_batch(&[
//!     json!({"name": "Ann", "age": 30}),
//!     json!({"name": "", "age": 30}),
//! ]);
//! assert_eq!(verdicts, vec![true, false]);
//! ```

pub mod engine;
pub mod error;
pub mod interop;
pub mod path;
pub mod registry;
pub mod schema;

pub use engine::{BatchEngine, EngineError, HybridConfig, HybridValidator};
pub use error::{FlattenedError, FormattedError, Issue, IssueCode, ParseError};
pub use interop::ToJsonSchema;
pub use path::{FieldPath, Segment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    ArraySchema, BooleanSchema, NumberSchema, ObjectSchema, Schema, SchemaKind, SchemaLike,
    StringSchema, TypeProfile, UnionSchema, ValidationResult,
};
