//! Interoperability with other schema formats.
//!
//! Exports here are best-effort derived projections; validation never
//! depends on them.

pub mod json_schema;

pub use json_schema::ToJsonSchema;
