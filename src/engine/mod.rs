//! Batch engines and the adaptive dispatcher.
//!
//! Two interchangeable engines exist for any compiled schema: the
//! in-process one ([`SchemaLike::validate_batch`](crate::SchemaLike::validate_batch))
//! and an external natively-compiled backend reachable only through its
//! batch entry point, modeled here as [`BatchEngine`]. The
//! [`HybridValidator`] samples each batch and routes the whole call to
//! whichever engine is empirically cheaper.

mod hybrid;

pub use hybrid::{HybridConfig, HybridValidator};

use serde_json::Value;

use crate::error::{Issue, IssueCode};
use crate::path::FieldPath;

/// The external validation backend's contract.
///
/// One synchronous batch entry point: an array of candidate values in, a
/// same-length array of success flags out. Construction of the backend
/// itself (native compilation, memory layout) is a one-time step outside
/// this crate; any arena it owns must be held exclusively per call, never
/// shared mutably across concurrent calls.
pub trait BatchEngine: Send + Sync {
    /// Validates every value, returning one flag per input.
    ///
    /// A failure of the backend itself (not of the values) is an
    /// [`EngineError`], which callers propagate rather than swallow.
    fn validate_batch(&self, values: &[Value]) -> Result<Vec<bool>, EngineError>;
}

/// A failure of the external backend call itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("external engine failure: {message}")]
pub struct EngineError {
    /// Backend-supplied description of the failure.
    pub message: String,
}

impl EngineError {
    /// Creates an engine error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Backend failures surface as root-level issues when callers need them in
/// the structured error model.
impl From<EngineError> for Issue {
    fn from(err: EngineError) -> Self {
        Issue::new(
            IssueCode::ExternalEngineFailure,
            FieldPath::root(),
            err.to_string(),
        )
    }
}
