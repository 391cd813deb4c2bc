//! The sampling dispatcher.
//!
//! The in-process engine is cheaper when most inputs are valid (verdict
//! scans short-circuit late, no boundary crossing); the external engine is
//! cheaper when a high fraction is invalid. The dispatcher measures a
//! prefix of each batch and routes the whole call accordingly. Engines are
//! never mixed within one call, since crossing the external boundary per
//! element would dominate cost at small granularities.

use std::sync::Arc;

use serde_json::Value;

use crate::error::ParseError;
use crate::schema::{SchemaLike, ValidationResult};

use super::{BatchEngine, EngineError};

/// Dispatch configuration.
///
/// `threshold` is the invalid-rate above which a batch routes to the
/// external engine; `sample_size` is how many leading elements are measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridConfig {
    /// Invalid-rate routing threshold, in `[0, 1]`.
    pub threshold: f64,
    /// Number of leading elements sampled per batch call.
    pub sample_size: usize,
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            sample_size: 200,
        }
    }
}

/// A validator wrapping two complete, interchangeable batch engines.
///
/// `validate` and `safe_parse` always run in-process; no sampling overhead
/// is justified for a single value. `validate_batch` samples the leading
/// elements, then routes the entire batch to exactly one engine.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use triage::{BatchEngine, EngineError, HybridConfig, HybridValidator, Schema};
/// use serde_json::{json, Value};
///
/// struct AcceptAll;
///
/// impl BatchEngine for AcceptAll {
///     fn validate_batch(&self, values: &[Value]) -> Result<Vec<bool>, EngineError> {
///         Ok(vec![true; values.len()])
///     }
/// }
///
/// let validator = HybridValidator::with_config(
///     Schema::number(),
///     Arc::new(AcceptAll),
///     HybridConfig { threshold: 0.5, sample_size: 4 },
/// );
///
/// // Sampled invalid rate 0.25 ≤ 0.5: the in-process engine decides.
/// let verdicts = validator
///     .validate_batch(&[json!(1), json!(2), json!("x"), json!(3)])
///     .unwrap();
/// assert_eq!(verdicts, vec![true, true, false, true]);
/// ```
pub struct HybridValidator<S> {
    schema: S,
    external: Arc<dyn BatchEngine>,
    config: HybridConfig,
}

impl<S: SchemaLike> HybridValidator<S> {
    /// Wraps `schema` and `external` with the default configuration
    /// (threshold 0.3, sample size 200).
    pub fn new(schema: S, external: Arc<dyn BatchEngine>) -> Self {
        Self::with_config(schema, external, HybridConfig::default())
    }

    /// Wraps `schema` and `external` with an explicit configuration.
    ///
    /// The threshold is clamped into `[0, 1]`.
    pub fn with_config(schema: S, external: Arc<dyn BatchEngine>, config: HybridConfig) -> Self {
        Self {
            schema,
            external,
            config: HybridConfig {
                threshold: config.threshold.clamp(0.0, 1.0),
                sample_size: config.sample_size,
            },
        }
    }

    /// The active configuration.
    pub fn config(&self) -> HybridConfig {
        self.config
    }

    /// The wrapped in-process schema.
    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Fail-fast single-value validation, always in-process.
    pub fn validate(&self, value: &Value) -> Result<Value, ParseError> {
        self.schema.validate(value)
    }

    /// Accumulating single-value validation, always in-process.
    pub fn safe_parse(&self, value: &Value) -> ValidationResult<Value> {
        self.schema.safe_parse(value)
    }

    /// Validates the batch with whichever engine the sample selects.
    ///
    /// The first `min(sample_size, len)` elements are checked in-process;
    /// if the observed invalid rate strictly exceeds the threshold the
    /// entire batch goes to the external engine, otherwise the entire batch
    /// runs in-process. An empty batch observes rate 0 and returns empty
    /// verdicts without touching either engine.
    ///
    /// # Errors
    ///
    /// Propagates [`EngineError`] from the external backend, including a
    /// reply whose length does not match the input.
    pub fn validate_batch(&self, values: &[Value]) -> Result<Vec<bool>, EngineError> {
        let sample = self.config.sample_size.min(values.len());
        if sample == 0 {
            return Ok(Vec::new());
        }

        let invalid = values[..sample]
            .iter()
            .filter(|value| !self.schema.matches(value))
            .count();
        let observed_invalid_rate = invalid as f64 / sample as f64;

        if observed_invalid_rate > self.config.threshold {
            let flags = self.external.validate_batch(values)?;
            if flags.len() != values.len() {
                return Err(EngineError::new(format!(
                    "engine returned {} flags for {} values",
                    flags.len(),
                    values.len()
                )));
            }
            Ok(flags)
        } else {
            Ok(self.schema.validate_batch(values))
        }
    }
}
