//! Feature schema, fitted transforms and the linear classifier.
//!
//! Everything here is pure computation over immutable parameters; loading the
//! parameters is the registry's job.

use thiserror::Error;

pub mod features;
pub mod logreg;
pub mod metrics;
pub mod scaler;

/// Failures inside the numeric path after input validation succeeded.
///
/// These indicate a configuration defect (parameters that do not match the
/// schema) or numerically degenerate input, never a caller mistake.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("{what} parameters have {found} features (expected {expected})")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Decision score is undefined ({0})")]
    UndefinedScore(f64),
}
