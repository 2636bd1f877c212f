//! Heat-plan error types.

use thiserror::Error;

use super::models::SeedSource;

/// Errors raised during plan construction and seed resolution
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanError {
    /// Slot count does not match the declared heat size
    #[error("Malformed plan \"{plan}\": expected {expected} slots, got {actual}")]
    MalformedPlan {
        plan: String,
        expected: usize,
        actual: usize,
    },

    /// The referenced result has not been recorded yet.
    ///
    /// This is an expected transient condition while races are still being
    /// run; it only becomes a hard failure if a caller treats it as final.
    #[error("Unresolved seed source: {0}")]
    UnresolvedReference(SeedSource),
}

/// Result type for plan operations
pub type PlanResult<T> = Result<T, PlanError>;
