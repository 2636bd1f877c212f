//! Bracket-construction error types.

use thiserror::Error;

/// Errors raised while constructing a bracket topology
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketError {
    /// A qualifier list does not contain exactly the required distinct ranks
    #[error("Invalid seed list for {group}: expected {expected} distinct ranks, got {actual:?}")]
    InvalidSeedList {
        group: &'static str,
        expected: usize,
        actual: Vec<u32>,
    },

    /// Too few heat names were supplied for the topology
    #[error("Invalid heat names: expected at least {expected}, got {actual}")]
    InvalidHeatNames { expected: usize, actual: usize },
}

/// Result type for bracket operations
pub type BracketResult<T> = Result<T, BracketError>;
