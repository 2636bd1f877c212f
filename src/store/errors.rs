//! Store port error types.

use thiserror::Error;

use super::models::{ClassId, HeatId};

/// Errors raised by the tournament store port
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Class not found
    #[error("Class not found: {0}")]
    ClassNotFound(ClassId),

    /// Heat not found
    #[error("Heat not found: {0}")]
    HeatNotFound(HeatId),

    /// Slot index outside the heat's slot range
    #[error("Slot {index} out of range for heat {heat}")]
    SlotOutOfRange { heat: HeatId, index: usize },

    /// Backend-specific failure
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
