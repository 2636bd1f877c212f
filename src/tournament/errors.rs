//! Tournament orchestration error types.

use thiserror::Error;

use crate::bracket::BracketError;
use crate::export::ExportError;
use crate::generator::GeneratorError;
use crate::plan::PlanError;
use crate::store::StoreError;

use super::models::StageType;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// A settings field is out of range, caught before any mutation
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The tournament name is already in use
    #[error("A tournament named \"{0}\" already exists")]
    DuplicateTournament(String),

    /// No classes are tagged with the given tournament name
    #[error("Tournament not found: {0}")]
    TournamentNotFound(String),

    /// A stage the operation needs was never built
    #[error("Tournament \"{name}\" has no {stage} stage")]
    MissingStage { name: String, stage: StageType },

    /// Plan construction or resolution failure
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Bracket construction failure
    #[error(transparent)]
    Bracket(#[from] BracketError),

    /// Store port failure, propagated
    #[error("Store port failure: {0}")]
    Store(#[from] StoreError),

    /// Generator port failure, propagated
    #[error("Generator port failure: {0}")]
    Generator(#[from] GeneratorError),

    /// Export port failure, propagated
    #[error("Export port failure: {0}")]
    Export(#[from] ExportError),

    /// Settings serialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
