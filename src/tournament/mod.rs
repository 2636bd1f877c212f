//! Tournament orchestration: build, list, delete, and export multi-stage
//! racing tournaments.
//!
//! A tournament is a chain of stage classes in the store, linked to its name
//! purely through class attributes. [`TournamentManager`] builds the chain
//! against the store, generator, and export ports and owns the cross-stage
//! wiring the individual stages cannot see, such as the placement promotion
//! rewrite.

pub mod errors;
pub mod manager;
pub mod models;

pub use errors::{TournamentError, TournamentResult};
pub use manager::TournamentManager;
pub use models::{
    ATTR_BRACKET, ATTR_CREATED_AT, ATTR_EXPORTED_AT, ATTR_SETTINGS, ATTR_STAGE, ATTR_TOURNAMENT,
    BracketKind, BuiltTournament, StageSummary, StageType, TournamentSettings, TournamentSummary,
};
