//! Store port: the persistence contract the orchestrator consumes.
//!
//! Classes, heats, slots, options, attributes, and recorded results all live
//! behind [`TournamentStore`]. The crate ships [`MemoryStore`] for tests and
//! single-event deployments; durable backends implement the same trait.

pub mod errors;
pub mod memory;
pub mod models;
pub mod repository;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::{ClassId, ClassRecord, HeatId, HeatRecord, SlotRecord};
pub use repository::TournamentStore;
