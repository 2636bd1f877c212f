//! # Raceplan
//!
//! A heat-plan compiler for multi-stage racing tournaments.
//!
//! This library builds complete tournament plans, from free-practice heats
//! through ranked qualifying up to a double-elimination final, and keeps the
//! stages wired together with lazily resolved cross-heat references. Heats
//! are planned before any race is flown: each slot names where its occupant
//! will come from (a seeding rank, an earlier heat's finishing position, or
//! a class's overall ranking), and resolution happens against recorded
//! results as they arrive.
//!
//! ## Architecture
//!
//! The core is synchronous and store-backed. Persistence, the larger stage
//! generators, and results export are ports implemented by the host
//! environment; the crate supplies an in-memory store for tests and tools.
//!
//! ## Core Modules
//!
//! - [`plan`]: Seed sources, slots, heat plans, and lazy resolution
//! - [`bracket`]: The reference 8-competitor double-elimination topology
//! - [`store`]: The persistence port and the in-memory implementation
//! - [`generator`]: The port for external stage generators
//! - [`export`]: The port for the external results exporter
//! - [`tournament`]: The orchestrator tying the stages into tournaments
//!
//! ## Example
//!
//! ```
//! use raceplan::plan::{HeatPlan, SeedSource};
//!
//! // The final takes the top two of the winner and lower brackets
//! let heat = HeatPlan::new(
//!     "Race 6 - Final",
//!     vec![
//!         SeedSource::heat("Race 4 - Winner Bracket", 1),
//!         SeedSource::heat("Race 4 - Winner Bracket", 2),
//!         SeedSource::heat("Race 5 - Lower Bracket", 1),
//!         SeedSource::heat("Race 5 - Lower Bracket", 2),
//!     ],
//! );
//! assert_eq!(heat.slot_count(), 4);
//! ```

/// Heat plans, seed sources, and lazy reference resolution.
pub mod plan;
pub use plan::{HeatPlan, HeatRef, Pilot, PilotId, PlanError, SeedSource, Slot};

/// Bracket topologies computed by the core.
pub mod bracket;
pub use bracket::{BracketError, double_elim_8};

/// Persistence port and in-memory store.
pub mod store;
pub use store::{MemoryStore, StoreError, TournamentStore};

/// External stage generator port.
pub mod generator;
pub use generator::{GenerateParams, GeneratorError, GeneratorKind, HeatGenerator};

/// External results exporter port.
pub mod export;
pub use export::{ExportError, ExportOptions, ResultsExporter};

/// Tournament orchestration.
pub mod tournament;
pub use tournament::{
    BracketKind, BuiltTournament, StageType, TournamentError, TournamentManager,
    TournamentSettings, TournamentSummary,
};
