//! Heat-plan model: seed sources, slots, and plans.
//!
//! This module provides the leaf data model the rest of the crate is built
//! on:
//! - Seed sources: input-pool ranks and forward references to heat results
//! - Slots and heat plans with fixed slot counts
//! - Lazy resolution of references against recorded results
//!
//! ## Example
//!
//! ```
//! use raceplan::plan::{HeatPlan, SeedSource};
//!
//! // The final of a bracket: winners of races 4 and 5, none of which
//! // have run yet when the plan is authored.
//! let plan = HeatPlan::new(
//!     "Race 6 - Final",
//!     vec![
//!         SeedSource::heat("Race 4", 1),
//!         SeedSource::heat("Race 4", 2),
//!         SeedSource::heat("Race 5", 1),
//!         SeedSource::heat("Race 5", 2),
//!     ],
//! );
//! assert_eq!(plan.heat_dependencies(), vec!["Race 4", "Race 5"]);
//! ```

pub mod errors;
pub mod models;

pub use errors::{PlanError, PlanResult};
pub use models::{
    HeatPlan, HeatRef, Pilot, PilotId, PoolSet, RankPool, ResultsSource, SeedSource, Slot,
};
