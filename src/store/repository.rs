//! Store port trait definition for testability and dependency injection.
//!
//! The orchestrator never owns persistence: classes, heats, slots, and race
//! results live behind this trait, and forward references are resolved
//! through it rather than through in-memory pointers. Implementations are
//! expected to be internally synchronized; the core calls them from a single
//! request-scoped thread.

use crate::plan::{HeatPlan, PilotId, ResultsSource, SeedSource};

use super::errors::StoreResult;
use super::models::{ClassId, ClassRecord, HeatId, HeatRecord, SlotRecord};

/// Port for persisting classes, heats, and slots, and for reporting
/// finishing ranks once races are run
pub trait TournamentStore: Send + Sync {
    /// Create a new class
    fn create_class(&self, name: &str) -> StoreResult<ClassId>;

    /// Delete a class and anything still owned by it
    fn delete_class(&self, class: ClassId) -> StoreResult<()>;

    /// List every class
    fn all_classes(&self) -> StoreResult<Vec<ClassRecord>>;

    /// Create a heat (and its slots) under a class from a plan
    fn create_heat(&self, class: ClassId, plan: &HeatPlan) -> StoreResult<HeatId>;

    /// Delete a heat and its slots
    fn delete_heat(&self, heat: HeatId) -> StoreResult<()>;

    /// Set a heat's display name; the stable reference name is untouched
    fn set_heat_display_name(&self, heat: HeatId, display_name: &str) -> StoreResult<()>;

    /// List a class's heats in creation order
    fn heats_by_class(&self, class: ClassId) -> StoreResult<Vec<HeatRecord>>;

    /// List a heat's slots in slot order
    fn slots_by_heat(&self, heat: HeatId) -> StoreResult<Vec<SlotRecord>>;

    /// Replace a slot's seed source, clearing any resolved occupant
    fn rebind_slot(&self, heat: HeatId, index: usize, source: SeedSource) -> StoreResult<()>;

    /// Assign a resolved occupant to a slot
    fn assign_slot(&self, heat: HeatId, index: usize, pilot: PilotId) -> StoreResult<()>;

    /// Set an attribute on a class
    fn set_class_attribute(&self, class: ClassId, key: &str, value: &str) -> StoreResult<()>;

    /// Read an attribute from a class
    fn class_attribute(&self, class: ClassId, key: &str) -> StoreResult<Option<String>>;

    /// Set a named option
    fn set_option(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Read a named option
    fn option(&self, key: &str) -> StoreResult<Option<String>>;

    /// Record a heat's finishing order, winner first
    fn record_heat_results(&self, heat_name: &str, order: &[PilotId]) -> StoreResult<()>;

    /// Record a class's overall ranking, best first
    fn record_class_ranking(&self, class_name: &str, ranking: &[PilotId]) -> StoreResult<()>;

    /// Finisher at a 1-based position of a named heat, if recorded
    fn heat_finisher(&self, heat_name: &str, position: u32) -> StoreResult<Option<PilotId>>;

    /// Finisher at a 1-based rank of a named class's ranking, if recorded
    fn class_finisher(&self, class_name: &str, rank: u32) -> StoreResult<Option<PilotId>>;
}

/// Every store doubles as the results source seed resolution reads from.
/// Lookup failures count as "not recorded yet" rather than hard errors.
impl<S: TournamentStore + ?Sized> ResultsSource for S {
    fn heat_finisher(&self, heat: &str, position: u32) -> Option<PilotId> {
        TournamentStore::heat_finisher(self, heat, position)
            .ok()
            .flatten()
    }

    fn class_finisher(&self, class: &str, rank: u32) -> Option<PilotId> {
        TournamentStore::class_finisher(self, class, rank)
            .ok()
            .flatten()
    }
}
