//! Store record types.

use serde::{Deserialize, Serialize};

use crate::plan::{PilotId, SeedSource};

/// Class ID type
pub type ClassId = i64;

/// Heat ID type
pub type HeatId = i64;

/// A persisted class: a named ranked grouping of heats representing one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: ClassId,
    pub name: String,
}

/// A persisted heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatRecord {
    pub id: HeatId,
    pub class_id: ClassId,
    /// Stable name other heats reference; never changed after creation
    pub name: String,
    /// Name shown to operators, normalized by the orchestrator
    pub display_name: String,
}

/// A persisted slot within a heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub heat_id: HeatId,
    /// 0-based position within the heat
    pub index: usize,
    pub source: SeedSource,
    /// Occupant, once the source has been resolved
    pub pilot: Option<PilotId>,
}
