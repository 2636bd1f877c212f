//! Seed-source, slot, and heat-plan data models.
//!
//! A [`HeatPlan`] describes one race heat before any result exists: an
//! ordered list of slots, each naming where its occupant will come from.
//! Slots referencing earlier heats stay unresolved until those heats have
//! recorded results, which makes a set of plans a directed dependency graph
//! that is resolved lazily as races complete.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{PlanError, PlanResult};

/// Pilot ID type
pub type PilotId = i64;

/// A competitor on the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pilot {
    /// Opaque identity
    pub id: PilotId,
    /// Display callsign
    pub callsign: String,
}

impl Pilot {
    /// Create a new pilot
    pub fn new(id: PilotId, callsign: impl Into<String>) -> Self {
        Self {
            id,
            callsign: callsign.into(),
        }
    }
}

/// Non-owning, by-name reference to a finishing order.
///
/// A reference is a relation, never an ownership edge: the named heat may not
/// exist yet when the reference is authored (forward reference), or may
/// belong to a different stage entirely. References are resolved through the
/// store at evaluation time, never through in-memory pointers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatRef {
    /// A single named heat
    Heat(String),
    /// The overall ranking of a whole class (used by cross-stage promotion)
    ClassRank(String),
}

impl fmt::Display for HeatRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatRef::Heat(name) => write!(f, "heat \"{name}\""),
            HeatRef::ClassRank(name) => write!(f, "class \"{name}\" overall"),
        }
    }
}

/// Where a slot's occupant comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeedSource {
    /// The entrant holding `rank` (1-based) within a named input pool,
    /// e.g. roster seeding order or a previous stage's ranking
    InputRank { pool: String, rank: u32 },
    /// Whoever finishes in `position` (1-based) of the referenced source
    HeatResult { source: HeatRef, position: u32 },
}

impl SeedSource {
    /// Seed from a rank in a named input pool
    pub fn input(pool: impl Into<String>, rank: u32) -> Self {
        SeedSource::InputRank {
            pool: pool.into(),
            rank,
        }
    }

    /// Seed from the finishing position of a named heat
    pub fn heat(heat: impl Into<String>, position: u32) -> Self {
        SeedSource::HeatResult {
            source: HeatRef::Heat(heat.into()),
            position,
        }
    }

    /// Seed from a class's overall ranking
    pub fn class_rank(class: impl Into<String>, position: u32) -> Self {
        SeedSource::HeatResult {
            source: HeatRef::ClassRank(class.into()),
            position,
        }
    }

    /// Evaluate this source against materialized pools and recorded results.
    ///
    /// Input ranks are looked up in `pools` first; a pool name that is not
    /// materialized falls back to the class ranking of the same name, so a
    /// source seeded from "previous stage ranking" resolves once that stage
    /// has results. Fails with [`PlanError::UnresolvedReference`] when the
    /// referenced result does not exist yet.
    pub fn resolve(&self, pools: &PoolSet, results: &dyn ResultsSource) -> PlanResult<PilotId> {
        let pilot = match self {
            SeedSource::InputRank { pool, rank } => pools
                .pilot_at(pool, *rank)
                .or_else(|| results.class_finisher(pool, *rank)),
            SeedSource::HeatResult { source, position } => match source {
                HeatRef::Heat(heat) => results.heat_finisher(heat, *position),
                HeatRef::ClassRank(class) => results.class_finisher(class, *position),
            },
        };
        pilot.ok_or_else(|| PlanError::UnresolvedReference(self.clone()))
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedSource::InputRank { pool, rank } => write!(f, "rank {rank} of pool \"{pool}\""),
            SeedSource::HeatResult { source, position } => {
                write!(f, "position {position} of {source}")
            }
        }
    }
}

/// One competitor position within a heat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Where the occupant comes from
    pub source: SeedSource,
    /// The concrete occupant, once the source has been evaluated
    pub pilot: Option<PilotId>,
}

impl Slot {
    /// Create an unresolved slot
    pub fn new(source: SeedSource) -> Self {
        Self {
            source,
            pilot: None,
        }
    }

    /// Whether the occupant is known
    pub fn is_resolved(&self) -> bool {
        self.pilot.is_some()
    }

    /// Evaluate the seed source and remember the occupant
    pub fn resolve(
        &mut self,
        pools: &PoolSet,
        results: &dyn ResultsSource,
    ) -> PlanResult<PilotId> {
        let pilot = self.source.resolve(pools, results)?;
        self.pilot = Some(pilot);
        Ok(pilot)
    }
}

/// One heat: a name and an ordered sequence of slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatPlan {
    /// Stable heat name; also the key other plans reference it by
    pub name: String,
    /// Ordered slots, 0-based
    pub slots: Vec<Slot>,
}

impl HeatPlan {
    /// Create a plan with one slot per seed source
    pub fn new(name: impl Into<String>, sources: Vec<SeedSource>) -> Self {
        Self {
            name: name.into(),
            slots: sources.into_iter().map(Slot::new).collect(),
        }
    }

    /// Create a plan whose slot count must match the stage's declared heat
    /// size, failing with [`PlanError::MalformedPlan`] on a mismatch
    pub fn sized(
        name: impl Into<String>,
        sources: Vec<SeedSource>,
        heat_size: usize,
    ) -> PlanResult<Self> {
        let name = name.into();
        if sources.len() != heat_size {
            return Err(PlanError::MalformedPlan {
                plan: name,
                expected: heat_size,
                actual: sources.len(),
            });
        }
        Ok(Self::new(name, sources))
    }

    /// Number of slots
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Names of the heats this plan's slots reference.
    ///
    /// Class-ranking references and input ranks carry no heat dependency and
    /// are not included.
    pub fn heat_dependencies(&self) -> Vec<&str> {
        let mut deps = Vec::new();
        for slot in &self.slots {
            if let SeedSource::HeatResult {
                source: HeatRef::Heat(heat),
                ..
            } = &slot.source
                && !deps.contains(&heat.as_str())
            {
                deps.push(heat.as_str());
            }
        }
        deps
    }

    /// Resolve every slot whose source is evaluable, leaving the rest
    /// untouched. Returns the number of newly resolved slots.
    pub fn resolve_ready(&mut self, pools: &PoolSet, results: &dyn ResultsSource) -> usize {
        let mut resolved = 0;
        for slot in &mut self.slots {
            if !slot.is_resolved() && slot.resolve(pools, results).is_ok() {
                resolved += 1;
            }
        }
        resolved
    }
}

/// A materialized input pool: pilots keyed by 1-based rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPool {
    /// Pool name, referenced by [`SeedSource::InputRank`]
    pub name: String,
    /// Pilots in rank order (index 0 holds rank 1)
    pub entries: Vec<PilotId>,
}

impl RankPool {
    /// Create a pool from pilots in rank order
    pub fn new(name: impl Into<String>, entries: Vec<PilotId>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Pilot at a 1-based rank
    pub fn pilot_at(&self, rank: u32) -> Option<PilotId> {
        if rank == 0 {
            return None;
        }
        self.entries.get(rank as usize - 1).copied()
    }
}

/// Set of materialized pools, keyed by name
#[derive(Debug, Clone, Default)]
pub struct PoolSet {
    pools: HashMap<String, RankPool>,
}

impl PoolSet {
    /// Create an empty pool set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a pool
    pub fn insert(&mut self, pool: RankPool) {
        self.pools.insert(pool.name.clone(), pool);
    }

    /// Pilot at a 1-based rank within a named pool
    pub fn pilot_at(&self, pool: &str, rank: u32) -> Option<PilotId> {
        self.pools.get(pool).and_then(|p| p.pilot_at(rank))
    }
}

/// Lookup of recorded race results, implemented by the store.
///
/// Absence means the referenced heat, class, or position has no recorded
/// finisher yet; resolution treats that as unresolved, not as an error.
pub trait ResultsSource {
    /// Finisher at a 1-based position of a named heat
    fn heat_finisher(&self, heat: &str, position: u32) -> Option<PilotId>;

    /// Finisher at a 1-based rank of a named class's overall ranking
    fn class_finisher(&self, class: &str, rank: u32) -> Option<PilotId>;
}
