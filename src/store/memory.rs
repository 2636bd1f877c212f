//! In-memory implementation of the store port.
//!
//! Backs tests and single-event deployments where persistence beyond the
//! process lifetime is handled elsewhere. All state lives behind one mutex;
//! operations are short and never call back into other ports, so the lock is
//! never held across foreign code.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::plan::{HeatPlan, PilotId, SeedSource};

use super::errors::{StoreError, StoreResult};
use super::models::{ClassId, ClassRecord, HeatId, HeatRecord, SlotRecord};
use super::repository::TournamentStore;

#[derive(Default)]
struct MemoryInner {
    classes: BTreeMap<ClassId, ClassRecord>,
    heats: BTreeMap<HeatId, HeatRecord>,
    slots: HashMap<HeatId, Vec<SlotRecord>>,
    class_attributes: HashMap<(ClassId, String), String>,
    options: HashMap<String, String>,
    heat_results: HashMap<String, Vec<PilotId>>,
    class_rankings: HashMap<String, Vec<PilotId>>,
    next_class_id: ClassId,
    next_heat_id: HeatId,
}

/// In-memory tournament store
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                next_class_id: 1,
                next_heat_id: 1,
                ..MemoryInner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means a writer panicked mid-operation; the
        // data is still structurally sound maps, so keep serving.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TournamentStore for MemoryStore {
    fn create_class(&self, name: &str) -> StoreResult<ClassId> {
        let mut inner = self.lock();
        let id = inner.next_class_id;
        inner.next_class_id += 1;
        inner.classes.insert(
            id,
            ClassRecord {
                id,
                name: name.to_string(),
            },
        );
        log::debug!("created class {id} \"{name}\"");
        Ok(id)
    }

    fn delete_class(&self, class: ClassId) -> StoreResult<()> {
        let mut inner = self.lock();
        let record = inner
            .classes
            .remove(&class)
            .ok_or(StoreError::ClassNotFound(class))?;
        let orphaned: Vec<(HeatId, String)> = inner
            .heats
            .values()
            .filter(|h| h.class_id == class)
            .map(|h| (h.id, h.name.clone()))
            .collect();
        // Recorded results die with the heats that ran them; a later heat
        // reusing the same name must start unresolved
        for (heat, name) in orphaned {
            inner.heats.remove(&heat);
            inner.slots.remove(&heat);
            inner.heat_results.remove(&name);
        }
        inner.class_rankings.remove(&record.name);
        inner.class_attributes.retain(|(id, _), _| *id != class);
        log::debug!("deleted class {class}");
        Ok(())
    }

    fn all_classes(&self) -> StoreResult<Vec<ClassRecord>> {
        Ok(self.lock().classes.values().cloned().collect())
    }

    fn create_heat(&self, class: ClassId, plan: &HeatPlan) -> StoreResult<HeatId> {
        let mut inner = self.lock();
        if !inner.classes.contains_key(&class) {
            return Err(StoreError::ClassNotFound(class));
        }
        let id = inner.next_heat_id;
        inner.next_heat_id += 1;
        inner.heats.insert(
            id,
            HeatRecord {
                id,
                class_id: class,
                name: plan.name.clone(),
                display_name: plan.name.clone(),
            },
        );
        let slots = plan
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotRecord {
                heat_id: id,
                index,
                source: slot.source.clone(),
                pilot: slot.pilot,
            })
            .collect();
        inner.slots.insert(id, slots);
        log::debug!("created heat {id} \"{}\" in class {class}", plan.name);
        Ok(id)
    }

    fn delete_heat(&self, heat: HeatId) -> StoreResult<()> {
        let mut inner = self.lock();
        let record = inner
            .heats
            .remove(&heat)
            .ok_or(StoreError::HeatNotFound(heat))?;
        inner.slots.remove(&heat);
        inner.heat_results.remove(&record.name);
        Ok(())
    }

    fn set_heat_display_name(&self, heat: HeatId, display_name: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        let record = inner
            .heats
            .get_mut(&heat)
            .ok_or(StoreError::HeatNotFound(heat))?;
        record.display_name = display_name.to_string();
        Ok(())
    }

    fn heats_by_class(&self, class: ClassId) -> StoreResult<Vec<HeatRecord>> {
        let inner = self.lock();
        if !inner.classes.contains_key(&class) {
            return Err(StoreError::ClassNotFound(class));
        }
        // BTreeMap order is creation order because ids ascend
        Ok(inner
            .heats
            .values()
            .filter(|h| h.class_id == class)
            .cloned()
            .collect())
    }

    fn slots_by_heat(&self, heat: HeatId) -> StoreResult<Vec<SlotRecord>> {
        let inner = self.lock();
        inner
            .slots
            .get(&heat)
            .cloned()
            .ok_or(StoreError::HeatNotFound(heat))
    }

    fn rebind_slot(&self, heat: HeatId, index: usize, source: SeedSource) -> StoreResult<()> {
        let mut inner = self.lock();
        let slots = inner
            .slots
            .get_mut(&heat)
            .ok_or(StoreError::HeatNotFound(heat))?;
        let slot = slots
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { heat, index })?;
        slot.source = source;
        slot.pilot = None;
        Ok(())
    }

    fn assign_slot(&self, heat: HeatId, index: usize, pilot: PilotId) -> StoreResult<()> {
        let mut inner = self.lock();
        let slots = inner
            .slots
            .get_mut(&heat)
            .ok_or(StoreError::HeatNotFound(heat))?;
        let slot = slots
            .get_mut(index)
            .ok_or(StoreError::SlotOutOfRange { heat, index })?;
        slot.pilot = Some(pilot);
        Ok(())
    }

    fn set_class_attribute(&self, class: ClassId, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock();
        if !inner.classes.contains_key(&class) {
            return Err(StoreError::ClassNotFound(class));
        }
        inner
            .class_attributes
            .insert((class, key.to_string()), value.to_string());
        Ok(())
    }

    fn class_attribute(&self, class: ClassId, key: &str) -> StoreResult<Option<String>> {
        let inner = self.lock();
        if !inner.classes.contains_key(&class) {
            return Err(StoreError::ClassNotFound(class));
        }
        Ok(inner
            .class_attributes
            .get(&(class, key.to_string()))
            .cloned())
    }

    fn set_option(&self, key: &str, value: &str) -> StoreResult<()> {
        self.lock().options.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn option(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock().options.get(key).cloned())
    }

    fn record_heat_results(&self, heat_name: &str, order: &[PilotId]) -> StoreResult<()> {
        self.lock()
            .heat_results
            .insert(heat_name.to_string(), order.to_vec());
        Ok(())
    }

    fn record_class_ranking(&self, class_name: &str, ranking: &[PilotId]) -> StoreResult<()> {
        self.lock()
            .class_rankings
            .insert(class_name.to_string(), ranking.to_vec());
        Ok(())
    }

    fn heat_finisher(&self, heat_name: &str, position: u32) -> StoreResult<Option<PilotId>> {
        if position == 0 {
            return Ok(None);
        }
        Ok(self
            .lock()
            .heat_results
            .get(heat_name)
            .and_then(|order| order.get(position as usize - 1))
            .copied())
    }

    fn class_finisher(&self, class_name: &str, rank: u32) -> StoreResult<Option<PilotId>> {
        if rank == 0 {
            return Ok(None);
        }
        Ok(self
            .lock()
            .class_rankings
            .get(class_name)
            .and_then(|order| order.get(rank as usize - 1))
            .copied())
    }
}
