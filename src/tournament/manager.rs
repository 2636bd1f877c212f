//! Tournament orchestration.
//!
//! [`TournamentManager`] owns the build chain: free practice, qualifier,
//! final bracket, and (for large rosters) the placement stage with its
//! promotion rewrite. Every stage lands in the store before the next one is
//! planned, so generators and the bracket wiring always read persisted state
//! rather than in-memory scratch.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::bracket::{
    DEFAULT_RACE1_SEEDS, DEFAULT_RACE2_SEEDS, default_heat_names, double_elim_8,
};
use crate::export::{ExportOptions, ResultsExporter};
use crate::generator::{GenerateParams, GeneratorKind, HeatGenerator};
use crate::plan::{HeatPlan, Pilot, PilotId, SeedSource};
use crate::store::{ClassId, ClassRecord, StoreError, TournamentStore};

use super::errors::{TournamentError, TournamentResult};
use super::models::{
    ATTR_BRACKET, ATTR_CREATED_AT, ATTR_EXPORTED_AT, ATTR_SETTINGS, ATTR_STAGE, ATTR_TOURNAMENT,
    BracketKind, BuiltTournament, StageSummary, StageType, TournamentSettings, TournamentSummary,
};

use rand::rng;
use rand::seq::SliceRandom;

/// Orchestrates tournament builds over the store, generator, and export ports
pub struct TournamentManager {
    store: Arc<dyn TournamentStore>,
    generator: Arc<dyn HeatGenerator>,
    exporter: Arc<dyn ResultsExporter>,
    /// One lock per tournament name, so existence check and stage creation
    /// are atomic against a concurrent build or delete of the same name
    name_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TournamentManager {
    /// Create a new tournament manager
    ///
    /// # Arguments
    ///
    /// * `store` - Persistence port for classes, heats, and slots
    /// * `generator` - Port for the external stage generators
    /// * `exporter` - Port for the external results exporter
    pub fn new(
        store: Arc<dyn TournamentStore>,
        generator: Arc<dyn HeatGenerator>,
        exporter: Arc<dyn ResultsExporter>,
    ) -> Self {
        Self {
            store,
            generator,
            exporter,
            name_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build a complete tournament for a roster.
    ///
    /// Creates the free-practice, qualifier, and final stages, plus a
    /// placement stage when the roster exceeds the bracket capacity. The
    /// build is all-or-nothing: any stage failure rolls back every class
    /// created so far and the error is returned unchanged.
    ///
    /// # Arguments
    ///
    /// * `name` - Tournament name, unique across the store
    /// * `roster` - Competitors in seeding order, best first
    /// * `settings` - Validated heat sizing and bracket configuration
    ///
    /// # Returns
    ///
    /// * `TournamentResult<BuiltTournament>` - The created stage classes
    pub fn build(
        &self,
        name: &str,
        roster: &[Pilot],
        settings: &TournamentSettings,
    ) -> TournamentResult<BuiltTournament> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidConfiguration {
                field: "name",
                reason: "must not be blank".to_string(),
            });
        }
        if roster.len() < 2 {
            return Err(TournamentError::InvalidConfiguration {
                field: "roster",
                reason: format!("{} pilot(s) cannot race each other", roster.len()),
            });
        }
        settings.validate()?;

        self.locked(name, || {
            if !self.classes_tagged(name)?.is_empty() {
                return Err(TournamentError::DuplicateTournament(name.to_string()));
            }

            log::info!(
                "building tournament \"{name}\": {} pilots, bracket of {}",
                roster.len(),
                settings.final_bracket_size
            );

            let mut created = Vec::new();
            match self.build_stages(name, roster, settings, &mut created) {
                Ok(stages) => Ok(BuiltTournament {
                    name: name.to_string(),
                    stages,
                }),
                Err(err) => {
                    log::warn!("build of \"{name}\" failed, rolling back: {err}");
                    self.rollback(&created);
                    Err(err)
                }
            }
        })
    }

    /// List every tournament in the store with its stages and metadata
    pub fn list(&self) -> TournamentResult<Vec<TournamentSummary>> {
        let mut grouped: BTreeMap<String, Vec<ClassRecord>> = BTreeMap::new();
        for class in self.store.all_classes()? {
            if let Some(tournament) = self.store.class_attribute(class.id, ATTR_TOURNAMENT)? {
                grouped.entry(tournament).or_default().push(class);
            }
        }

        let mut summaries = Vec::new();
        for (name, classes) in grouped {
            let mut stages = BTreeMap::new();
            let mut bracket_kind = BracketKind::None;
            let mut created_at = None;
            let mut exported_at = None;
            let mut settings = None;

            for class in classes {
                let heat_count = self.store.heats_by_class(class.id)?.len();
                if let Some(stage) = self
                    .store
                    .class_attribute(class.id, ATTR_STAGE)?
                    .as_deref()
                    .and_then(StageType::parse)
                {
                    stages.insert(
                        stage,
                        StageSummary {
                            class_id: class.id,
                            class_name: class.name.clone(),
                            heat_count,
                        },
                    );
                }
                if let Some(kind) = self.store.class_attribute(class.id, ATTR_BRACKET)? {
                    bracket_kind = BracketKind::parse(&kind);
                }
                if created_at.is_none() {
                    created_at = self.timestamp_attribute(class.id, ATTR_CREATED_AT)?;
                }
                if exported_at.is_none() {
                    exported_at = self.timestamp_attribute(class.id, ATTR_EXPORTED_AT)?;
                }
                if settings.is_none()
                    && let Some(json) = self.store.class_attribute(class.id, ATTR_SETTINGS)?
                {
                    settings = serde_json::from_str(&json).ok();
                }
            }

            summaries.push(TournamentSummary {
                name,
                bracket_kind,
                stages,
                created_at,
                exported_at,
                settings,
            });
        }
        Ok(summaries)
    }

    /// Delete a tournament and every class and heat it owns
    ///
    /// # Arguments
    ///
    /// * `name` - Tournament name used at build time
    pub fn delete(&self, name: &str) -> TournamentResult<()> {
        let name = name.trim();
        self.locked(name, || {
            let classes = self.classes_tagged(name)?;
            if classes.is_empty() {
                return Err(TournamentError::TournamentNotFound(name.to_string()));
            }

            for (_, class) in &classes {
                for heat in self.store.heats_by_class(class.id)? {
                    self.store.delete_heat(heat.id)?;
                }
                self.store.delete_class(class.id)?;
            }
            log::info!("deleted tournament \"{name}\" ({} classes)", classes.len());
            Ok(())
        })
    }

    /// Run an export profile over a tournament's stages.
    ///
    /// The qualifier and final stages are required; a placement stage is
    /// forwarded as the small final when present. On success the final class
    /// is stamped with the export timestamp.
    ///
    /// # Arguments
    ///
    /// * `name` - Tournament name used at build time
    /// * `profile` - Export profile name understood by the exporter
    pub fn export(&self, name: &str, profile: &str) -> TournamentResult<()> {
        let name = name.trim();
        let classes = self.classes_tagged(name)?;
        if classes.is_empty() {
            return Err(TournamentError::TournamentNotFound(name.to_string()));
        }

        let stage_class = |stage: StageType| {
            classes
                .iter()
                .find(|(s, _)| *s == Some(stage))
                .map(|(_, c)| c.id)
        };
        let qualifier = stage_class(StageType::Qualifier).ok_or_else(|| {
            TournamentError::MissingStage {
                name: name.to_string(),
                stage: StageType::Qualifier,
            }
        })?;
        let final_class =
            stage_class(StageType::Final).ok_or_else(|| TournamentError::MissingStage {
                name: name.to_string(),
                stage: StageType::Final,
            })?;

        let mut options = ExportOptions::new(qualifier, final_class);
        if let Some(placement) = stage_class(StageType::Placement) {
            options = options.with_small_final(placement);
        }

        self.exporter.export(profile, &options)?;
        self.store
            .set_class_attribute(final_class, ATTR_EXPORTED_AT, &Utc::now().to_rfc3339())?;
        log::info!("exported tournament \"{name}\" with profile \"{profile}\"");
        Ok(())
    }

    fn build_stages(
        &self,
        name: &str,
        roster: &[Pilot],
        settings: &TournamentSettings,
        created: &mut Vec<ClassId>,
    ) -> TournamentResult<BTreeMap<StageType, ClassId>> {
        let mut stages = BTreeMap::new();

        let practice = self.build_free_practice(name, roster, settings.free_heat_size, created)?;
        stages.insert(StageType::FreePractice, practice);

        let qualifier = self.generator.generate(
            GeneratorKind::RankedFill,
            &GenerateParams::new()
                .input_class(practice)
                .qualifiers_per_heat(settings.qual_heat_size)
                .num_pilots(roster.len() as u32),
        )?;
        created.push(qualifier);
        stages.insert(StageType::Qualifier, qualifier);

        let (final_class, bracket_kind) = match settings.final_bracket_size {
            16 => {
                let class = self.generator.generate(
                    GeneratorKind::BracketDoubleElim16,
                    &GenerateParams::new()
                        .input_class(qualifier)
                        .num_pilots(settings.final_bracket_size),
                )?;
                created.push(class);
                (class, BracketKind::DoubleElim16)
            }
            _ => (
                self.build_double_elim_8(name, qualifier, created)?,
                BracketKind::DoubleElim8,
            ),
        };
        stages.insert(StageType::Final, final_class);
        self.normalize_heat_names(final_class)?;

        if roster.len() as u32 > settings.final_bracket_size {
            let already_qualified = settings.already_qualified();
            let placement = self.generator.generate(
                GeneratorKind::Ladder,
                &GenerateParams::new()
                    .input_class(qualifier)
                    .seed_offset(already_qualified)
                    .num_pilots(roster.len() as u32 - already_qualified)
                    .qualifiers_per_heat(settings.final_heat_size)
                    .advances_per_heat(settings.num_advance),
            )?;
            created.push(placement);
            stages.insert(StageType::Placement, placement);
            self.promote_from_placement(final_class, placement, already_qualified)?;
        }

        self.tag_stages(name, &stages, bracket_kind, settings)?;
        Ok(stages)
    }

    /// Partition a shuffled roster into practice heats of at most
    /// `heat_size` pilots, assigning every slot immediately
    fn build_free_practice(
        &self,
        name: &str,
        roster: &[Pilot],
        heat_size: u32,
        created: &mut Vec<ClassId>,
    ) -> TournamentResult<ClassId> {
        let class = self.store.create_class(&format!("{name} Free Practice"))?;
        created.push(class);

        let pool = format!("{name} seeding");
        let mut order: Vec<PilotId> = roster.iter().map(|p| p.id).collect();
        order.shuffle(&mut rng());

        for (heat_index, chunk) in order.chunks(heat_size as usize).enumerate() {
            let base = heat_index * heat_size as usize;
            let sources = (0..chunk.len())
                .map(|i| SeedSource::input(&pool, (base + i + 1) as u32))
                .collect();
            let plan = HeatPlan::new(format!("{name} Practice Heat {}", heat_index + 1), sources);
            let heat = self.store.create_heat(class, &plan)?;
            for (i, pilot) in chunk.iter().enumerate() {
                self.store.assign_slot(heat, i, *pilot)?;
            }
        }
        log::debug!(
            "free practice for \"{name}\": {} pilots over {} heats",
            order.len(),
            order.len().div_ceil(heat_size as usize)
        );
        Ok(class)
    }

    /// Plan and persist the fixed six-heat 8-competitor bracket, seeded from
    /// the qualifier class's ranking
    fn build_double_elim_8(
        &self,
        name: &str,
        qualifier: ClassId,
        created: &mut Vec<ClassId>,
    ) -> TournamentResult<ClassId> {
        let pool = self.class_name(qualifier)?;
        let heat_names: Vec<String> = default_heat_names()
            .into_iter()
            .map(|heat| format!("{name} {heat}"))
            .collect();
        let plans = double_elim_8(&pool, &DEFAULT_RACE1_SEEDS, &DEFAULT_RACE2_SEEDS, &heat_names)?;

        let class = self.store.create_class(&format!("{name} Final"))?;
        created.push(class);
        for plan in &plans {
            self.store.create_heat(class, plan)?;
        }
        Ok(class)
    }

    /// Shorten every heat's display name to its race label, keeping the
    /// stable reference names untouched
    fn normalize_heat_names(&self, class: ClassId) -> TournamentResult<()> {
        for heat in self.store.heats_by_class(class)? {
            let display = display_heat_name(&heat.name);
            if display != heat.display_name {
                self.store.set_heat_display_name(heat.id, &display)?;
            }
        }
        Ok(())
    }

    /// Rewrite the bracket slots reserved for placement-stage winners.
    ///
    /// The bracket templates seed the last two entries from qualifier ranks
    /// just past the already-qualified cut. When a placement stage exists,
    /// those ranks belong to it instead: the slots are rebound to the
    /// placement class's overall ranks 1 and 2, so they stay unresolved
    /// until the placement stage has results.
    fn promote_from_placement(
        &self,
        final_class: ClassId,
        placement: ClassId,
        already_qualified: u32,
    ) -> TournamentResult<()> {
        let placement_name = self.class_name(placement)?;
        let mut rewritten = 0;
        for heat in self.store.heats_by_class(final_class)? {
            for slot in self.store.slots_by_heat(heat.id)? {
                let SeedSource::InputRank { rank, .. } = slot.source else {
                    continue;
                };
                let position = if rank == already_qualified + 1 {
                    1
                } else if rank == already_qualified + 2 {
                    2
                } else {
                    continue;
                };
                self.store.rebind_slot(
                    heat.id,
                    slot.index,
                    SeedSource::class_rank(&placement_name, position),
                )?;
                rewritten += 1;
            }
        }
        log::debug!("rebound {rewritten} bracket slot(s) to seed from \"{placement_name}\"");
        Ok(())
    }

    fn tag_stages(
        &self,
        name: &str,
        stages: &BTreeMap<StageType, ClassId>,
        bracket_kind: BracketKind,
        settings: &TournamentSettings,
    ) -> TournamentResult<()> {
        for (stage, &class) in stages {
            self.store.set_class_attribute(class, ATTR_TOURNAMENT, name)?;
            self.store
                .set_class_attribute(class, ATTR_STAGE, stage.as_str())?;
        }
        if let Some(&final_class) = stages.get(&StageType::Final) {
            self.store
                .set_class_attribute(final_class, ATTR_BRACKET, bracket_kind.as_str())?;
        }
        // Build metadata lives on the first stage class
        if let Some((_, &first)) = stages.iter().next() {
            self.store
                .set_class_attribute(first, ATTR_CREATED_AT, &Utc::now().to_rfc3339())?;
            self.store
                .set_class_attribute(first, ATTR_SETTINGS, &serde_json::to_string(settings)?)?;
        }
        Ok(())
    }

    /// Best-effort rollback of a failed build; failures are logged, not
    /// propagated, so the original build error survives
    fn rollback(&self, created: &[ClassId]) {
        for &class in created.iter().rev() {
            match self.store.heats_by_class(class) {
                Ok(heats) => {
                    for heat in heats {
                        if let Err(err) = self.store.delete_heat(heat.id) {
                            log::warn!("rollback: failed to delete heat {}: {err}", heat.id);
                        }
                    }
                }
                Err(err) => log::warn!("rollback: failed to list heats of class {class}: {err}"),
            }
            if let Err(err) = self.store.delete_class(class) {
                log::warn!("rollback: failed to delete class {class}: {err}");
            }
        }
    }

    fn classes_tagged(
        &self,
        name: &str,
    ) -> TournamentResult<Vec<(Option<StageType>, ClassRecord)>> {
        let mut tagged = Vec::new();
        for class in self.store.all_classes()? {
            if self.store.class_attribute(class.id, ATTR_TOURNAMENT)?.as_deref() == Some(name) {
                let stage = self
                    .store
                    .class_attribute(class.id, ATTR_STAGE)?
                    .as_deref()
                    .and_then(StageType::parse);
                tagged.push((stage, class));
            }
        }
        Ok(tagged)
    }

    fn class_name(&self, class: ClassId) -> TournamentResult<String> {
        self.store
            .all_classes()?
            .into_iter()
            .find(|c| c.id == class)
            .map(|c| c.name)
            .ok_or(TournamentError::Store(StoreError::ClassNotFound(class)))
    }

    fn timestamp_attribute(
        &self,
        class: ClassId,
        key: &str,
    ) -> TournamentResult<Option<DateTime<Utc>>> {
        Ok(self
            .store
            .class_attribute(class, key)?
            .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
            .map(|t| t.with_timezone(&Utc)))
    }

    /// Run an operation holding the named tournament's lock, then prune the
    /// lock entry if no other caller is waiting on it
    fn locked<T>(&self, name: &str, op: impl FnOnce() -> T) -> T {
        let lock = self.name_lock(name);
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            op()
        };

        let mut locks = self
            .name_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Two strong references are the map's and ours; anyone still waiting
        // holds a third, and their own cleanup pass will prune the entry
        if locks.get(name).is_some_and(|l| Arc::strong_count(l) == 2) {
            locks.remove(name);
        }
        result
    }

    fn name_lock(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .name_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(name.to_string()).or_default())
    }

    #[cfg(test)]
    fn name_lock_count(&self) -> usize {
        self.name_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Display name for a heat: the race label without the bracket-role suffix
/// generators append after a spaced dash or a colon. Dashes inside the label
/// itself (a dashed tournament name, say) are left alone.
fn display_heat_name(name: &str) -> String {
    let cut = [" - ", ": "].iter().filter_map(|sep| name.rfind(sep)).max();
    match cut {
        Some(cut) => name[..cut].trim_end().to_string(),
        None => name.to_string(),
    }
}
