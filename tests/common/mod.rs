//! Shared test collaborators: a stub stage generator and a recording
//! exporter, both backed by the same in-memory store as the manager under
//! test.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use raceplan::export::{ExportOptions, ExportResult, ResultsExporter};
use raceplan::generator::{GenerateParams, GeneratorError, GeneratorKind, GeneratorResult};
use raceplan::plan::{HeatPlan, Pilot, SeedSource};
use raceplan::store::{ClassId, MemoryStore, TournamentStore};
use raceplan::tournament::TournamentManager;
use raceplan::HeatGenerator;

/// Opening-heat seeding rows of the stubbed 16-pilot bracket. Every
/// qualifier rank 1..=16 appears exactly once.
const OPENING_ROWS_16: [[u32; 4]; 4] = [
    [1, 16, 8, 9],
    [2, 15, 7, 10],
    [3, 14, 6, 11],
    [4, 13, 5, 12],
];

/// Stage generator stub writing directly through the shared store.
///
/// Supports the three kinds the orchestrator invokes (ranked fill, ladder,
/// and the 16-pilot bracket template) and refuses the rest.
pub struct StubGenerator {
    store: Arc<MemoryStore>,
    next_id: AtomicI64,
}

impl StubGenerator {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            next_id: AtomicI64::new(1),
        }
    }

    fn fresh_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn class_name(&self, class: ClassId) -> GeneratorResult<String> {
        self.store
            .all_classes()
            .map_err(store_failure)?
            .into_iter()
            .find(|c| c.id == class)
            .map(|c| c.name)
            .ok_or_else(|| GeneratorError::Failed {
                kind: GeneratorKind::RankedFill,
                message: format!("input class {class} not found"),
            })
    }

    fn pilot_count(&self, class: ClassId) -> GeneratorResult<usize> {
        let mut count = 0;
        for heat in self.store.heats_by_class(class).map_err(store_failure)? {
            count += self
                .store
                .slots_by_heat(heat.id)
                .map_err(store_failure)?
                .len();
        }
        Ok(count)
    }

    fn ranked_fill(&self, params: &GenerateParams) -> GeneratorResult<ClassId> {
        let input = params.input_class.ok_or_else(|| missing("input_class"))?;
        let heat_size = params
            .qualifiers_per_heat
            .ok_or_else(|| missing("qualifiers_per_heat"))? as usize;
        let pool = self.class_name(input)?;
        let pilots = self.pilot_count(input)?;

        let id = self.fresh_id();
        let class = self
            .store
            .create_class(&format!("Qualifying {id}"))
            .map_err(store_failure)?;
        let ranks: Vec<u32> = (1..=pilots as u32).collect();
        for (heat_index, chunk) in ranks.chunks(heat_size).enumerate() {
            let plan = HeatPlan::new(
                format!("Qualifying {id} Heat {}", heat_index + 1),
                chunk.iter().map(|&r| SeedSource::input(&pool, r)).collect(),
            );
            self.store.create_heat(class, &plan).map_err(store_failure)?;
        }
        Ok(class)
    }

    fn bracket_16(&self, params: &GenerateParams) -> GeneratorResult<ClassId> {
        let input = params.input_class.ok_or_else(|| missing("input_class"))?;
        let pool = self.class_name(input)?;

        let id = self.fresh_id();
        let class = self
            .store
            .create_class(&format!("Bracket {id}"))
            .map_err(store_failure)?;

        // Heat names carry a bracket-role suffix after a dash, the way the
        // big templates name their races.
        let race_name = |race: usize| match race {
            1..=4 => format!("Bracket {id} Race {race} - Winner Bracket"),
            14 => format!("Bracket {id} Race 14 - Final"),
            _ => format!("Bracket {id} Race {race} - Lower Bracket"),
        };

        for (row_index, row) in OPENING_ROWS_16.iter().enumerate() {
            let plan = HeatPlan::new(
                race_name(row_index + 1),
                row.iter().map(|&r| SeedSource::input(&pool, r)).collect(),
            );
            self.store.create_heat(class, &plan).map_err(store_failure)?;
        }
        for race in 5..=14 {
            let plan = HeatPlan::new(
                race_name(race),
                vec![
                    SeedSource::heat(race_name(race - 4), 1),
                    SeedSource::heat(race_name(race - 4), 2),
                    SeedSource::heat(race_name(race - 3), 3),
                    SeedSource::heat(race_name(race - 3), 4),
                ],
            );
            self.store.create_heat(class, &plan).map_err(store_failure)?;
        }
        Ok(class)
    }

    fn ladder(&self, params: &GenerateParams) -> GeneratorResult<ClassId> {
        let input = params.input_class.ok_or_else(|| missing("input_class"))?;
        let offset = params.seed_offset.unwrap_or(0);
        let pilots = params.num_pilots.ok_or_else(|| missing("num_pilots"))?;
        let heat_size = params
            .qualifiers_per_heat
            .ok_or_else(|| missing("qualifiers_per_heat"))? as usize;
        let pool = self.class_name(input)?;

        let id = self.fresh_id();
        let class = self
            .store
            .create_class(&format!("Small Final {id}"))
            .map_err(store_failure)?;
        let ranks: Vec<u32> = (offset + 1..=offset + pilots).collect();
        for (heat_index, chunk) in ranks.chunks(heat_size).enumerate() {
            let plan = HeatPlan::new(
                format!("Small Final {id} Heat {}", heat_index + 1),
                chunk.iter().map(|&r| SeedSource::input(&pool, r)).collect(),
            );
            self.store.create_heat(class, &plan).map_err(store_failure)?;
        }
        Ok(class)
    }
}

impl HeatGenerator for StubGenerator {
    fn generate(&self, kind: GeneratorKind, params: &GenerateParams) -> GeneratorResult<ClassId> {
        match kind {
            GeneratorKind::RankedFill => self.ranked_fill(params),
            GeneratorKind::BracketDoubleElim16 => self.bracket_16(params),
            GeneratorKind::Ladder => self.ladder(params),
            other => Err(GeneratorError::Unsupported(other)),
        }
    }
}

fn missing(field: &str) -> GeneratorError {
    GeneratorError::Failed {
        kind: GeneratorKind::RankedFill,
        message: format!("missing parameter: {field}"),
    }
}

fn store_failure(err: raceplan::StoreError) -> GeneratorError {
    GeneratorError::Failed {
        kind: GeneratorKind::RankedFill,
        message: err.to_string(),
    }
}

/// Exporter that records every invocation
#[derive(Default)]
pub struct RecordingExporter {
    calls: Mutex<Vec<(String, ExportOptions)>>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(String, ExportOptions)> {
        self.calls.lock().expect("exporter lock").clone()
    }
}

impl ResultsExporter for RecordingExporter {
    fn export(&self, profile: &str, options: &ExportOptions) -> ExportResult<()> {
        self.calls
            .lock()
            .expect("exporter lock")
            .push((profile.to_string(), options.clone()));
        Ok(())
    }
}

/// Manager wired over a fresh in-memory store and the stub collaborators
pub fn setup() -> (Arc<MemoryStore>, Arc<RecordingExporter>, TournamentManager) {
    let store = Arc::new(MemoryStore::new());
    let exporter = Arc::new(RecordingExporter::new());
    let manager = TournamentManager::new(
        Arc::clone(&store) as Arc<dyn TournamentStore>,
        Arc::new(StubGenerator::new(Arc::clone(&store))),
        Arc::clone(&exporter) as Arc<dyn ResultsExporter>,
    );
    (store, exporter, manager)
}

/// Roster of `count` pilots in seeding order
pub fn roster(count: i64) -> Vec<Pilot> {
    (1..=count)
        .map(|i| Pilot::new(i, format!("Pilot {i}")))
        .collect()
}
