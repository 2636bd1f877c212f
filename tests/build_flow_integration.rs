//! Integration tests for the full tournament build chain.
//!
//! These tests drive the manager end to end over the in-memory store, with a
//! stub generator standing in for the external ranked-fill, ladder, and
//! 16-pilot bracket collaborators.

mod common;

use common::{roster, setup};

use raceplan::plan::{HeatRef, PlanError, PoolSet, SeedSource};
use raceplan::tournament::{
    BracketKind, StageType, TournamentError, TournamentSettings, ATTR_TOURNAMENT,
};
use raceplan::TournamentStore;

fn settings_16() -> TournamentSettings {
    TournamentSettings {
        final_bracket_size: 16,
        ..Default::default()
    }
}

#[test]
fn test_small_roster_builds_three_stages() {
    let (store, _, manager) = setup();

    let built = manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("8 pilots fit the bracket");

    assert_eq!(built.name, "Club Night");
    assert!(built.stages.contains_key(&StageType::FreePractice));
    assert!(built.stages.contains_key(&StageType::Qualifier));
    assert!(built.stages.contains_key(&StageType::Final));
    // The whole roster fits the bracket, so there is nothing to place
    assert!(!built.stages.contains_key(&StageType::Placement));

    let final_class = built.stages[&StageType::Final];
    let heats = store.heats_by_class(final_class).expect("final heats");
    assert_eq!(heats.len(), 6);

    // No slot may reference a placement class
    for heat in &heats {
        for slot in store.slots_by_heat(heat.id).expect("slots") {
            assert!(
                !matches!(
                    slot.source,
                    SeedSource::HeatResult {
                        source: HeatRef::ClassRank(_),
                        ..
                    }
                ),
                "slot {} of {} references a class ranking",
                slot.index,
                heat.name
            );
        }
    }
}

#[test]
fn test_bracket_heats_get_short_display_names() {
    let (store, _, manager) = setup();

    let built = manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("build");

    let heats = store
        .heats_by_class(built.stages[&StageType::Final])
        .expect("final heats");
    let first = &heats[0];
    assert_eq!(first.name, "Club Night Race 1 - Winner Bracket");
    assert_eq!(first.display_name, "Club Night Race 1");
    // Reference names stay stable even after the display rename
    assert!(heats.iter().all(|h| h.name.contains('-')));
}

#[test]
fn test_dashed_tournament_name_keeps_race_labels_in_display_names() {
    let (store, _, manager) = setup();

    let built = manager
        .build("Club-Night", &roster(8), &TournamentSettings::default())
        .expect("dashed names are legal");

    let displays: Vec<String> = store
        .heats_by_class(built.stages[&StageType::Final])
        .expect("final heats")
        .into_iter()
        .map(|h| h.display_name)
        .collect();
    let expected: Vec<String> = (1..=6).map(|n| format!("Club-Night Race {n}")).collect();
    assert_eq!(displays, expected);
}

#[test]
fn test_rebuild_after_delete_starts_with_no_results() {
    let (store, _, manager) = setup();

    manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("first build");
    store
        .record_heat_results("Club Night Race 1 - Winner Bracket", &[1, 2, 3, 4])
        .expect("record opening heat");

    manager.delete("Club Night").expect("delete");
    let built = manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("rebuild under the same name");

    // The rebuilt bracket has not raced; none of its forward references may
    // resolve against the dead tournament's results
    for heat in store
        .heats_by_class(built.stages[&StageType::Final])
        .expect("final heats")
    {
        for slot in store.slots_by_heat(heat.id).expect("slots") {
            if let SeedSource::HeatResult { .. } = &slot.source {
                let err = slot
                    .source
                    .resolve(&PoolSet::new(), store.as_ref())
                    .expect_err("no results recorded yet");
                assert!(matches!(err, PlanError::UnresolvedReference(_)));
            }
        }
    }
}

#[test]
fn test_large_roster_adds_placement_and_rewrites_two_slots() {
    let (store, _, manager) = setup();

    let built = manager
        .build("Regional Open", &roster(20), &settings_16())
        .expect("20 pilots over a 16 bracket");

    let placement = built.stages[&StageType::Placement];
    let placement_name = store
        .all_classes()
        .expect("classes")
        .into_iter()
        .find(|c| c.id == placement)
        .expect("placement class")
        .name;

    let mut promoted = Vec::new();
    let mut input_ranks = Vec::new();
    for heat in store
        .heats_by_class(built.stages[&StageType::Final])
        .expect("final heats")
    {
        for slot in store.slots_by_heat(heat.id).expect("slots") {
            match &slot.source {
                SeedSource::HeatResult {
                    source: HeatRef::ClassRank(class),
                    position,
                } => promoted.push((class.clone(), *position)),
                SeedSource::InputRank { rank, .. } => input_ranks.push(*rank),
                SeedSource::HeatResult { .. } => {}
            }
        }
    }

    // Exactly the two reserved slots were rebound, to placement ranks 1 and 2
    promoted.sort();
    assert_eq!(
        promoted,
        vec![(placement_name.clone(), 1), (placement_name, 2)]
    );

    // Ranks 15 and 16 are gone from the bracket; ranks 1..=14 survive
    input_ranks.sort_unstable();
    assert_eq!(input_ranks, (1..=14).collect::<Vec<u32>>());
}

#[test]
fn test_placement_stage_covers_the_overflow_ranks() {
    let (store, _, manager) = setup();

    let built = manager
        .build("Regional Open", &roster(20), &settings_16())
        .expect("build");

    // 20 pilots, 14 already qualified: the placement stage races ranks 15..=20
    let mut ranks = Vec::new();
    for heat in store
        .heats_by_class(built.stages[&StageType::Placement])
        .expect("placement heats")
    {
        for slot in store.slots_by_heat(heat.id).expect("slots") {
            if let SeedSource::InputRank { rank, .. } = slot.source {
                ranks.push(rank);
            }
        }
    }
    ranks.sort_unstable();
    assert_eq!(ranks, (15..=20).collect::<Vec<u32>>());
}

#[test]
fn test_duplicate_name_is_rejected_without_side_effects() {
    let (store, _, manager) = setup();

    manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("first build");
    let classes_before = store.all_classes().expect("classes").len();

    let err = manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect_err("same name twice");
    assert!(matches!(err, TournamentError::DuplicateTournament(name) if name == "Club Night"));
    assert_eq!(store.all_classes().expect("classes").len(), classes_before);
}

#[test]
fn test_delete_removes_every_stage_class() {
    let (store, _, manager) = setup();

    manager
        .build("Regional Open", &roster(20), &settings_16())
        .expect("build");
    manager.delete("Regional Open").expect("delete");

    for class in store.all_classes().expect("classes") {
        assert_ne!(
            store
                .class_attribute(class.id, ATTR_TOURNAMENT)
                .expect("attribute"),
            Some("Regional Open".to_string())
        );
    }
    let err = manager.delete("Regional Open").expect_err("already gone");
    assert!(matches!(err, TournamentError::TournamentNotFound(_)));
}

#[test]
fn test_list_reports_stages_and_stored_bracket_kind() {
    let (_, _, manager) = setup();

    manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("bracket of 8");
    manager
        .build("Regional Open", &roster(20), &settings_16())
        .expect("bracket of 16");

    let summaries = manager.list().expect("list");
    assert_eq!(summaries.len(), 2);

    let club = summaries
        .iter()
        .find(|s| s.name == "Club Night")
        .expect("club night listed");
    assert_eq!(club.bracket_kind, BracketKind::DoubleElim8);
    assert_eq!(club.stages.len(), 3);
    assert_eq!(club.stages[&StageType::Final].heat_count, 6);
    assert_eq!(club.stages[&StageType::FreePractice].heat_count, 2);
    assert!(club.created_at.is_some());
    assert!(club.exported_at.is_none());
    assert_eq!(
        club.settings.as_ref().expect("settings stored"),
        &TournamentSettings::default()
    );

    let regional = summaries
        .iter()
        .find(|s| s.name == "Regional Open")
        .expect("regional listed");
    assert_eq!(regional.bracket_kind, BracketKind::DoubleElim16);
    assert_eq!(regional.stages.len(), 4);
    assert_eq!(regional.stages[&StageType::Final].heat_count, 14);
}

#[test]
fn test_export_wires_stage_classes_and_stamps_timestamp() {
    let (_, exporter, manager) = setup();

    let built = manager
        .build("Regional Open", &roster(20), &settings_16())
        .expect("build");
    manager
        .export("Regional Open", "standings")
        .expect("export");

    let calls = exporter.calls();
    assert_eq!(calls.len(), 1);
    let (profile, options) = &calls[0];
    assert_eq!(profile, "standings");
    assert_eq!(options.qualifier_class, built.stages[&StageType::Qualifier]);
    assert_eq!(options.final_class, built.stages[&StageType::Final]);
    assert_eq!(
        options.small_final_class,
        Some(built.stages[&StageType::Placement])
    );
    assert!(options.include_small_final);

    let summaries = manager.list().expect("list");
    assert!(summaries[0].exported_at.is_some());
}

#[test]
fn test_export_without_placement_leaves_small_final_off() {
    let (_, exporter, manager) = setup();

    manager
        .build("Club Night", &roster(8), &TournamentSettings::default())
        .expect("build");
    manager.export("Club Night", "standings").expect("export");

    let calls = exporter.calls();
    let (_, options) = &calls[0];
    assert!(options.small_final_class.is_none());
    assert!(!options.include_small_final);
}
