//! Reference 8-competitor double-elimination bracket generator.
//!
//! Produces the fixed six-heat topology: two opening winner-bracket heats
//! seeded from the qualifier ranking, a lower bracket fed by their 3rd/4th
//! places, a winner semifinal fed by their 1st/2nd places, a second lower
//! round, and a final taking the top two of each side. The output is a DAG of
//! forward references; the final depends transitively on every other heat.

use crate::plan::{HeatPlan, SeedSource};

use super::errors::{BracketError, BracketResult};

/// Slots per race heat in the 8-competitor bracket
pub const RACE_HEAT_SIZE: usize = 4;

/// Heats in the 8-competitor bracket
pub const BRACKET_HEAT_COUNT: usize = 6;

/// Default qualifier ranks for the first opening heat.
///
/// Standard double-elimination seeding: the top two seeds are separated into
/// different opening heats and strong seeds are paired with weak ones.
pub const DEFAULT_RACE1_SEEDS: [u32; RACE_HEAT_SIZE] = [1, 8, 4, 5];

/// Default qualifier ranks for the second opening heat
pub const DEFAULT_RACE2_SEEDS: [u32; RACE_HEAT_SIZE] = [2, 7, 3, 6];

/// Human-readable generator label presented by outer layers
pub const GENERATOR_LABEL: &str = "8 Pilot Double Elimination Bracket";

/// Default heat names, bracket role embedded after the dash
pub fn default_heat_names() -> Vec<String> {
    [
        "Race 1 - Winner Bracket",
        "Race 2 - Winner Bracket",
        "Race 3 - Lower Bracket",
        "Race 4 - Winner Bracket",
        "Race 5 - Lower Bracket",
        "Race 6 - Final",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Generate the six heat plans of an 8-competitor double-elimination bracket.
///
/// # Arguments
///
/// * `pool` - Name of the qualifier ranking pool the opening heats seed from
/// * `race1_seeds` - Four distinct qualifier ranks for the first opening heat
/// * `race2_seeds` - Four distinct qualifier ranks for the second opening heat
/// * `heat_names` - At least six heat names, used in bracket order
///
/// # Returns
///
/// * `BracketResult<Vec<HeatPlan>>` - Exactly six plans of four slots each
///
/// Pure and total given well-formed inputs: the same arguments always produce
/// the same topology, and the wiring is independent of call order.
pub fn double_elim_8(
    pool: &str,
    race1_seeds: &[u32],
    race2_seeds: &[u32],
    heat_names: &[String],
) -> BracketResult<Vec<HeatPlan>> {
    validate_seed_list("race 1 qualifiers", race1_seeds)?;
    validate_seed_list("race 2 qualifiers", race2_seeds)?;
    if heat_names.len() < BRACKET_HEAT_COUNT {
        return Err(BracketError::InvalidHeatNames {
            expected: BRACKET_HEAT_COUNT,
            actual: heat_names.len(),
        });
    }

    let (h1, h2, h3, h4, h5, h6) = (
        heat_names[0].as_str(),
        heat_names[1].as_str(),
        heat_names[2].as_str(),
        heat_names[3].as_str(),
        heat_names[4].as_str(),
        heat_names[5].as_str(),
    );

    let heats = vec![
        // Opening winner-bracket heats, seeded straight from the pool
        HeatPlan::new(
            h1,
            race1_seeds.iter().map(|&r| SeedSource::input(pool, r)).collect(),
        ),
        HeatPlan::new(
            h2,
            race2_seeds.iter().map(|&r| SeedSource::input(pool, r)).collect(),
        ),
        // Lower bracket: 3rd/4th of each opening heat
        HeatPlan::new(
            h3,
            vec![
                SeedSource::heat(h1, 3),
                SeedSource::heat(h1, 4),
                SeedSource::heat(h2, 3),
                SeedSource::heat(h2, 4),
            ],
        ),
        // Winner semifinal: 1st/2nd of each opening heat
        HeatPlan::new(
            h4,
            vec![
                SeedSource::heat(h1, 1),
                SeedSource::heat(h1, 2),
                SeedSource::heat(h2, 1),
                SeedSource::heat(h2, 2),
            ],
        ),
        // Second lower round: lower-bracket survivors meet the semifinal drop-downs
        HeatPlan::new(
            h5,
            vec![
                SeedSource::heat(h3, 1),
                SeedSource::heat(h3, 2),
                SeedSource::heat(h4, 3),
                SeedSource::heat(h4, 4),
            ],
        ),
        // Final: top two of the winner semifinal and of the last lower round
        HeatPlan::new(
            h6,
            vec![
                SeedSource::heat(h4, 1),
                SeedSource::heat(h4, 2),
                SeedSource::heat(h5, 1),
                SeedSource::heat(h5, 2),
            ],
        ),
    ];

    Ok(heats)
}

fn validate_seed_list(group: &'static str, seeds: &[u32]) -> BracketResult<()> {
    let mut distinct: Vec<u32> = seeds.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if seeds.len() != RACE_HEAT_SIZE || distinct.len() != RACE_HEAT_SIZE {
        return Err(BracketError::InvalidSeedList {
            group,
            expected: RACE_HEAT_SIZE,
            actual: seeds.to_vec(),
        });
    }
    Ok(())
}
