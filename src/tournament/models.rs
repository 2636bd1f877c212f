//! Tournament configuration and summary models.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::ClassId;

use super::errors::{TournamentError, TournamentResult};

/// Class attribute linking a stage class to its tournament.
///
/// The `{tournament name, stage type}` attribute pair is the only persisted
/// linkage between a tournament and its classes; there is no join table and
/// no numeric tournament id.
pub const ATTR_TOURNAMENT: &str = "tournament.name";

/// Class attribute holding the stage type
pub const ATTR_STAGE: &str = "tournament.stage";

/// Class attribute on the final class holding the stored bracket kind
pub const ATTR_BRACKET: &str = "tournament.bracket";

/// Class attribute holding the build timestamp (RFC 3339)
pub const ATTR_CREATED_AT: &str = "tournament.created_at";

/// Class attribute on the final class holding the export timestamp (RFC 3339)
pub const ATTR_EXPORTED_AT: &str = "tournament.exported_at";

/// Class attribute holding the build settings as JSON
pub const ATTR_SETTINGS: &str = "tournament.settings";

/// Stage types, in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Roster shakedown before anything counts
    FreePractice,
    /// Ranked qualifying heats
    Qualifier,
    /// The elimination bracket
    Final,
    /// "Small final" for pilots outside the bracket, feeding the promotion
    /// rewrite
    Placement,
}

impl StageType {
    /// Attribute value for this stage
    pub fn as_str(&self) -> &'static str {
        match self {
            StageType::FreePractice => "free_practice",
            StageType::Qualifier => "qualifier",
            StageType::Final => "final",
            StageType::Placement => "placement",
        }
    }

    /// Parse an attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "free_practice" => Some(StageType::FreePractice),
            "qualifier" => Some(StageType::Qualifier),
            "final" => Some(StageType::Final),
            "placement" => Some(StageType::Placement),
            _ => None,
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageType::FreePractice => "free practice",
            StageType::Qualifier => "qualifier",
            StageType::Final => "final",
            StageType::Placement => "placement",
        };
        f.write_str(name)
    }
}

/// Bracket kind of a tournament's final stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BracketKind {
    /// No bracket recorded
    None,
    /// 8-competitor double elimination
    DoubleElim8,
    /// 16-competitor double elimination
    DoubleElim16,
}

impl BracketKind {
    /// Attribute value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketKind::None => "none",
            BracketKind::DoubleElim8 => "double_elim_8",
            BracketKind::DoubleElim16 => "double_elim_16",
        }
    }

    /// Parse an attribute value; unknown values read as [`BracketKind::None`]
    pub fn parse(value: &str) -> Self {
        match value {
            "double_elim_8" => BracketKind::DoubleElim8,
            "double_elim_16" => BracketKind::DoubleElim16,
            _ => BracketKind::None,
        }
    }
}

/// Tournament build settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSettings {
    /// Free-practice heat size (3 to 6)
    pub free_heat_size: u32,
    /// Qualifying heat size (3 to 6)
    pub qual_heat_size: u32,
    /// Final bracket capacity (8 or 16)
    pub final_bracket_size: u32,
    /// Pilots advancing out of each placement heat (1 to 4)
    pub num_advance: u32,
    /// Placement heat size (2 to 6, strictly above `num_advance`)
    pub final_heat_size: u32,
}

impl Default for TournamentSettings {
    fn default() -> Self {
        Self {
            free_heat_size: 4,
            qual_heat_size: 4,
            final_bracket_size: 8,
            num_advance: 2,
            final_heat_size: 4,
        }
    }
}

impl TournamentSettings {
    /// Validate every field, reporting the first offending one.
    ///
    /// Runs before any stage is created; a failure leaves no state behind.
    pub fn validate(&self) -> TournamentResult<()> {
        if !(3..=6).contains(&self.free_heat_size) {
            return Err(invalid(
                "free_heat_size",
                format!("{} is outside 3..=6", self.free_heat_size),
            ));
        }
        if !(3..=6).contains(&self.qual_heat_size) {
            return Err(invalid(
                "qual_heat_size",
                format!("{} is outside 3..=6", self.qual_heat_size),
            ));
        }
        if self.final_bracket_size != 8 && self.final_bracket_size != 16 {
            return Err(invalid(
                "final_bracket_size",
                format!("{} is not 8 or 16", self.final_bracket_size),
            ));
        }
        if !(1..=4).contains(&self.num_advance) {
            return Err(invalid(
                "num_advance",
                format!("{} is outside 1..=4", self.num_advance),
            ));
        }
        if !(2..=6).contains(&self.final_heat_size) {
            return Err(invalid(
                "final_heat_size",
                format!("{} is outside 2..=6", self.final_heat_size),
            ));
        }
        if self.num_advance >= self.final_heat_size {
            return Err(invalid(
                "num_advance",
                format!(
                    "{} must be below final_heat_size {}",
                    self.num_advance, self.final_heat_size
                ),
            ));
        }
        Ok(())
    }

    /// Ranks considered already qualified for the bracket before the
    /// placement stage runs
    pub fn already_qualified(&self) -> u32 {
        self.final_bracket_size - 2
    }
}

fn invalid(field: &'static str, reason: String) -> TournamentError {
    TournamentError::InvalidConfiguration { field, reason }
}

/// Stage classes of a freshly built tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltTournament {
    /// Tournament name, the external key for every later operation
    pub name: String,
    /// Created stage classes, in chain order
    pub stages: BTreeMap<StageType, ClassId>,
}

/// One stage in a tournament listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub class_id: ClassId,
    pub class_name: String,
    pub heat_count: usize,
}

/// Tournament listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub name: String,
    /// Read from the stored bracket attribute, never inferred from heat counts
    pub bracket_kind: BracketKind,
    pub stages: BTreeMap<StageType, StageSummary>,
    pub created_at: Option<DateTime<Utc>>,
    pub exported_at: Option<DateTime<Utc>>,
    pub settings: Option<TournamentSettings>,
}
