//! Generator port: the contract for stage generators the core does not
//! implement itself.
//!
//! Ranked fill, balanced random fill, ladder/bump-up, and the large bracket
//! templates are external collaborators. The orchestrator only names the
//! generator it wants through a closed [`GeneratorKind`] enumeration, hands
//! over sizing parameters, and consumes the resulting class through the
//! store port; it never inspects a generator's internal seeding.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::ClassId;

/// The fixed set of generators the orchestrator may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorKind {
    /// Fill heats from an input class's ranking, best seeds first
    RankedFill,
    /// Fill heats randomly while balancing heat strength
    BalancedRandomFill,
    /// Ladder / bump-up progression over an input ranking
    Ladder,
    /// Single-elimination bracket template
    BracketSingleElim,
    /// 16-competitor double-elimination bracket template
    BracketDoubleElim16,
    /// 8-competitor double-elimination bracket template
    BracketDoubleElim8,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeneratorKind::RankedFill => "ranked fill",
            GeneratorKind::BalancedRandomFill => "balanced random fill",
            GeneratorKind::Ladder => "ladder",
            GeneratorKind::BracketSingleElim => "single elimination bracket",
            GeneratorKind::BracketDoubleElim16 => "16 pilot double elimination bracket",
            GeneratorKind::BracketDoubleElim8 => "8 pilot double elimination bracket",
        };
        f.write_str(name)
    }
}

/// Sizing and wiring parameters for a generator invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateParams {
    /// Class whose ranking seeds the generated heats
    pub input_class: Option<ClassId>,
    /// Class to fill; `None` means "create a new class"
    pub output_class: Option<ClassId>,
    /// Qualifying heat size
    pub qualifiers_per_heat: Option<u32>,
    /// Number of pilots the generated stage covers
    pub num_pilots: Option<u32>,
    /// Ranks before this offset are skipped (already qualified elsewhere)
    pub seed_offset: Option<u32>,
    /// Pilots advancing out of each heat
    pub advances_per_heat: Option<u32>,
    /// Named seeding standard for bracket templates
    pub standard: Option<String>,
}

impl GenerateParams {
    /// Create empty parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the given class's ranking
    pub fn input_class(mut self, class: ClassId) -> Self {
        self.input_class = Some(class);
        self
    }

    /// Fill an existing class instead of creating a new one
    pub fn output_class(mut self, class: ClassId) -> Self {
        self.output_class = Some(class);
        self
    }

    /// Set the qualifying heat size
    pub fn qualifiers_per_heat(mut self, size: u32) -> Self {
        self.qualifiers_per_heat = Some(size);
        self
    }

    /// Set the number of pilots covered
    pub fn num_pilots(mut self, count: u32) -> Self {
        self.num_pilots = Some(count);
        self
    }

    /// Skip ranks at or below the offset
    pub fn seed_offset(mut self, offset: u32) -> Self {
        self.seed_offset = Some(offset);
        self
    }

    /// Set how many pilots advance out of each heat
    pub fn advances_per_heat(mut self, count: u32) -> Self {
        self.advances_per_heat = Some(count);
        self
    }

    /// Name the seeding standard for bracket templates
    pub fn standard(mut self, standard: impl Into<String>) -> Self {
        self.standard = Some(standard.into());
        self
    }
}

/// Generator port errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GeneratorError {
    /// The generator ran and failed
    #[error("Generator \"{kind}\" failed: {message}")]
    Failed {
        kind: GeneratorKind,
        message: String,
    },

    /// The collaborator does not provide this generator
    #[error("Generator \"{0}\" not available")]
    Unsupported(GeneratorKind),
}

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Port for invoking external stage generators.
///
/// Each call creates a fresh class (unless `output_class` is set) whose heats
/// are immediately queryable through the store port.
pub trait HeatGenerator: Send + Sync {
    /// Run a generator and return the class it produced or filled
    fn generate(&self, kind: GeneratorKind, params: &GenerateParams) -> GeneratorResult<ClassId>;
}
