//! Bracket topologies the crate computes itself.
//!
//! The only bracket the core supplies is the reference 8-competitor
//! double-elimination topology; larger templates are delegated to the
//! generator port.

pub mod double_elim;
pub mod errors;

pub use double_elim::{
    BRACKET_HEAT_COUNT, DEFAULT_RACE1_SEEDS, DEFAULT_RACE2_SEEDS, GENERATOR_LABEL, RACE_HEAT_SIZE,
    default_heat_names, double_elim_8,
};
pub use errors::{BracketError, BracketResult};
