//! Export port: option wiring for the external results exporter.
//!
//! The export format itself is an external collaborator; the core's only
//! responsibility is to hand it the right classes. Options travel in an
//! explicit [`ExportOptions`] struct passed to the call, so no shared option
//! keys are mutated behind the caller's back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::ClassId;

/// Classes an export run covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Qualifier stage class
    pub qualifier_class: ClassId,
    /// Final bracket class
    pub final_class: ClassId,
    /// Placement ("small final") class, when the tournament has one
    pub small_final_class: Option<ClassId>,
    /// Whether the exporter should render the small-final feature
    pub include_small_final: bool,
}

impl ExportOptions {
    /// Options for a tournament without a placement stage
    pub fn new(qualifier_class: ClassId, final_class: ClassId) -> Self {
        Self {
            qualifier_class,
            final_class,
            small_final_class: None,
            include_small_final: false,
        }
    }

    /// Include a placement stage and turn the small-final feature on
    pub fn with_small_final(mut self, class: ClassId) -> Self {
        self.small_final_class = Some(class);
        self.include_small_final = true;
        self
    }
}

/// Export port errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    /// No export profile registered under the given name
    #[error("Unknown export profile: {0}")]
    UnknownProfile(String),

    /// The export job ran and failed
    #[error("Export failed: {0}")]
    Failed(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Port for triggering the external export job
pub trait ResultsExporter: Send + Sync {
    /// Run the named export profile over the given classes
    fn export(&self, profile: &str, options: &ExportOptions) -> ExportResult<()>;
}
