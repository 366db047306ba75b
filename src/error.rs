//! Error types.
//!
//! The probability core never fails: unknown units, bad numbers and
//! overlapping steps all resolve to documented defaults. Errors only come
//! from the edges: parsing banner JSON, writing CSV, and explicit
//! validation of a banner configuration.

use crate::id::{StepId, UnitId};
use thiserror::Error;

/// Errors raised while loading, validating or exporting banner data.
///
/// # Examples
///
/// ```rust
/// use sugostat::{BannerError, StepId, UnitId};
///
/// let err = BannerError::DuplicateOverride {
///     unit: UnitId::new("unit_1"),
///     step: StepId::new("step_1"),
/// };
/// assert!(err.to_string().contains("unit_1"));
/// ```
#[derive(Debug, Error)]
pub enum BannerError {
    /// Banner or setup JSON could not be parsed or produced.
    #[error("Invalid banner JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV record could not be written.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV writer could not be flushed.
    #[error("CSV export failed: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A unit carries more than one override for the same step.
    #[error("Unit {unit} has more than one override for step {step}")]
    DuplicateOverride { unit: UnitId, step: StepId },

    /// Two steps claim the same multi index.
    #[error("Multi {multi} is claimed by both step {first} and step {second}")]
    OverlappingSteps {
        multi: u32,
        first: StepId,
        second: StepId,
    },

    /// An override references a step the banner does not define.
    #[error("Unit {unit} overrides unknown step {step}")]
    UnknownStep { unit: UnitId, step: StepId },

    /// An analysis references a unit the banner does not define.
    #[error("Analysis {analysis} references unknown unit {unit}")]
    UnknownUnit { analysis: String, unit: UnitId },

    /// A custom group has no usable constituents.
    #[error("Custom group {0} has no constituents")]
    EmptyGroup(String),

    /// The banner horizon is not a positive integer.
    #[error("Invalid multi horizon: {0}")]
    InvalidHorizon(String),
}
