//! Error types for algoscope-engine.

use algoscope_core::{ParseError, StructureError};
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running or mutating a visualization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A run is active; the requested operation must wait for it.
    #[error("a run is already in progress")]
    Busy,

    /// The run was reset or superseded while suspended at a checkpoint.
    #[error("run was cancelled")]
    Cancelled,

    /// User input could not be parsed or was out of range.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ParseError),

    /// Pop/dequeue on an empty structure or enqueue on a full one.
    #[error("{0}")]
    Structure(#[from] StructureError),

    /// The operation belongs to a different visualization than the active one.
    #[error("operation not available in {0} mode")]
    WrongMode(String),

    /// A step source could not produce records.
    #[error("step source unavailable: {0}")]
    SourceUnavailable(String),
}
