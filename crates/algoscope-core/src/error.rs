//! Error types for algoscope-core.

use thiserror::Error;

/// Errors produced while parsing user input into structure values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing to parse.
    #[error("input is empty")]
    Empty,

    /// A token could not be read as a finite number.
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    /// A token could not be read as an integer.
    #[error("'{0}' is not a valid integer")]
    NotAnInteger(String),

    /// Too few values were supplied.
    #[error("please enter at least {min} valid numbers (got {got})")]
    TooFew { min: usize, got: usize },

    /// Too many values were supplied.
    #[error("at most {max} values are supported (got {got})")]
    TooMany { max: usize, got: usize },

    /// An index was outside the structure.
    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A size setting was outside its allowed bounds.
    #[error("size {value} must be between {min} and {max}")]
    SizeOutOfRange { value: usize, min: usize, max: usize },

    /// An algorithm name was not recognized.
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    /// An edge referenced a node that does not exist.
    #[error("unknown node '{0}'")]
    UnknownNode(String),
}

/// Structural violations detected before a mutation happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    /// Pop, dequeue or delete on an empty structure.
    #[error("{0} is empty")]
    Empty(&'static str),

    /// Enqueue on a full bounded queue.
    #[error("{0} is full")]
    Full(&'static str),
}
