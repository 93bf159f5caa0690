//! Error types for rollout construction and tooling

use thiserror::Error;

/// Core contagion errors
///
/// Infection runs never fail; these cover building a population and
/// the tooling around it.
#[derive(Error, Debug)]
pub enum ContagionError {
    // Roster errors
    #[error("Empty identifier on line {line}")]
    EmptyIdentifier { line: usize },

    // Registry errors
    #[error("Duplicate user: {0}")]
    DuplicateUser(String),

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Population too large: {0} users")]
    PopulationTooLarge(usize),

    // Tooling errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for contagion operations
pub type ContagionResult<T> = Result<T, ContagionError>;
