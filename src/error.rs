//! Error types for roster generation

use thiserror::Error;

/// Main error type for roster operations
#[derive(Debug, Error)]
pub enum RosterError {
    /// The scheduling universe is malformed or degenerate
    #[error("Invalid problem definition: {0}")]
    InvalidProblemDefinition(String),

    /// No feasible initial roster was found within the retry limit
    #[error("No valid random solution found after {attempts} attempts")]
    ConstructionExhausted { attempts: usize },

    /// No selection of cells can be rotated without breaking slot uniqueness
    #[error("No valid {arity}-cell swap exists in the current roster")]
    NoValidSwap { arity: usize },

    /// The request payload could not be turned into a problem definition
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, RosterError>;
