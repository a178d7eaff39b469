//! Error types for grid-world model construction.

use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid grid value: symbol '{symbol}' not found on the map")]
    InvalidGridValue { symbol: char },

    #[error("invalid map value: symbol '{symbol}' at ({row}, {col})")]
    InvalidMapValue { symbol: char, row: usize, col: usize },

    #[error("invalid map shape: {message}")]
    InvalidMapShape { message: String },

    #[error("configuration has no actions")]
    NoActions,

    #[error("no outcomes for state {state}, action {action}")]
    InvalidStateAction { state: usize, action: usize },

    #[error("outcomes for state {state}, action {action} sum to {total}, expected 1.0")]
    ProbabilityMass {
        state: usize,
        action: usize,
        total: f64,
    },

    #[error("cannot sample outcome: {0}")]
    Sampling(#[from] rand::distributions::WeightedError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
