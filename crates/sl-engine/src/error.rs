//! Error types for ScratchLab

use thiserror::Error;

/// Engine error type
///
/// Every variant is unrecoverable within the engine: a failed check aborts
/// the round evaluation, there is no retry or partial-result path.
#[derive(Error, Debug)]
pub enum SlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Board generation error: {0}")]
    BoardGeneration(String),

    #[error("Reward calculation error: {0}")]
    RewardCalculation(String),

    #[error("Missing input: {0}")]
    InputContract(String),
}

/// Result type alias
pub type SlResult<T> = Result<T, SlError>;
