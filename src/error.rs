use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("empty input: {0}")]
    EmptyInput(String),
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    #[error("invalid cost entry: {0}")]
    BadEntry(String),
    #[error("alternative cost must be finite and non-negative: {0}")]
    NonFiniteAlternativeCost(String),
    #[error("solver failed on a well-formed matrix: {0}")]
    Unsolvable(String),
    #[error("results queried before process() succeeded")]
    NotProcessed,
}
