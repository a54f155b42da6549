use thiserror::Error;

// Unified error type for linops

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("shape error: {0}")]
    Shape(String),
    #[error("domain error: {0}")]
    Domain(String),
    #[error("unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("decomposition error: {0}")]
    Decomposition(String),
    #[error("iteration did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },
}
