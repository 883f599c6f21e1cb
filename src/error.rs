//! Error types for Kaltrack

use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("unknown workout type: {tag}")]
    UnknownWorkoutType { tag: String },

    #[error("wrong parameter count for {tag}: expected {expected}, got {actual}")]
    ParameterCountMismatch {
        tag: String,
        expected: usize,
        actual: usize,
    },

    #[error("parameter {name} out of range for {tag}: {value}")]
    ParameterOutOfRange {
        tag: String,
        name: &'static str,
        value: f64,
    },

    /// Safety net for a calorie model without a formula. Unreachable once all
    /// three workout variants are implemented.
    #[error("calorie formula not implemented for {kind}")]
    UnimplementedFormula { kind: String },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Failed to parse packet: {0}")]
    ParseError(String),
}
