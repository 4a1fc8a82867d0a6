//! Error types for the price_forecast crate

use polars::prelude::PolarsError;
use series_math::MathError;
use thiserror::Error;

/// Custom error types for the price_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// A timestamp cell could not be parsed
    #[error("Malformed timestamp at row {row}: '{value}'")]
    MalformedTimestamp { row: usize, value: String },

    /// A price cell holds text that is neither a number nor a missing marker
    #[error("Malformed value at row {row}: '{value}'")]
    MalformedValue { row: usize, value: String },

    /// A configured column is absent from the dataset
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// Series too short or empty for the requested operation
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Degenerate zero-mean series
    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    /// Caller-supplied configuration violates a precondition
    #[error("Invalid specification: {0}")]
    InvalidSpec(String),

    /// Model fitting did not converge
    #[error("Model fit did not converge after {iterations} iterations (objective {objective}): {reason}")]
    ConvergenceFailure {
        iterations: usize,
        objective: f64,
        reason: String,
    },

    /// Numeric failure with no better classification
    #[error("Math error: {0}")]
    MathError(String),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),

    /// Error reading or writing JSON/CSV artifacts
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::SerializationError(err.to_string())
    }
}

impl From<MathError> for ForecastError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::InsufficientData(msg) => ForecastError::InsufficientData(msg),
            MathError::InvalidInput(msg) => ForecastError::InvalidSpec(msg),
            MathError::DivisionByZero(msg) => ForecastError::DivisionByZero(msg),
            MathError::CalculationError(msg) => ForecastError::MathError(msg),
        }
    }
}
