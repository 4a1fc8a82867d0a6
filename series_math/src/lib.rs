//! # Series Math
//!
//! Numeric building blocks for price-series analysis.
//! Everything in this crate works on plain `f64` slices so the domain layer
//! can stay in charge of timestamps and configuration.

use thiserror::Error;

pub mod deviation;
pub mod forecasting;
pub mod moving_averages;
pub mod optimize;
pub mod polynomial;
pub mod statistics;

pub use deviation::deviation_index;
pub use forecasting::{
    autocorrelation, constrain_stationary, levinson_durbin, unconstrain_stationary, yule_walker,
};
pub use moving_averages::{rolling_mean, SimpleMovingAverage};
pub use optimize::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use polynomial::{psi_weights, LagPolynomial};
pub use statistics::{describe, mean, percentile, Summary};

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Division by zero: {0}")]
    DivisionByZero(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
