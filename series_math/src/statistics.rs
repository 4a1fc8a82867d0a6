//! Descriptive statistics over a slice of observations

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Summary of a series: count, moments, extremes and quartiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of observations
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    /// Minimum value
    pub min: f64,
    /// 25th percentile
    pub p25: f64,
    /// Median
    pub p50: f64,
    /// 75th percentile
    pub p75: f64,
    /// Maximum value
    pub max: f64,
}

/// Arithmetic mean computed as `sum / len`
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute the mean of an empty series".to_string(),
        ));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentile of already sorted data using linear interpolation between
/// order statistics (rank `q * (n - 1)`).
///
/// `q` is a fraction in `[0, 1]`.
pub fn percentile(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot compute a percentile of an empty series".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&q) {
        return Err(MathError::InvalidInput(format!(
            "Percentile fraction must be within [0, 1], got {}",
            q
        )));
    }

    let rank = q * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    Ok(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Compute the [`Summary`] of `values`.
///
/// The standard deviation of a single observation is `NaN`.
pub fn describe(values: &[f64]) -> Result<Summary> {
    let mean = mean(values)?;

    if values.iter().any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Series contains non-finite values".to_string(),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    Ok(Summary {
        count: values.len(),
        mean,
        std: values.iter().std_dev(),
        min: sorted[0],
        p25: percentile(&sorted, 0.25)?,
        p50: percentile(&sorted, 0.50)?,
        p75: percentile(&sorted, 0.75)?,
        max: sorted[sorted.len() - 1],
    })
}
