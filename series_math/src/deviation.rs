//! Normalized deviation from the series-wide mean

use crate::statistics::mean;
use crate::{MathError, Result};

/// `(mean - value) / mean` for every observation.
///
/// The mean is taken over the whole slice, so every element depends on every
/// other one. Positive values sit below the mean.
pub fn deviation_index(values: &[f64]) -> Result<Vec<f64>> {
    let m = mean(values)?;

    if m == 0.0 {
        return Err(MathError::DivisionByZero(
            "Series mean is zero; the deviation index is undefined".to_string(),
        ));
    }

    Ok(values.iter().map(|v| (m - v) / m).collect())
}
