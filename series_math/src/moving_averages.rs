//! Moving average calculations
//!
//! - [`SimpleMovingAverage`]: streaming trailing mean over a fixed window
//! - [`rolling_mean`]: the same mean evaluated at every position of a slice,
//!   with explicit `None` where no full window is available yet

use crate::{MathError, Result};
use std::collections::VecDeque;

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
        })
    }

    /// Push a new observation, evicting the oldest once the window is full
    pub fn update(&mut self, value: f64) {
        self.values.push_back(value);
        if self.values.len() > self.period {
            self.values.pop_front();
        }
    }

    /// Current trailing mean, or `None` until `period` values have been seen.
    ///
    /// The window is summed oldest-first on every call rather than kept as a
    /// running total, so the result matches a direct mean of the same slice
    /// exactly.
    pub fn value(&self) -> Option<f64> {
        if self.values.len() < self.period {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

/// Trailing mean of `window` values ending at each position of `values`.
///
/// The first `window - 1` positions are `None`. A window longer than the input
/// is not an error: every position is `None`.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>> {
    let mut sma = SimpleMovingAverage::new(window)?;

    Ok(values
        .iter()
        .map(|&value| {
            sma.update(value);
            sma.value()
        })
        .collect())
}
