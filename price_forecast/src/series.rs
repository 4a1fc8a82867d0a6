//! Cleaned, immutable price series

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ascending `(timestamp, value)` observations with no missing values.
///
/// Timestamps are strictly increasing and values finite; calendar gaps are
/// allowed. Once built the series is never mutated; every analysis returns a
/// new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Build a series, validating ordering and finiteness
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::InvalidSpec(format!(
                "Timestamps ({}) and values ({}) must have equal length",
                timestamps.len(),
                values.len()
            )));
        }

        if let Some(i) = timestamps.windows(2).position(|w| w[0] >= w[1]) {
            return Err(ForecastError::InvalidSpec(format!(
                "Timestamps must be strictly increasing: {} is followed by {}",
                timestamps[i],
                timestamps[i + 1]
            )));
        }

        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidSpec(format!(
                "Value at position {} is not finite: {}",
                i, values[i]
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Empty series
    pub fn empty() -> Self {
        Self {
            timestamps: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of the most recent observation
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }

    /// Iterate `(timestamp, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Error unless the series has at least one observation
    pub(crate) fn require_non_empty(&self, what: &str) -> Result<()> {
        if self.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "{} requires a non-empty series",
                what
            )));
        }
        Ok(())
    }
}
