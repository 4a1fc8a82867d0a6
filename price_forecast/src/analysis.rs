//! Descriptive statistics, rolling trends and the deviation index
//!
//! The three engines are independent readers of a prepared [`TimeSeries`];
//! each returns its own snapshot.

use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use chrono::{DateTime, Utc};
use serde::Serialize;
use series_math::Summary;
use std::collections::BTreeMap;

/// Summary statistics of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `NaN` for a single observation
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStatistics {
    /// Keys of [`to_map`](Self::to_map), in output order
    pub const KEYS: [&'static str; 8] = ["count", "mean", "std", "min", "p25", "p50", "p75", "max"];

    /// Fixed-key view for presentation layers
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let values = [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ];
        Self::KEYS.iter().copied().zip(values).collect()
    }
}

impl From<Summary> for SummaryStatistics {
    fn from(summary: Summary) -> Self {
        Self {
            count: summary.count,
            mean: summary.mean,
            std: summary.std,
            min: summary.min,
            p25: summary.p25,
            p50: summary.p50,
            p75: summary.p75,
            max: summary.max,
        }
    }
}

/// Computes [`SummaryStatistics`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, series: &TimeSeries) -> Result<SummaryStatistics> {
        series.require_non_empty("Summary statistics")?;
        Ok(series_math::describe(series.values())?.into())
    }
}

/// One point of a smoothed series; `value` is `None` until the window fills
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Rolling mean of a series at one window length
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
    pub window: usize,
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    /// Values only, aligned with the source series
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }
}

/// Rolling trend computation for a set of windows
#[derive(Debug, Clone)]
pub struct TrendEngine {
    windows: Vec<usize>,
}

impl TrendEngine {
    /// Create an engine; every window must be positive
    pub fn new(windows: Vec<usize>) -> Result<Self> {
        if windows.iter().any(|w| *w == 0) {
            return Err(ForecastError::InvalidSpec(
                "Moving-average windows must be positive".to_string(),
            ));
        }
        Ok(Self { windows })
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
    }

    /// Rolling means keyed by window length
    pub fn compute(&self, series: &TimeSeries) -> Result<BTreeMap<usize, TrendSeries>> {
        series.require_non_empty("Trend computation")?;

        self.windows
            .iter()
            .map(|&window| Ok((window, Self::rolling(series, window)?)))
            .collect()
    }

    /// Rolling mean for a single window
    pub fn rolling(series: &TimeSeries, window: usize) -> Result<TrendSeries> {
        let means = series_math::rolling_mean(series.values(), window)?;
        let points = series
            .timestamps()
            .iter()
            .zip(means)
            .map(|(&timestamp, value)| TrendPoint { timestamp, value })
            .collect();

        Ok(TrendSeries { window, points })
    }
}

/// One point of the deviation index
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndexPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// `(mean - value) / mean` for every observation; positive means cheaper
/// than average
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviationIndexEngine;

impl DeviationIndexEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, series: &TimeSeries) -> Result<Vec<IndexPoint>> {
        series.require_non_empty("Deviation index")?;

        let index = series_math::deviation_index(series.values())?;
        Ok(series
            .timestamps()
            .iter()
            .zip(index)
            .map(|(&timestamp, value)| IndexPoint { timestamp, value })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn series(values: &[f64]) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let timestamps = (0..values.len() as i64)
            .map(|d| start + Duration::days(d))
            .collect();
        TimeSeries::new(timestamps, values.to_vec()).unwrap()
    }

    #[test]
    fn test_statistics_map_has_fixed_keys() {
        let stats = StatisticsCalculator::new()
            .compute(&series(&[1.0, 2.0, 3.0, 4.0]))
            .unwrap();
        let map = stats.to_map();

        assert_eq!(map.len(), 8);
        assert_eq!(map["count"], 4.0);
        assert_eq!(map["mean"], 2.5);
        assert_eq!(map["p50"], 2.5);
    }

    #[test]
    fn test_trend_points_carry_timestamps() {
        let s = series(&[10.0, 20.0, 30.0, 40.0]);
        let trend = TrendEngine::rolling(&s, 2).unwrap();

        assert_eq!(trend.values(), vec![None, Some(15.0), Some(25.0), Some(35.0)]);
        assert_eq!(trend.points[3].timestamp, s.timestamps()[3]);
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(matches!(
            TrendEngine::new(vec![30, 0]),
            Err(ForecastError::InvalidSpec(_))
        ));
    }
}
