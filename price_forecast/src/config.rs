//! Configuration for preparation, trend analysis and forecasting
//!
//! Every struct has a `Default` matching the reference dashboard settings and
//! deserializes with missing fields falling back to those defaults, so a JSON
//! config only needs to name what it changes.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the raw dataset maps onto a series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepareConfig {
    /// Column holding the observation timestamps
    pub timestamp_column: String,
    /// Column holding the analyzed quantity
    pub value_column: String,
    /// Observations before this calendar year are discarded
    pub cutoff_year: i32,
}

impl Default for PrepareConfig {
    fn default() -> Self {
        Self {
            timestamp_column: "date".to_string(),
            value_column: "price".to_string(),
            cutoff_year: 2013,
        }
    }
}

impl PrepareConfig {
    /// Check that both column names are set
    pub fn validate(&self) -> Result<()> {
        if self.timestamp_column.trim().is_empty() {
            return Err(ForecastError::InvalidSpec(
                "Timestamp column name must not be empty".to_string(),
            ));
        }
        if self.value_column.trim().is_empty() {
            return Err(ForecastError::InvalidSpec(
                "Value column name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Non-seasonal ARIMA order `(p, d, q)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Autoregressive lags
    pub p: usize,
    /// Differencing degree
    pub d: usize,
    /// Moving-average lags
    pub q: usize,
}

impl Order {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

/// Seasonal order `(P, D, Q, s)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalOrder {
    /// Seasonal autoregressive lags
    pub p: usize,
    /// Seasonal differencing degree
    pub d: usize,
    /// Seasonal moving-average lags
    pub q: usize,
    /// Season length in observations
    pub period: usize,
}

impl SeasonalOrder {
    pub fn new(p: usize, d: usize, q: usize, period: usize) -> Self {
        Self { p, d, q, period }
    }

    /// No seasonal terms at the given period
    pub fn none(period: usize) -> Self {
        Self::new(0, 0, 0, period)
    }

    /// Whether any seasonal term is requested
    pub fn is_seasonal(&self) -> bool {
        self.p + self.d + self.q > 0
    }
}

/// Deterministic term of the differenced series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// No constant
    #[default]
    None,
    /// Constant mean of the differenced series (a drift once integrated)
    Constant,
}

/// Iterations granted per estimated coefficient when no budget is set
const ITERATIONS_PER_PARAMETER: usize = 5_000;

/// Floor of the automatic iteration budget
const MIN_ITERATIONS: usize = 10_000;

/// Optimizer limits and coefficient constraints for model fitting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Iteration budget for the optimizer. `None` scales the budget with the
    /// number of estimated coefficients.
    pub max_iterations: Option<usize>,
    /// Relative tolerance on the objective spread
    pub tolerance: f64,
    /// Restrict AR polynomials to the stationary region
    pub enforce_stationarity: bool,
    /// Restrict MA polynomials to the invertible region
    pub enforce_invertibility: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: 1e-8,
            enforce_stationarity: true,
            enforce_invertibility: true,
        }
    }
}

impl FitOptions {
    /// Iteration budget for a model with `parameters` coefficients
    pub fn iteration_budget(&self, parameters: usize) -> usize {
        self.max_iterations
            .unwrap_or_else(|| (ITERATIONS_PER_PARAMETER * parameters).max(MIN_ITERATIONS))
    }
}

/// Everything the forecast engine needs besides the series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSpec {
    /// Number of future daily steps
    pub horizon: usize,
    /// Non-seasonal order
    pub order: Order,
    /// Seasonal order and period
    pub seasonal_order: SeasonalOrder,
    /// Two-sided confidence level of the interval, in (0, 1)
    pub confidence_level: f64,
    /// Constant term
    pub trend: Trend,
    /// Optimizer limits
    pub fit: FitOptions,
}

impl Default for ForecastSpec {
    fn default() -> Self {
        Self {
            horizon: 180,
            order: Order::new(30, 1, 0),
            seasonal_order: SeasonalOrder::new(0, 1, 1, 30),
            confidence_level: 0.95,
            trend: Trend::None,
            fit: FitOptions::default(),
        }
    }
}

impl ForecastSpec {
    /// Fail fast on settings the model cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(ForecastError::InvalidSpec(
                "Forecast horizon must be positive".to_string(),
            ));
        }
        if self.seasonal_order.period == 0 {
            return Err(ForecastError::InvalidSpec(
                "Seasonal period must be positive".to_string(),
            ));
        }
        if self.seasonal_order.is_seasonal() && self.seasonal_order.period < 2 {
            return Err(ForecastError::InvalidSpec(format!(
                "Seasonal period must exceed 1 when seasonal terms are requested, got {}",
                self.seasonal_order.period
            )));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(ForecastError::InvalidSpec(format!(
                "Confidence level must be between 0 and 1 (exclusive), got {}",
                self.confidence_level
            )));
        }
        if self.fit.max_iterations == Some(0) {
            return Err(ForecastError::InvalidSpec(
                "Optimizer iteration budget must be positive".to_string(),
            ));
        }
        if !(self.fit.tolerance > 0.0) {
            return Err(ForecastError::InvalidSpec(
                "Optimizer tolerance must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Full analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Series preparation
    pub prepare: PrepareConfig,
    /// Moving-average window lengths
    pub windows: Vec<usize>,
    /// Forecast settings
    pub forecast: ForecastSpec,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            prepare: PrepareConfig::default(),
            windows: vec![30, 90, 180],
            forecast: ForecastSpec::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON configuration file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.prepare.validate()?;
        if let Some(zero) = self.windows.iter().find(|w| **w == 0) {
            return Err(ForecastError::InvalidSpec(format!(
                "Moving-average window must be positive, got {}",
                zero
            )));
        }
        self.forecast.validate()
    }
}
