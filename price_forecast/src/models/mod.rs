//! Forecasting models and their shared result types

use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

/// One future step of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    /// Point estimate
    pub point: f64,
    /// Lower confidence bound
    pub lower: f64,
    /// Upper confidence bound
    pub upper: f64,
}

impl ForecastPoint {
    /// Width of the confidence band
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Goodness-of-fit summary of a trained model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitDiagnostics {
    /// Model label, e.g. `SARIMA(1,1,0)(0,1,1)[30]`
    pub model: String,
    /// Estimated coefficients by name (`const`, `ar.L1`, `ma.S.L30`, ...)
    pub coefficients: BTreeMap<String, f64>,
    /// Innovation variance
    pub sigma2: f64,
    /// Conditional log-likelihood at the optimum
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Observations contributing to the likelihood
    pub observations: usize,
    /// Optimizer iterations
    pub iterations: usize,
    /// Objective evaluations
    pub evaluations: usize,
}

/// Forecast over a future horizon with confidence bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    points: Vec<ForecastPoint>,
    confidence_level: f64,
    diagnostics: FitDiagnostics,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(
        points: Vec<ForecastPoint>,
        confidence_level: f64,
        diagnostics: FitDiagnostics,
    ) -> Result<Self> {
        if points.is_empty() {
            return Err(ForecastError::InvalidSpec(
                "A forecast needs at least one point".to_string(),
            ));
        }
        if let Some(p) = points.iter().find(|p| !(p.lower <= p.point && p.point <= p.upper)) {
            return Err(ForecastError::MathError(format!(
                "Forecast bounds do not bracket the point estimate at {}",
                p.timestamp
            )));
        }

        Ok(Self {
            points,
            confidence_level,
            diagnostics,
        })
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    /// Number of forecast steps
    pub fn horizon(&self) -> usize {
        self.points.len()
    }

    pub fn confidence_level(&self) -> f64 {
        self.confidence_level
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// Point estimates in step order
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.point).collect()
    }

    /// Confidence band widths in step order
    pub fn interval_widths(&self) -> Vec<f64> {
        self.points.iter().map(ForecastPoint::width).collect()
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Forecast `horizon` daily steps past the training data
    fn forecast(&self, horizon: usize, confidence_level: f64) -> Result<ForecastResult>;

    /// In-sample one-step-ahead predictions, aligned with the training series.
    /// `None` where the model has too little history to predict.
    fn fitted_values(&self) -> Vec<Option<f64>>;

    /// Fit summary
    fn diagnostics(&self) -> FitDiagnostics;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a price series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Estimate the model on `series`
    fn train(&self, series: &TimeSeries) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod sarima;

pub use sarima::{SarimaCoefficients, SarimaModel, TrainedSarima};
