//! Forecast engine: fit and project in one call

use crate::config::ForecastSpec;
use crate::error::Result;
use crate::models::{ForecastModel, ForecastResult, SarimaModel, TrainedForecastModel};
use crate::series::TimeSeries;
use tracing::info;

/// Fits the configured seasonal ARIMA and forecasts the requested horizon
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    spec: ForecastSpec,
    model: SarimaModel,
}

impl ForecastEngine {
    /// Validate `spec` up front; nothing is computed here
    pub fn new(spec: ForecastSpec) -> Result<Self> {
        spec.validate()?;
        let model = SarimaModel::from_spec(&spec)?;
        Ok(Self { spec, model })
    }

    pub fn spec(&self) -> &ForecastSpec {
        &self.spec
    }

    pub fn model(&self) -> &SarimaModel {
        &self.model
    }

    /// Fit on `series` and forecast `spec.horizon` days past its end
    pub fn run(&self, series: &TimeSeries) -> Result<ForecastResult> {
        let trained = self.model.train(series)?;
        let result = trained.forecast(self.spec.horizon, self.spec.confidence_level)?;

        info!(
            model = trained.name(),
            horizon = result.horizon(),
            aic = result.diagnostics().aic,
            "forecast complete"
        );
        Ok(result)
    }
}
