//! Batch run of every analysis over one prepared series

use crate::analysis::{
    DeviationIndexEngine, IndexPoint, StatisticsCalculator, SummaryStatistics, TrendEngine,
    TrendSeries,
};
use crate::config::AnalysisConfig;
use crate::data::RawDataset;
use crate::error::Result;
use crate::forecast::ForecastEngine;
use crate::models::ForecastResult;
use crate::preparer::SeriesPreparer;
use crate::series::TimeSeries;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Every artifact derived from one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Cleaned input series
    pub series: TimeSeries,
    pub statistics: SummaryStatistics,
    /// Rolling means keyed by window
    pub trends: BTreeMap<usize, TrendSeries>,
    pub index: Vec<IndexPoint>,
    /// `None` when the forecast was skipped
    pub forecast: Option<ForecastResult>,
}

/// Prepares a series and runs the analysis engines over it
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    preparer: SeriesPreparer,
    trends: TrendEngine,
    forecast: Option<ForecastEngine>,
}

impl AnalysisPipeline {
    /// Build every engine from `config`, failing on invalid settings
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            preparer: SeriesPreparer::new(config.prepare.clone())?,
            trends: TrendEngine::new(config.windows.clone())?,
            forecast: Some(ForecastEngine::new(config.forecast.clone())?),
        })
    }

    /// Leave the forecast out of the report
    pub fn without_forecast(mut self) -> Self {
        self.forecast = None;
        self
    }

    /// Prepare `raw` and analyze the result
    pub fn run(&self, raw: &RawDataset) -> Result<AnalysisReport> {
        let series = self.preparer.prepare(raw)?;
        info!(observations = series.len(), "series prepared");
        self.analyze(series)
    }

    /// Analyze an already prepared series.
    ///
    /// The forecast fit runs on a rayon worker alongside the cheaper engines.
    pub fn analyze(&self, series: TimeSeries) -> Result<AnalysisReport> {
        let (forecast, descriptive) = rayon::join(
            || self.forecast.as_ref().map(|engine| engine.run(&series)).transpose(),
            || -> Result<_> {
                let statistics = StatisticsCalculator::new().compute(&series)?;
                let trends = self.trends.compute(&series)?;
                let index = DeviationIndexEngine::new().compute(&series)?;
                Ok((statistics, trends, index))
            },
        );
        let (statistics, trends, index) = descriptive?;
        let forecast = forecast?;

        info!(
            windows = trends.len(),
            forecast = forecast.is_some(),
            "analysis complete"
        );
        Ok(AnalysisReport {
            series,
            statistics,
            trends,
            index,
            forecast,
        })
    }
}

/// Convenience wrapper: prepare and analyze `raw` with `config`
pub fn analyze(raw: &RawDataset, config: &AnalysisConfig) -> Result<AnalysisReport> {
    AnalysisPipeline::new(config)?.run(raw)
}
