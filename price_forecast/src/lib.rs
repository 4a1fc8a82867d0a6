//! # Price Forecast
//!
//! Analytics and forecasting for daily commodity price series.
//!
//! ## Features
//!
//! - Raw dataset loading from CSV (polars) with a content-fingerprinted cache
//! - Series preparation: mean imputation, ordering, duplicate resolution, cutoff filter
//! - Summary statistics, rolling trends and a deviation index
//! - Seasonal ARIMA fitting with confidence-bounded forecasts
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use price_forecast::config::AnalysisConfig;
//! use price_forecast::data::DataLoader;
//! use price_forecast::pipeline::analyze;
//!
//! # fn main() -> price_forecast::error::Result<()> {
//! let raw = DataLoader::from_csv("maize_prices.csv")?;
//! let report = analyze(&raw, &AnalysisConfig::default())?;
//!
//! println!("mean price: {}", report.statistics.mean);
//! if let Some(forecast) = &report.forecast {
//!     for point in forecast.points() {
//!         println!("{} {:.2} [{:.2}, {:.2}]", point.timestamp, point.point, point.lower, point.upper);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod models;
pub mod pipeline;
pub mod preparer;
pub mod series;
pub mod utils;

// Re-export commonly used types
pub use crate::analysis::{
    DeviationIndexEngine, IndexPoint, StatisticsCalculator, SummaryStatistics, TrendEngine,
    TrendPoint, TrendSeries,
};
pub use crate::config::{AnalysisConfig, FitOptions, ForecastSpec, Order, PrepareConfig, SeasonalOrder, Trend};
pub use crate::data::{Column, DataLoader, DatasetCache, RawDataset};
pub use crate::error::ForecastError;
pub use crate::forecast::ForecastEngine;
pub use crate::models::{ForecastModel, ForecastPoint, ForecastResult, TrainedForecastModel};
pub use crate::pipeline::{AnalysisPipeline, AnalysisReport};
pub use crate::preparer::SeriesPreparer;
pub use crate::series::TimeSeries;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
