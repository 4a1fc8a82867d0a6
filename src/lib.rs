//! # Nshima
//!
//! Affordability analytics for a daily staple-food price series: summary
//! statistics, rolling trends, a deviation index and a seasonal ARIMA
//! forecast with confidence bounds.
//!
//! The heavy lifting lives in the member crates; this crate re-exports them
//! and adds CSV export of the report artifacts.
//!
//! ## Example
//!
//! ```
//! use nshima::{Column, RawDataset, StatisticsCalculator, SeriesPreparer, PrepareConfig};
//!
//! let raw = RawDataset::new()
//!     .with_column("date", Column::text(&[Some("2020-01-01"), Some("2020-01-02")]))
//!     .unwrap()
//!     .with_column("price", Column::Numeric(vec![Some(240.0), None]))
//!     .unwrap();
//!
//! let series = SeriesPreparer::new(PrepareConfig::default())
//!     .unwrap()
//!     .prepare(&raw)
//!     .unwrap();
//! let stats = StatisticsCalculator::new().compute(&series).unwrap();
//! assert_eq!(stats.mean, 240.0);
//! ```

pub mod export;

pub use price_forecast::{
    AnalysisConfig, AnalysisPipeline, AnalysisReport, Column, DataLoader, DatasetCache,
    DeviationIndexEngine, FitOptions, ForecastEngine, ForecastError, ForecastPoint,
    ForecastResult, ForecastSpec, IndexPoint, Order, PrepareConfig, RawDataset, SeasonalOrder,
    SeriesPreparer, StatisticsCalculator, SummaryStatistics, TimeSeries, TrendEngine,
    TrendPoint, TrendSeries, Trend,
};
pub use series_math;
