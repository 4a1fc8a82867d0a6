//! Turns a raw dataset into a clean [`TimeSeries`]
//!
//! Order of operations: parse timestamps, impute missing prices with the mean
//! of the originally present values, sort, resolve duplicates (last write
//! wins), then drop everything before the cutoff year.

use crate::config::PrepareConfig;
use crate::data::{Column, RawDataset};
use crate::error::{ForecastError, Result};
use crate::series::TimeSeries;
use crate::utils::date_parser::parse_date;
use chrono::{DateTime, Datelike, Utc};
use tracing::{debug, warn};

const MISSING_MARKERS: &[&str] = &["", "na", "nan", "null"];

/// Normalizes raw tabular input into a clean series
#[derive(Debug, Clone)]
pub struct SeriesPreparer {
    config: PrepareConfig,
}

impl SeriesPreparer {
    /// Create a preparer, validating the configuration
    pub fn new(config: PrepareConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PrepareConfig {
        &self.config
    }

    /// Clean `raw` into an ascending series without missing values.
    ///
    /// Row numbers in errors are zero-based data rows (the header excluded).
    pub fn prepare(&self, raw: &RawDataset) -> Result<TimeSeries> {
        let timestamp_column = raw
            .column(&self.config.timestamp_column)
            .ok_or_else(|| ForecastError::MissingColumn(self.config.timestamp_column.clone()))?;
        let value_column = raw
            .column(&self.config.value_column)
            .ok_or_else(|| ForecastError::MissingColumn(self.config.value_column.clone()))?;

        if raw.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Dataset has no rows".to_string(),
            ));
        }

        let timestamps = parse_timestamps(timestamp_column)?;
        let values = parse_values(value_column)?;

        let present: Vec<f64> = values.iter().flatten().copied().collect();
        if present.is_empty() {
            return Err(ForecastError::InsufficientData(format!(
                "Column '{}' has no non-missing values",
                self.config.value_column
            )));
        }
        let fill = series_math::mean(&present)?;
        let imputed = values.len() - present.len();
        if imputed * 2 > values.len() {
            warn!(
                imputed,
                rows = values.len(),
                "more than half of the values were imputed"
            );
        }

        let mut rows: Vec<(DateTime<Utc>, f64)> = timestamps
            .into_iter()
            .zip(values.into_iter().map(|v| v.unwrap_or(fill)))
            .collect();
        rows.sort_by_key(|(ts, _)| *ts);

        let mut deduped: Vec<(DateTime<Utc>, f64)> = Vec::with_capacity(rows.len());
        for (ts, value) in rows {
            match deduped.last_mut() {
                Some(last) if last.0 == ts => last.1 = value,
                _ => deduped.push((ts, value)),
            }
        }
        let duplicates = raw.len() - deduped.len();

        let before_filter = deduped.len();
        deduped.retain(|(ts, _)| ts.year() >= self.config.cutoff_year);
        let filtered = before_filter - deduped.len();

        debug!(
            rows = raw.len(),
            imputed,
            duplicates,
            filtered,
            kept = deduped.len(),
            "prepared series"
        );

        let (timestamps, values) = deduped.into_iter().unzip();
        TimeSeries::new(timestamps, values)
    }
}

fn parse_timestamps(column: &Column) -> Result<Vec<DateTime<Utc>>> {
    match column {
        Column::Text(cells) => cells
            .iter()
            .enumerate()
            .map(|(row, cell)| {
                cell.as_deref()
                    .and_then(parse_date)
                    .ok_or_else(|| ForecastError::MalformedTimestamp {
                        row,
                        value: cell.clone().unwrap_or_default(),
                    })
            })
            .collect(),
        Column::Numeric(cells) => Err(ForecastError::MalformedTimestamp {
            row: 0,
            value: cells
                .first()
                .and_then(|c| c.map(|v| v.to_string()))
                .unwrap_or_default(),
        }),
    }
}

fn parse_values(column: &Column) -> Result<Vec<Option<f64>>> {
    match column {
        Column::Numeric(cells) => Ok(cells
            .iter()
            .map(|cell| cell.filter(|v| v.is_finite()))
            .collect()),
        Column::Text(cells) => cells
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                None => Ok(None),
                Some(text) => parse_value_text(row, text),
            })
            .collect(),
    }
}

fn parse_value_text(row: usize, text: &str) -> Result<Option<f64>> {
    let trimmed = text.trim();
    if MISSING_MARKERS
        .iter()
        .any(|marker| trimmed.eq_ignore_ascii_case(marker))
    {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ForecastError::MalformedValue {
            row,
            value: text.to_string(),
        }),
    }
}
