//! CSV export of report artifacts

use price_forecast::error::{ForecastError, Result};
use price_forecast::{ForecastResult, TrendSeries};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ForecastRow {
    date: String,
    forecast: f64,
    lower: f64,
    upper: f64,
}

fn csv_error(err: csv::Error) -> ForecastError {
    ForecastError::SerializationError(err.to_string())
}

/// Write `date,forecast,lower,upper` rows
pub fn write_forecast<W: Write>(writer: W, forecast: &ForecastResult) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for point in forecast.points() {
        csv_writer
            .serialize(ForecastRow {
                date: point.timestamp.format("%Y-%m-%d").to_string(),
                forecast: point.point,
                lower: point.lower,
                upper: point.upper,
            })
            .map_err(csv_error)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write one row per date with a `ma_<window>` column per window.
///
/// Positions where a window is not yet full are left empty.
pub fn write_trends<W: Write>(writer: W, trends: &BTreeMap<usize, TrendSeries>) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = vec!["date".to_string()];
    header.extend(trends.keys().map(|window| format!("ma_{}", window)));
    csv_writer.write_record(&header).map_err(csv_error)?;

    let rows = trends.values().next().map_or(0, |series| series.points.len());
    for row in 0..rows {
        let mut record = Vec::with_capacity(header.len());
        for (i, series) in trends.values().enumerate() {
            let point = series.points.get(row).ok_or_else(|| {
                ForecastError::SerializationError(format!(
                    "Trend series for window {} is shorter than the others",
                    series.window
                ))
            })?;
            if i == 0 {
                record.push(point.timestamp.format("%Y-%m-%d").to_string());
            }
            record.push(point.value.map(|v| v.to_string()).unwrap_or_default());
        }
        csv_writer.write_record(&record).map_err(csv_error)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// [`write_forecast`] to a file
pub fn write_forecast_file<P: AsRef<Path>>(path: P, forecast: &ForecastResult) -> Result<()> {
    write_forecast(File::create(path)?, forecast)
}

/// [`write_trends`] to a file
pub fn write_trends_file<P: AsRef<Path>>(
    path: P,
    trends: &BTreeMap<usize, TrendSeries>,
) -> Result<()> {
    write_trends(File::create(path)?, trends)
}
