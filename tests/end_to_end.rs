use chrono::{Duration, NaiveDate};
use nshima::export::{write_forecast, write_trends};
use nshima::{
    AnalysisConfig, AnalysisPipeline, DataLoader, FitOptions, ForecastSpec, Order, SeasonalOrder,
    Trend,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::io::Write;
use tempfile::NamedTempFile;

const DAYS: usize = 400;

/// 400 daily prices rising linearly from 50 to 150 with small noise
fn trending_prices() -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(2013);
    let noise = Normal::new(0.0, 0.05).unwrap();
    (0..DAYS)
        .map(|i| 50.0 + 100.0 * i as f64 / (DAYS - 1) as f64 + noise.sample(&mut rng))
        .collect()
}

fn write_prices(prices: &[f64]) -> NamedTempFile {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,price").unwrap();
    for (i, price) in prices.iter().enumerate() {
        writeln!(file, "{},{}", start + Duration::days(i as i64), price).unwrap();
    }
    file.flush().unwrap();
    file
}

fn config() -> AnalysisConfig {
    AnalysisConfig {
        windows: vec![7],
        forecast: ForecastSpec {
            horizon: 10,
            order: Order::new(1, 1, 0),
            seasonal_order: SeasonalOrder::none(30),
            confidence_level: 0.95,
            trend: Trend::Constant,
            fit: FitOptions::default(),
        },
        ..Default::default()
    }
}

#[test]
fn test_trending_series_end_to_end() {
    let prices = trending_prices();
    let file = write_prices(&prices);
    let raw = DataLoader::from_csv(file.path()).unwrap();

    let report = AnalysisPipeline::new(&config()).unwrap().run(&raw).unwrap();

    assert_eq!(report.series.len(), DAYS);
    assert!((report.statistics.mean - 100.0).abs() < 0.1);

    let values = report.series.values();
    let trend = &report.trends[&7];
    for i in 0..20 {
        let expected = if i < 6 {
            None
        } else {
            Some(values[i - 6..=i].iter().sum::<f64>() / 7.0)
        };
        match (trend.points[i].value, expected) {
            (None, None) => {}
            (Some(got), Some(want)) => assert!((got - want).abs() < 1e-9),
            (got, want) => panic!("position {}: {:?} vs {:?}", i, got, want),
        }
    }

    let forecast = report.forecast.unwrap();
    let points = forecast.values();
    assert_eq!(points.len(), 10);
    assert!(points[0] > values[DAYS - 1] - 0.5);
    for pair in points.windows(2) {
        assert!(pair[1] > pair[0], "points {:?}", points);
    }
    let widths = forecast.interval_widths();
    for pair in widths.windows(2) {
        assert!(pair[1] > pair[0], "widths {:?}", widths);
    }
}

#[test]
fn test_exports_have_one_row_per_point() {
    let file = write_prices(&trending_prices());
    let raw = DataLoader::from_csv(file.path()).unwrap();
    let report = AnalysisPipeline::new(&config()).unwrap().run(&raw).unwrap();

    let mut forecast_csv = Vec::new();
    write_forecast(&mut forecast_csv, report.forecast.as_ref().unwrap()).unwrap();
    let forecast_csv = String::from_utf8(forecast_csv).unwrap();
    let lines: Vec<&str> = forecast_csv.lines().collect();
    assert_eq!(lines[0], "date,forecast,lower,upper");
    assert_eq!(lines.len(), 11);
    assert!(lines[1].starts_with("2021-02-04,"));

    let mut trends_csv = Vec::new();
    write_trends(&mut trends_csv, &report.trends).unwrap();
    let trends_csv = String::from_utf8(trends_csv).unwrap();
    assert_eq!(trends_csv.lines().count(), DAYS + 1);
    assert!(trends_csv.starts_with("date,ma_7\n2020-01-01,\n"));
}
