use chrono::{Duration, TimeZone, Utc};
use price_forecast::analysis::{DeviationIndexEngine, StatisticsCalculator, TrendEngine};
use price_forecast::error::ForecastError;
use price_forecast::series::TimeSeries;
use rstest::rstest;

fn daily(values: &[f64]) -> TimeSeries {
    let start = Utc.with_ymd_and_hms(2015, 3, 1, 0, 0, 0).unwrap();
    let timestamps = (0..values.len() as i64)
        .map(|d| start + Duration::days(d))
        .collect();
    TimeSeries::new(timestamps, values.to_vec()).unwrap()
}

#[test]
fn test_summary_statistics() {
    let stats = StatisticsCalculator::new()
        .compute(&daily(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]))
        .unwrap();

    assert_eq!(stats.count, 8);
    assert_eq!(stats.mean, 5.0);
    assert!((stats.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    assert_eq!(stats.min, 2.0);
    assert_eq!(stats.p25, 4.0);
    assert_eq!(stats.p50, 4.5);
    assert_eq!(stats.p75, 5.5);
    assert_eq!(stats.max, 9.0);
}

#[test]
fn test_single_observation_std_is_nan() {
    let stats = StatisticsCalculator::new().compute(&daily(&[3.0])).unwrap();
    assert_eq!(stats.count, 1);
    assert!(stats.std.is_nan());
    assert_eq!(stats.p25, 3.0);
}

#[rstest]
#[case(2, vec![None, Some(15.0), Some(25.0), Some(35.0)])]
#[case(1, vec![Some(10.0), Some(20.0), Some(30.0), Some(40.0)])]
#[case(4, vec![None, None, None, Some(25.0)])]
#[case(5, vec![None, None, None, None])]
fn test_rolling_windows(#[case] window: usize, #[case] expected: Vec<Option<f64>>) {
    let trends = TrendEngine::new(vec![window])
        .unwrap()
        .compute(&daily(&[10.0, 20.0, 30.0, 40.0]))
        .unwrap();

    assert_eq!(trends[&window].values(), expected);
}

#[test]
fn test_multiple_windows_are_independent() {
    let series = daily(&(1..=10).map(f64::from).collect::<Vec<_>>());
    let trends = TrendEngine::new(vec![3, 5]).unwrap().compute(&series).unwrap();

    assert_eq!(trends.len(), 2);
    assert_eq!(trends[&3].points.len(), 10);
    assert_eq!(trends[&3].points[9].value, Some(9.0));
    assert_eq!(trends[&5].points[9].value, Some(8.0));
    assert_eq!(trends[&5].points[3].value, None);
}

#[test]
fn test_deviation_index_identity() {
    let values = [120.0, 80.0, 100.0, 95.5, 104.5];
    let index = DeviationIndexEngine::new().compute(&daily(&values)).unwrap();
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    assert_eq!(index.len(), values.len());
    assert!(index[1].value > 0.0);
    assert!(index[0].value < 0.0);
    for (point, value) in index.iter().zip(values.iter()) {
        assert!((point.value + value / mean - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_zero_mean_is_division_by_zero() {
    let result = DeviationIndexEngine::new().compute(&daily(&[-1.0, 1.0]));
    assert!(matches!(result, Err(ForecastError::DivisionByZero(_))));
}

#[test]
fn test_empty_series_is_insufficient_everywhere() {
    let empty = TimeSeries::empty();

    assert!(matches!(
        StatisticsCalculator::new().compute(&empty),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        TrendEngine::new(vec![3]).unwrap().compute(&empty),
        Err(ForecastError::InsufficientData(_))
    ));
    assert!(matches!(
        DeviationIndexEngine::new().compute(&empty),
        Err(ForecastError::InsufficientData(_))
    ));
}
