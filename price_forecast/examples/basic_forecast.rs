use chrono::{Duration, TimeZone, Utc};
use price_forecast::config::ForecastSpec;
use price_forecast::forecast::ForecastEngine;
use price_forecast::series::TimeSeries;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Price Forecast: Seasonal ARIMA Example");
    println!("======================================\n");

    let series = create_sample_daily_data()?;
    println!(
        "Sample data created: {} daily prices ending {}\n",
        series.len(),
        series
            .last_timestamp()
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    );

    // Dashboard model SARIMA(30,1,0)(0,1,1)[30], one month ahead
    let spec = ForecastSpec {
        horizon: 30,
        ..Default::default()
    };
    let engine = ForecastEngine::new(spec)?;
    let forecast = engine.run(&series)?;

    let diagnostics = forecast.diagnostics();
    println!("Model: {}", diagnostics.model);
    println!("  sigma2: {:.4}", diagnostics.sigma2);
    println!("  AIC: {:.2}  BIC: {:.2}", diagnostics.aic, diagnostics.bic);
    for (name, value) in &diagnostics.coefficients {
        println!("  {}: {:.4}", name, value);
    }

    println!("\n95% forecast (every 5th day):");
    for point in forecast.points().iter().step_by(5) {
        println!(
            "  {}: {:.2} ({:.2}, {:.2})",
            point.timestamp.format("%Y-%m-%d"),
            point.point,
            point.lower,
            point.upper
        );
    }

    Ok(())
}

/// Two years of prices: a drifting random walk plus a noisy monthly cycle
fn create_sample_daily_data() -> price_forecast::error::Result<TimeSeries> {
    let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
    let mut rng = StdRng::seed_from_u64(42);
    let shock = Normal::new(0.1, 1.5).unwrap();
    let mut level = 250.0;
    let mut cycle: Vec<f64> = (0..30)
        .map(|d| (2.0 * std::f64::consts::PI * d as f64 / 30.0).sin() * 8.0)
        .collect();

    let (timestamps, values) = (0..730)
        .map(|day| {
            level += shock.sample(&mut rng);
            cycle[day as usize % 30] += shock.sample(&mut rng) - 0.1;
            (start + Duration::days(day), level + cycle[day as usize % 30])
        })
        .unzip();

    TimeSeries::new(timestamps, values)
}
