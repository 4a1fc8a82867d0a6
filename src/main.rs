//! # nshima
//!
//! Command-line front end: load a price CSV, run the analysis pipeline and
//! print the report as JSON.

use clap::{Parser, Subcommand};
use nshima::export::{write_forecast_file, write_trends_file};
use nshima::{AnalysisConfig, AnalysisPipeline, DatasetCache};
use price_forecast::error::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "nshima")]
#[command(about = "Staple-food price index analytics and forecasting", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a price file and print the report as JSON
    Report {
        /// Input CSV with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// JSON configuration file; flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Column holding the prices
        #[arg(long)]
        value_column: Option<String>,

        /// Column holding the dates
        #[arg(long)]
        timestamp_column: Option<String>,

        /// Drop observations before this year
        #[arg(long)]
        cutoff_year: Option<i32>,

        /// Moving-average windows, comma separated
        #[arg(short, long, value_delimiter = ',')]
        windows: Option<Vec<usize>>,

        /// Days to forecast
        #[arg(long)]
        horizon: Option<usize>,

        /// Write the forecast as CSV
        #[arg(long)]
        export_forecast: Option<PathBuf>,

        /// Write the trend series as CSV
        #[arg(long)]
        export_trends: Option<PathBuf>,

        /// Skip model fitting
        #[arg(long)]
        skip_forecast: bool,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },

    /// Print the default configuration as JSON
    Config,
}

#[allow(clippy::too_many_arguments)]
fn report(
    input: PathBuf,
    config_path: Option<PathBuf>,
    value_column: Option<String>,
    timestamp_column: Option<String>,
    cutoff_year: Option<i32>,
    windows: Option<Vec<usize>>,
    horizon: Option<usize>,
    export_forecast: Option<PathBuf>,
    export_trends: Option<PathBuf>,
    skip_forecast: bool,
    pretty: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(column) = value_column {
        config.prepare.value_column = column;
    }
    if let Some(column) = timestamp_column {
        config.prepare.timestamp_column = column;
    }
    if let Some(year) = cutoff_year {
        config.prepare.cutoff_year = year;
    }
    if let Some(windows) = windows {
        config.windows = windows;
    }
    if let Some(horizon) = horizon {
        config.forecast.horizon = horizon;
    }

    let mut cache = DatasetCache::new();
    let (fingerprint, raw) = cache.load_csv(&input)?;
    info!(path = %input.display(), fingerprint, rows = raw.len(), "loaded input");

    let mut pipeline = AnalysisPipeline::new(&config)?;
    if skip_forecast {
        pipeline = pipeline.without_forecast();
    }
    let report = pipeline.run(&raw)?;

    if let (Some(path), Some(forecast)) = (&export_forecast, &report.forecast) {
        write_forecast_file(path, forecast)?;
        info!(path = %path.display(), "forecast exported");
    }
    if let Some(path) = &export_trends {
        write_trends_file(path, &report.trends)?;
        info!(path = %path.display(), "trends exported");
    }

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nshima=info,price_forecast=info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Report {
            input,
            config,
            value_column,
            timestamp_column,
            cutoff_year,
            windows,
            horizon,
            export_forecast,
            export_trends,
            skip_forecast,
            pretty,
        } => report(
            input,
            config,
            value_column,
            timestamp_column,
            cutoff_year,
            windows,
            horizon,
            export_forecast,
            export_trends,
            skip_forecast,
            pretty,
        ),
        Commands::Config => serde_json::to_string_pretty(&AnalysisConfig::default())
            .map(|json| println!("{}", json))
            .map_err(Into::into),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        }
    }
}
