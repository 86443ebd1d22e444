//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments and resolves settings
//! - loads the region's series and model
//! - runs the forecast and prints the result

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::{CodesArgs, Command, ForecastArgs, SourceArgs};
use crate::domain::calendar::parse_date;
use crate::domain::{ForecastConfig, ForecastRequest};
use crate::error::AppError;
use crate::io::{CsvSeriesSource, load_model};

pub mod pipeline;
pub mod settings;

use settings::Settings;

const DEFAULT_LOG_FILTER: &str = "case_forecast=info";

/// Entry point for the `cf` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    let cli = crate::cli::Cli::parse();
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Forecast(args) => handle_forecast(args, &settings),
        Command::Codes(args) => handle_codes(args, &settings),
    }
}

/// Logs go to stderr so stdout stays clean for `--json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn handle_forecast(args: ForecastArgs, settings: &Settings) -> Result<(), AppError> {
    let config = forecast_config_from_args(&args, settings)?;
    let source = CsvSeriesSource::new(data_path(&args.source, settings));
    let models_dir = args.source.models.clone().unwrap_or_else(|| settings.models_dir.clone());

    let code = args.country.trim().to_ascii_uppercase();
    let model = load_model(&models_dir, &code)?;
    let request = ForecastRequest::new(code, args.date.trim(), args.days);

    let result = pipeline::forecast(&source, &model, &request, &config)?;

    if args.json {
        println!("{}", crate::report::prediction_json(&result)?);
    } else {
        print!("{}", crate::report::format_prediction(&result));
    }
    Ok(())
}

fn handle_codes(args: CodesArgs, settings: &Settings) -> Result<(), AppError> {
    let source = CsvSeriesSource::new(data_path(&args.source, settings));
    let regions = source.regions()?;

    if args.json {
        println!("{}", crate::report::regions_json(&regions)?);
    } else {
        print!("{}", crate::report::format_regions(&regions));
    }
    Ok(())
}

fn data_path(source: &SourceArgs, settings: &Settings) -> std::path::PathBuf {
    source.data.clone().unwrap_or_else(|| settings.data_path.clone())
}

pub fn forecast_config_from_args(args: &ForecastArgs, settings: &Settings) -> Result<ForecastConfig, AppError> {
    let onset = match &args.onset {
        Some(raw) => parse_date(raw.trim())?,
        None => settings.onset,
    };

    Ok(ForecastConfig {
        look_back: args.look_back,
        onset,
        trend_degree: args.trend_degree,
        ..ForecastConfig::default()
    })
}
