//! Command-line parsing for the case forecaster.
//!
//! Parsing and dispatch stay here; the forecasting code never sees clap types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "cf", version, about = "Autoregressive daily case forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict new cases for a region N days ahead and classify the trend.
    Forecast(ForecastArgs),
    /// List the region codes available in the data file.
    Codes(CodesArgs),
}

/// Where to read data and models from (overrides `.env` / environment).
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// WHO daily cases CSV (default: $CF_DATA_PATH or datasets/who_cases_deaths.csv).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Directory holding `<CODE>-model.json` files (default: $CF_MODELS_DIR or models).
    #[arg(long, value_name = "DIR")]
    pub models: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ForecastArgs {
    /// Two-letter region code (e.g. US).
    #[arg(short = 'c', long = "country")]
    pub country: String,

    /// Day to start predicting from (YYYY-MM-DD). Falls back to the latest
    /// available day when it is not in the history.
    #[arg(short = 'd', long = "date")]
    pub date: String,

    /// How many days to look forward.
    #[arg(short = 'n', long = "days", default_value_t = 3)]
    pub days: usize,

    /// Model window width (default: the model's own width, else --days).
    #[arg(long)]
    pub look_back: Option<usize>,

    /// Ignore history before this month when classifying the trend (YYYY-MM-DD).
    #[arg(long)]
    pub onset: Option<String>,

    /// Degree of the trend polynomial.
    #[arg(long, default_value_t = 4)]
    pub trend_degree: usize,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args, Clone)]
pub struct CodesArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}
