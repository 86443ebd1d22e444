//! The forecast pipeline shared by every front-end.
//!
//! One request runs, in order:
//! series -> scaler -> windows -> sample store -> rollout -> trend -> result
//!
//! Everything built here (scaler, store) belongs to the request and is
//! dropped with it. Only the model is borrowed from the caller.

use tracing::info;

use crate::data::{MinMaxScaler, SampleStore, SeriesSource, build_windows};
use crate::domain::calendar::parse_date;
use crate::domain::{ForecastConfig, ForecastRequest, PredictionResult};
use crate::error::{ForecastError, Result};
use crate::forecast::{RolloutOutcome, TrendReading, TrendSettings, classify_trend, roll_forward};
use crate::models::Predictor;

/// All intermediate outputs of one forecast, for callers that want more
/// than the headline result (diagnostics, plotting).
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub result: PredictionResult,
    pub look_back: usize,
    pub scaler: MinMaxScaler,
    pub rollout: RolloutOutcome,
    pub trend: TrendReading,
    /// The sample matrix after the rollout extended it.
    pub store: SampleStore,
}

/// Forecast new cases for `request.country_code`.
pub fn forecast<S, P>(
    source: &S,
    model: &P,
    request: &ForecastRequest,
    config: &ForecastConfig,
) -> Result<PredictionResult>
where
    S: SeriesSource + ?Sized,
    P: Predictor + ?Sized,
{
    run_forecast(source, model, request, config).map(|run| run.result)
}

/// [`forecast`], keeping the intermediate outputs.
pub fn run_forecast<S, P>(source: &S, model: &P, request: &ForecastRequest, config: &ForecastConfig) -> Result<ForecastRun>
where
    S: SeriesSource + ?Sized,
    P: Predictor + ?Sized,
{
    // 1) Validate the request before touching any data.
    let requested = parse_date(&request.requested_date)?;
    let look_back = resolve_look_back(model, request, config)?;
    let steps = request.look_forward_days + 1;

    // 2) Load and scale the history.
    let series = source.load_series(&request.country_code)?;
    let values = series.values();
    let scaler = MinMaxScaler::fit(&values)?;
    let normalized = scaler.normalize(&values);

    // 3) Window it; each row is keyed by the day its label belongs to.
    let built = build_windows(&normalized, look_back)?;
    let dates = series.dates();
    let mut store = SampleStore::build(&dates[look_back..], built.windows, &built.labels)?;

    // 4) Roll the model forward, then read the trend off the extended matrix.
    let rollout = roll_forward(&mut store, model, requested, steps)?;
    let trend = classify_trend(&store, look_back, &TrendSettings::from(config))?;

    let predicted_value = to_count(scaler.denormalize(rollout.prediction))?;

    let result = PredictionResult {
        country_code: request.country_code.clone(),
        prediction_date: rollout.prediction_date,
        starting_date: rollout.starting_date,
        predicted_value,
        trend: trend.trend,
        date_adjusted: rollout.date_adjusted,
    };

    info!(
        country = %result.country_code,
        prediction_date = %result.prediction_date,
        predicted = result.predicted_value,
        trend = %result.trend,
        adjusted = result.date_adjusted,
        "forecast complete"
    );

    Ok(ForecastRun {
        result,
        look_back,
        scaler,
        rollout,
        trend,
        store,
    })
}

/// Explicit config wins, then the model's own width, then the horizon.
fn resolve_look_back<P: Predictor + ?Sized>(model: &P, request: &ForecastRequest, config: &ForecastConfig) -> Result<usize> {
    let look_back = config
        .look_back
        .or_else(|| model.input_len())
        .unwrap_or(request.look_forward_days);

    if look_back == 0 {
        return Err(ForecastError::InvalidRequest(
            "look-back must be at least 1 (pass a look-back or a horizon of at least 1 day)".to_string(),
        ));
    }
    if let Some(width) = model.input_len() {
        if width != look_back {
            return Err(ForecastError::InvalidRequest(format!(
                "look-back {look_back} does not match the model's input width {width}"
            )));
        }
    }
    Ok(look_back)
}

fn to_count(value: f64) -> Result<i64> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded.abs() > i64::MAX as f64 {
        return Err(ForecastError::ModelInference(format!("prediction {value} is not a usable count")));
    }
    Ok(rounded as i64)
}
