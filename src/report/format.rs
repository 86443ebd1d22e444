//! Formatting of forecasts and region listings.
//!
//! Formatting lives here so the pipeline stays free of presentation and
//! output changes are localized.

use crate::domain::PredictionResult;
use crate::error::{ForecastError, Result};
use crate::io::Region;

/// Human-readable summary of one forecast.
pub fn format_prediction(result: &PredictionResult) -> String {
    let mut out = String::new();

    out.push_str("=== cf - daily new case forecast ===\n");
    out.push_str(&format!("Region: {}\n", result.country_code));
    out.push_str(&format!(
        "Window: {} -> {}\n",
        result.starting_date, result.prediction_date
    ));
    out.push_str(&format!("Predicted new cases: {}\n", result.predicted_value));
    out.push_str(&format!("Trend: {}\n", result.trend));
    if result.date_adjusted {
        out.push_str("Note: requested date not in the history; started from the latest available day.\n");
    }

    out
}

/// JSON rendering of one forecast (stable field names for downstream consumers).
pub fn prediction_json(result: &PredictionResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| ForecastError::Io(std::io::Error::other(e)))
}

/// Two-column listing of region codes and names.
pub fn format_regions(regions: &[Region]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<6} {}\n", "code", "name"));
    out.push_str(&format!("{:-<6} {:-<24}\n", "", ""));
    for region in regions {
        out.push_str(format!("{:<6} {}", region.code, truncate(&region.name, 48)).trim_end());
        out.push('\n');
    }
    out.push_str(&format!("{} regions\n", regions.len()));
    out
}

pub fn regions_json(regions: &[Region]) -> Result<String> {
    serde_json::to_string_pretty(regions).map_err(|e| ForecastError::Io(std::io::Error::other(e)))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('~');
    out
}
