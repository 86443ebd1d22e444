//! CSV ingest for WHO-style daily case exports.
//!
//! The export has one row per (region, day). We only need three columns:
//!
//! - `ISO_2_CODE`: region code
//! - `date_epicrv`: reporting day (`YYYY-MM-DD`, optionally followed by a time)
//! - `NewCase`: new cases that day
//!
//! plus `ADM0_NAME` for listing regions. Header matching is case-insensitive.
//!
//! Rows that fail to parse are skipped and counted, never fatal: a single
//! malformed line should not take a whole region offline.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::PathBuf;

use chrono::NaiveDate;
use csv::StringRecord;
use serde::Serialize;
use tracing::warn;

use crate::data::SeriesSource;
use crate::domain::calendar::parse_date;
use crate::domain::TimeSeries;
use crate::error::{ForecastError, Result};

const COL_CODE: &str = "iso_2_code";
const COL_NAME: &str = "adm0_name";
const COL_DATE: &str = "date_epicrv";
const COL_NEW_CASES: &str = "newcase";

/// A region present in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Reads series from a CSV file on every call; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    path: PathBuf,
}

impl CsvSeriesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Every region in the file, sorted by code.
    pub fn regions(&self) -> Result<Vec<Region>> {
        let (mut reader, header_map) = self.open()?;
        let code_idx = column(&header_map, COL_CODE)?;
        let name_idx = header_map.get(COL_NAME).copied();

        let mut regions = BTreeMap::new();
        for record in reader.records().flatten() {
            let Some(code) = field(&record, code_idx) else { continue };
            let name = name_idx.and_then(|idx| field(&record, idx)).unwrap_or(code);
            regions.entry(code.to_string()).or_insert_with(|| name.to_string());
        }

        Ok(regions.into_iter().map(|(code, name)| Region { code, name }).collect())
    }

    fn open(&self) -> Result<(csv::Reader<File>, HashMap<String, usize>)> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| ForecastError::InvalidSeries(format!("failed to read CSV headers: {e}")))?
            .clone();

        Ok((reader, build_header_map(&headers)))
    }
}

impl SeriesSource for CsvSeriesSource {
    fn load_series(&self, country_code: &str) -> Result<TimeSeries> {
        let (mut reader, header_map) = self.open()?;
        let code_idx = column(&header_map, COL_CODE)?;
        let date_idx = column(&header_map, COL_DATE)?;
        let value_idx = column(&header_map, COL_NEW_CASES)?;

        let mut points: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        let mut row_errors = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            // +2: header is line 1, records are 1-based after it.
            let line = idx + 2;

            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    row_errors.push(RowError {
                        line,
                        message: format!("CSV parse error: {e}"),
                    });
                    continue;
                }
            };

            if field(&record, code_idx) != Some(country_code) {
                continue;
            }

            match parse_row(&record, date_idx, value_idx) {
                Ok((date, value)) => {
                    // Two rows for one day leave no way to pick the real count.
                    if points.insert(date, value).is_some() {
                        return Err(ForecastError::InvalidSeries(format!(
                            "region '{country_code}' has more than one row for {date} (line {line})"
                        )));
                    }
                }
                Err(message) => row_errors.push(RowError { line, message }),
            }
        }

        if !row_errors.is_empty() {
            let first = &row_errors[0];
            warn!(
                path = %self.path.display(),
                skipped = row_errors.len(),
                first_line = first.line,
                first_error = %first.message,
                "skipped unreadable CSV rows"
            );
        }

        if points.is_empty() {
            return Err(ForecastError::NotFound(format!("region '{country_code}'")));
        }

        TimeSeries::from_pairs(points)
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| ForecastError::InvalidSeries(format!("missing required column `{name}`")))
}

fn field(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_row(record: &StringRecord, date_idx: usize, value_idx: usize) -> std::result::Result<(NaiveDate, f64), String> {
    let raw_date = field(record, date_idx).ok_or_else(|| "missing date".to_string())?;
    let date = parse_day(raw_date)?;

    let raw_value = field(record, value_idx).ok_or_else(|| format!("missing new case count on {date}"))?;
    let value = raw_value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("invalid new case count '{raw_value}' on {date}"))?;

    Ok((date, value))
}

/// Accept `YYYY-MM-DD` with an optional trailing time part (`T...` or ` ...`).
fn parse_day(raw: &str) -> std::result::Result<NaiveDate, String> {
    let day = raw.get(..10).unwrap_or(raw);
    parse_date(day).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const SAMPLE: &str = "\u{feff}ISO_2_CODE,ADM0_NAME,date_epicrv,NewCase,CumCase\n\
        US,United States of America,2020-04-02T00:00:00Z,30,60\n\
        US,United States of America,2020-04-01T00:00:00Z,20,30\n\
        FR,France,2020-04-01T00:00:00Z,5,5\n\
        US,United States of America,2020-04-03T00:00:00Z,n/a,60\n\
        US,United States of America,2020-04-04,45,105\n";

    #[test]
    fn loads_one_region_in_date_order() {
        let file = write_csv(SAMPLE);
        let source = CsvSeriesSource::new(file.path());

        let series = source.load_series("US").unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![20.0, 30.0, 45.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2020, 4, 1));
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2020, 4, 4));
    }

    #[test]
    fn unknown_region_is_not_found() {
        let file = write_csv(SAMPLE);
        let source = CsvSeriesSource::new(file.path());
        assert!(matches!(source.load_series("ZZ"), Err(ForecastError::NotFound(_))));
    }

    #[test]
    fn repeated_day_is_rejected() {
        let file = write_csv(
            "ISO_2_CODE,ADM0_NAME,date_epicrv,NewCase\n\
             US,United States of America,2020-04-01,10\n\
             US,United States of America,2020-04-02,20\n\
             US,United States of America,2020-04-01T00:00:00Z,999\n\
             FR,France,2020-04-01,5\n",
        );
        let source = CsvSeriesSource::new(file.path());

        let err = source.load_series("US").unwrap_err();
        assert!(matches!(err, ForecastError::InvalidSeries(_)), "{err:?}");
        assert!(err.to_string().contains("2020-04-01"), "{err}");
        // Other regions in the same file are unaffected.
        assert_eq!(source.load_series("FR").unwrap().values(), vec![5.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = CsvSeriesSource::new("/nonexistent/who_cases_deaths.csv");
        assert!(matches!(source.load_series("US"), Err(ForecastError::Io(_))));
    }

    #[test]
    fn missing_column_is_reported() {
        let file = write_csv("ISO_2_CODE,date_epicrv\nUS,2020-04-01\n");
        let source = CsvSeriesSource::new(file.path());
        let err = source.load_series("US").unwrap_err();
        assert!(err.to_string().contains("newcase"), "{err}");
    }

    #[test]
    fn regions_are_listed_once_each() {
        let file = write_csv(SAMPLE);
        let regions = CsvSeriesSource::new(file.path()).regions().unwrap();
        assert_eq!(
            regions,
            vec![
                Region {
                    code: "FR".to_string(),
                    name: "France".to_string()
                },
                Region {
                    code: "US".to_string(),
                    name: "United States of America".to_string()
                },
            ]
        );
    }

    #[test]
    fn day_parsing_ignores_time_part() {
        assert_eq!(parse_day("2020-04-01T00:00:00Z").unwrap(), NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert_eq!(parse_day("2020-04-01 00:00").unwrap(), NaiveDate::from_ymd_opt(2020, 4, 1).unwrap());
        assert!(parse_day("04/01/2020").is_err());
    }
}
