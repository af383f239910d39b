//! Carrier financials ingestion.
//!
//! The source table has one row per (carrier, year, quarter) with a `Year`
//! column, a `Quarter` column (`FY` or `1`..`4`), a carrier column (`Airline`)
//! and one column per reported metric, named by the metric registry. Unknown
//! columns are ignored, and so are derived metric columns since those are
//! always recomputed. Blank and NaN cells become missing values here, so
//! nothing downstream has to tell NaN from absence.

use contrail_metrics::{Dataset, Metric, MetricsError, Observation, Quarter};
use polars::prelude::*;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{DataError, Result};

/// Fiscal year column.
pub const YEAR_COLUMN: &str = "Year";

/// Quarter indicator column.
pub const QUARTER_COLUMN: &str = "Quarter";

/// Accepted headers for the carrier code column.
pub const ENTITY_COLUMNS: [&str; 4] = ["Airline", "Entity", "Carrier", "Ticker"];

/// Load a dataset from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(file)
        .finish()?;

    info!(path = %path.display(), rows = df.height(), "Loaded carrier financials");
    dataset_from_frame(&df)
}

/// Parse a dataset from CSV text.
pub fn parse_csv(text: &str) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;

    dataset_from_frame(&df)
}

/// Convert a DataFrame of reported values into a [`Dataset`].
///
/// # Errors
///
/// Fails when a key column is missing, a key cell is blank or malformed, or
/// the same (carrier, year, quarter) appears twice.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let year_name = find_column(df, &[YEAR_COLUMN])?;
    let quarter_name = find_column(df, &[QUARTER_COLUMN])?;
    let entity_name = find_column(df, &ENTITY_COLUMNS)?;

    let years = df.column(&year_name)?.cast(&DataType::Int64)?;
    let years = years.i64()?;
    let quarters = df.column(&quarter_name)?.cast(&DataType::String)?;
    let quarters = quarters.str()?;
    let entities = df.column(&entity_name)?.cast(&DataType::String)?;
    let entities = entities.str()?;

    let mut metric_columns: Vec<(Metric, Column)> = Vec::new();
    for name in df.get_column_names() {
        let name = name.as_str();
        if name == year_name || name == quarter_name || name == entity_name {
            continue;
        }
        match name.parse::<Metric>() {
            Ok(metric) if metric.is_derived() => {
                warn!(column = name, "Ignoring derived metric column, it is recomputed");
            }
            Ok(metric) if metric_columns.iter().any(|(m, _)| *m == metric) => {
                warn!(column = name, metric = %metric, "Ignoring duplicate metric column");
            }
            Ok(metric) => {
                metric_columns.push((metric, df.column(name)?.cast(&DataType::Float64)?));
            }
            Err(_) => debug!(column = name, "Ignoring unrecognised column"),
        }
    }

    let values = metric_columns
        .iter()
        .map(|(metric, column)| Ok((*metric, column.f64()?)))
        .collect::<Result<Vec<_>>>()?;

    let mut observations = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let year = years
            .get(row)
            .ok_or_else(|| invalid(row, &year_name, "missing year"))?;
        let year = i32::try_from(year).map_err(|_| invalid(row, &year_name, "year out of range"))?;

        let quarter = quarters
            .get(row)
            .ok_or_else(|| invalid(row, &quarter_name, "missing quarter"))?
            .parse::<Quarter>()
            .map_err(|e: MetricsError| invalid(row, &quarter_name, &e.to_string()))?;

        let entity = entities
            .get(row)
            .ok_or_else(|| invalid(row, &entity_name, "missing carrier"))?;

        let mut observation = Observation::new(entity, year, quarter);
        for (metric, column) in &values {
            observation.set(*metric, column.get(row).filter(|v| !v.is_nan()));
        }
        observations.push(observation);
    }

    debug!(
        observations = observations.len(),
        metrics = values.len(),
        "Parsed carrier financials"
    );

    Dataset::new(observations).map_err(DataError::from)
}

/// Actual header matching one of `candidates`, ignoring case.
fn find_column(df: &DataFrame, candidates: &[&str]) -> Result<String> {
    df.get_column_names()
        .into_iter()
        .find(|name| candidates.iter().any(|c| name.as_str().eq_ignore_ascii_case(c)))
        .map(|name| name.to_string())
        .ok_or_else(|| DataError::MissingColumn(candidates.join(" | ")))
}

fn invalid(row: usize, column: &str, reason: &str) -> DataError {
    DataError::InvalidValue {
        row,
        column: column.to_string(),
        reason: reason.to_string(),
    }
}
