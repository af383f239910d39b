//! Export of comparison tables.
//!
//! Every comparison row becomes one flat record with the period label, the
//! carrier code, the scaled metric label, the value and the percent
//! difference. Missing numbers stay missing: an empty CSV cell, a JSON
//! `null` or a null in the `DataFrame` column.

use contrail_compare::{ComparisonRow, ComparisonTable};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// Invalid format error.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// One comparison row in export form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Period label, e.g. `2023` or `2023Q2`
    #[serde(rename = "Period")]
    pub period: String,
    /// Carrier code
    #[serde(rename = "Airline")]
    pub airline: String,
    /// Metric label under the applied scale
    #[serde(rename = "Metric")]
    pub metric: String,
    /// Scaled value
    #[serde(rename = "Value")]
    pub value: Option<f64>,
    /// Percent difference against the base carrier
    #[serde(rename = "Percent Difference")]
    pub percent_difference: Option<f64>,
}

impl From<&ComparisonRow> for RowRecord {
    fn from(row: &ComparisonRow) -> Self {
        Self {
            period: row.period.label(),
            airline: row.entity.clone(),
            metric: row.label.clone(),
            value: row.value,
            percent_difference: row.percent_difference,
        }
    }
}

/// Flat records for every row of `table`, in table order.
pub fn records(table: &ComparisonTable) -> Vec<RowRecord> {
    table.rows().iter().map(RowRecord::from).collect()
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for [RowRecord] {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for record in self {
                    wtr.serialize(record)?;
                }
                let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
                String::from_utf8(bytes).map_err(|e| ExportError::InvalidFormat(e.to_string()))
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for ComparisonTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        records(self).export_to_string(format)
    }
}

/// Long-form `DataFrame` with nullable `Value` and `Percent Difference`
/// columns.
pub fn to_dataframe(table: &ComparisonTable) -> Result<DataFrame, ExportError> {
    let rows = table.rows();
    let periods: Vec<String> = rows.iter().map(|r| r.period.label()).collect();
    let airlines: Vec<&str> = rows.iter().map(|r| r.entity.as_str()).collect();
    let metrics: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
    let values: Vec<Option<f64>> = rows.iter().map(|r| r.value).collect();
    let differences: Vec<Option<f64>> = rows.iter().map(|r| r.percent_difference).collect();

    Ok(DataFrame::new(vec![
        Series::new("Period".into(), periods).into(),
        Series::new("Airline".into(), airlines).into(),
        Series::new("Metric".into(), metrics).into(),
        Series::new("Value".into(), values).into(),
        Series::new("Percent Difference".into(), differences).into(),
    ])?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<RowRecord> {
        vec![
            RowRecord {
                period: "2023".to_string(),
                airline: "AAL".to_string(),
                metric: "Net Income (millions)".to_string(),
                value: Some(822.0),
                percent_difference: Some(0.0),
            },
            RowRecord {
                period: "2023".to_string(),
                airline: "UAL".to_string(),
                metric: "Net Income (millions)".to_string(),
                value: None,
                percent_difference: None,
            },
        ]
    }

    #[test]
    fn test_csv_empty_cells_for_missing() {
        let csv = sample().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Period,Airline,Metric,Value,Percent Difference");
        assert_eq!(lines[1], "2023,AAL,Net Income (millions),822.0,0.0");
        assert_eq!(lines[2], "2023,UAL,Net Income (millions),,");
    }

    #[test]
    fn test_json_null_for_missing() {
        let json = sample().export_to_string(ExportFormat::Json).unwrap();
        assert!(json.contains("\"Value\":null"));
        assert!(json.contains("\"Airline\":\"UAL\""));

        let parsed: Vec<RowRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn test_pretty_json() {
        let json = sample().export_to_string(ExportFormat::PrettyJson).unwrap();
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
