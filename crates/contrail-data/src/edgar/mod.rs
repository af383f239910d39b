//! SEC EDGAR filing lookup.
//!
//! This module provides access to SEC EDGAR submissions including:
//! - A rate-limited JSON client with bounded, backed-off retries
//! - Filing windows for fiscal periods
//! - Selection of the 8-K, 10-K and 10-Q filings released for a period
//!
//! # Example
//!
//! ```no_run
//! use contrail_data::edgar::{EdgarClient, FilingWindow};
//! use contrail_metrics::Quarter;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new()?;
//!     let window = FilingWindow::for_period(2023, Quarter::Q2)?;
//!     let period = client.period_filings("6201", window).await?;
//!     println!("{}: {} filings", period.company, period.filings.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod filings;

// Re-export main types
pub use client::{EDGAR_BASE_URL, EdgarClient, EdgarConfig};
pub use filings::{
    CompanyFilings, FilingColumns, FilingHistory, FilingInfo, FilingWindow, PageSelection,
    PeriodFilings, SubmissionFile, TARGET_FORMS, pad_cik, select_filings,
};
