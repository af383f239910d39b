//! SEC EDGAR filings for a fiscal period.
//!
//! A period's filings are the 8-K, 10-K and 10-Q reports released inside its
//! filing window. The submissions API lists filings newest first, so paging
//! stops at the first filing older than the window start.

use chrono::{Months, NaiveDate};
use contrail_metrics::Quarter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::client::EdgarClient;
use crate::error::{DataError, Result};

/// Form types retrieved for a period.
pub const TARGET_FORMS: [&str; 3] = ["8-K", "10-K", "10-Q"];

/// Pad CIK to 10 digits as required by SEC.
///
/// # Example
/// ```
/// # use contrail_data::edgar::filings::pad_cik;
/// assert_eq!(pad_cik("6201"), "0000006201");
/// ```
pub fn pad_cik(cik: &str) -> String {
    format!("{:0>10}", cik.trim())
}

/// Date range in which a period's reports are filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilingWindow {
    /// First day of the fiscal period
    pub start: NaiveDate,
    /// Last day a report for the period is expected
    pub end: NaiveDate,
}

impl FilingWindow {
    /// Window for a fiscal period.
    ///
    /// The full year runs from January 1 to two months after December 31.
    /// Quarter `q` runs from the first day of month `3q - 2` to one month
    /// after the last day of month `3q`. Month arithmetic clamps to the end of
    /// the target month, so Q2 ends on July 30.
    pub fn for_period(year: i32, quarter: Quarter) -> Result<Self> {
        let (start_month, end_month, grace) = match quarter.number() {
            None => (1, 12, 2),
            Some(q) => (3 * q - 2, 3 * q, 1),
        };
        let invalid = || DataError::Parse(format!("No filing window for {year} {quarter}"));

        let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(invalid)?;
        let end = NaiveDate::from_ymd_opt(year, end_month, 1)
            .and_then(|d| d.checked_add_months(Months::new(1)))
            .and_then(|d| d.pred_opt())
            .and_then(|d| d.checked_add_months(Months::new(grace)))
            .ok_or_else(invalid)?;

        Ok(Self { start, end })
    }

    /// Whether a filing date falls inside the window (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Company filings data from SEC EDGAR submissions API.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFilings {
    /// Central Index Key
    pub cik: String,
    /// Company name
    pub name: String,
    /// Filing history
    pub filings: FilingHistory,
}

/// Container for filing history data.
#[derive(Debug, Clone, Deserialize)]
pub struct FilingHistory {
    /// Most recent filings
    pub recent: FilingColumns,
    /// Older filings, one page per entry, newest page first
    #[serde(default)]
    pub files: Vec<SubmissionFile>,
}

/// Reference to an older page of filings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionFile {
    /// Page file name, fetched under `/submissions/`
    pub name: String,
    /// Filings on the page
    #[serde(default)]
    pub filing_count: usize,
    /// Oldest filing date on the page
    pub filing_from: NaiveDate,
    /// Newest filing date on the page
    pub filing_to: NaiveDate,
}

/// Filings as parallel arrays, where each index is one filing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingColumns {
    /// Accession numbers (unique filing identifiers)
    pub accession_number: Vec<String>,
    /// Filing dates in YYYY-MM-DD format
    pub filing_date: Vec<String>,
    /// Form types (e.g., "10-K", "10-Q", "8-K")
    pub form: Vec<String>,
    /// Primary document filenames
    #[serde(default)]
    pub primary_document: Vec<String>,
}

impl FilingColumns {
    /// Row view of the columns. Rows with an unparseable date are skipped.
    pub fn filings(&self) -> Vec<FilingInfo> {
        let rows = self
            .accession_number
            .len()
            .min(self.filing_date.len())
            .min(self.form.len());

        (0..rows)
            .filter_map(|i| {
                let filed = &self.filing_date[i];
                let filing_date = NaiveDate::parse_from_str(filed, "%Y-%m-%d")
                    .inspect_err(|e| {
                        warn!(date = %filed, error = %e, "Skipping filing with invalid date");
                    })
                    .ok()?;
                Some(FilingInfo {
                    accession_number: self.accession_number[i].clone(),
                    form: self.form[i].clone(),
                    filing_date,
                    primary_document: self.primary_document.get(i).cloned().unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Information about a specific filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingInfo {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// Form type (e.g., "10-K", "10-Q")
    pub form: String,
    /// Filing date
    pub filing_date: NaiveDate,
    /// Primary document filename
    pub primary_document: String,
}

impl FilingInfo {
    /// Whether this is one of the [`TARGET_FORMS`].
    pub fn is_target_form(&self) -> bool {
        TARGET_FORMS.contains(&self.form.as_str())
    }

    /// Get the URL to the primary document for this filing.
    ///
    /// # Example
    /// ```
    /// # use contrail_data::edgar::filings::FilingInfo;
    /// # use chrono::NaiveDate;
    /// let filing = FilingInfo {
    ///     accession_number: "0000006201-24-000012".to_string(),
    ///     form: "10-K".to_string(),
    ///     filing_date: NaiveDate::from_ymd_opt(2024, 2, 21).unwrap(),
    ///     primary_document: "aal-20231231.htm".to_string(),
    /// };
    /// let url = filing.document_url("6201");
    /// assert!(url.contains("edgar/data/6201"));
    /// ```
    pub fn document_url(&self, cik: &str) -> String {
        let accession_no_dashes = self.accession_number.replace('-', "");
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
            cik.trim_start_matches('0'),
            accession_no_dashes,
            self.primary_document
        )
    }
}

/// Filings picked from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSelection {
    /// Target-form filings inside the window
    pub filings: Vec<FilingInfo>,
    /// Filings passed over (newer than the window or other forms)
    pub skipped: usize,
    /// Whether a filing older than the window start was reached
    pub reached_start: bool,
}

/// Pick the target-form filings inside `window` from a newest-first page.
pub fn select_filings(page: &[FilingInfo], window: &FilingWindow) -> PageSelection {
    let mut selection = PageSelection::default();
    for filing in page {
        if filing.filing_date < window.start {
            selection.reached_start = true;
            break;
        }
        if window.contains(filing.filing_date) && filing.is_target_form() {
            selection.filings.push(filing.clone());
        } else {
            selection.skipped += 1;
        }
    }
    selection
}

/// A company's filings for one fiscal period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodFilings {
    /// Central Index Key
    pub cik: String,
    /// Company name as registered with the SEC
    pub company: String,
    /// Window searched
    pub window: FilingWindow,
    /// Selected filings, newest first
    pub filings: Vec<FilingInfo>,
}

impl EdgarClient {
    /// Fetch a company's submissions index.
    pub async fn company_filings(&self, cik: &str) -> Result<CompanyFilings> {
        self.get_json(&format!("submissions/CIK{}.json", pad_cik(cik)))
            .await
    }

    /// Fetch an older page of filings listed in [`FilingHistory::files`].
    pub async fn filings_page(&self, name: &str) -> Result<FilingColumns> {
        self.get_json(&format!("submissions/{name}")).await
    }

    /// Collect a company's target-form filings inside `window`, paging
    /// through older submissions until the window start is reached.
    pub async fn period_filings(&self, cik: &str, window: FilingWindow) -> Result<PeriodFilings> {
        let company = self.company_filings(cik).await?;

        let first = select_filings(&company.filings.recent.filings(), &window);
        let mut filings = first.filings;
        let mut reached_start = first.reached_start;

        for file in &company.filings.files {
            if reached_start || file.filing_to < window.start {
                break;
            }
            if file.filing_from > window.end {
                debug!(page = %file.name, "Skipping page newer than the window");
                continue;
            }

            let page = self.filings_page(&file.name).await?;
            let selection = select_filings(&page.filings(), &window);
            debug!(
                page = %file.name,
                selected = selection.filings.len(),
                skipped = selection.skipped,
                "Scanned filings page"
            );
            filings.extend(selection.filings);
            reached_start = selection.reached_start;
        }

        info!(
            company = %company.name,
            start = %window.start,
            end = %window.end,
            filings = filings.len(),
            "Collected period filings"
        );

        Ok(PeriodFilings {
            cik: company.cik,
            company: company.name,
            window,
            filings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn filing(form: &str, filed: &str) -> FilingInfo {
        FilingInfo {
            accession_number: format!("0000006201-{filed}"),
            form: form.to_string(),
            filing_date: date(filed),
            primary_document: "doc.htm".to_string(),
        }
    }

    #[test]
    fn test_pad_cik() {
        assert_eq!(pad_cik("6201"), "0000006201");
        assert_eq!(pad_cik("1234567890"), "1234567890");
    }

    #[rstest]
    #[case(2023, Quarter::FullYear, "2023-01-01", "2024-02-29")]
    #[case(2022, Quarter::FullYear, "2022-01-01", "2023-02-28")]
    #[case(2023, Quarter::Q1, "2023-01-01", "2023-04-30")]
    #[case(2023, Quarter::Q2, "2023-04-01", "2023-07-30")]
    #[case(2023, Quarter::Q3, "2023-07-01", "2023-10-30")]
    #[case(2023, Quarter::Q4, "2023-10-01", "2024-01-31")]
    fn test_filing_window(
        #[case] year: i32,
        #[case] quarter: Quarter,
        #[case] start: &str,
        #[case] end: &str,
    ) {
        let window = FilingWindow::for_period(year, quarter).unwrap();
        assert_eq!(window.start, date(start));
        assert_eq!(window.end, date(end));
    }

    #[test]
    fn test_select_stops_before_window_start() {
        let window = FilingWindow::for_period(2023, Quarter::Q2).unwrap();
        let page = vec![
            filing("10-Q", "2023-10-20"),
            filing("10-Q", "2023-07-20"),
            filing("4", "2023-06-01"),
            filing("8-K", "2023-04-20"),
            filing("10-K", "2023-02-22"),
            filing("8-K", "2023-01-26"),
        ];
        let selection = select_filings(&page, &window);

        let forms: Vec<&str> = selection.filings.iter().map(|f| f.form.as_str()).collect();
        assert_eq!(forms, ["10-Q", "8-K"]);
        assert_eq!(selection.skipped, 2);
        assert!(selection.reached_start);
    }

    #[test]
    fn test_select_without_reaching_start() {
        let window = FilingWindow::for_period(2023, Quarter::Q1).unwrap();
        let page = vec![filing("10-Q", "2023-04-25")];
        let selection = select_filings(&page, &window);
        assert_eq!(selection.filings.len(), 1);
        assert!(!selection.reached_start);
    }

    #[test]
    fn test_document_url() {
        let url = filing("10-K", "2024-02-21").document_url("0000006201");
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/6201/000000620120240221/doc.htm"
        );
    }
}
