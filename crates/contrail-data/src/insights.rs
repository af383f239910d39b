//! Free-text insights for a carrier's fiscal period.
//!
//! Insight generation is an external collaborator: it takes a carrier and a
//! period and either returns text or fails. [`insight_or_warning`] turns a
//! failure into a warning string so a report never aborts on it.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::future::Future;

use contrail_metrics::Quarter;
use serde::Serialize;
use tracing::{info, warn};

use crate::edgar::{EdgarClient, FilingWindow, PeriodFilings};
use crate::error::{DataError, Result};

/// Carrier and fiscal period an insight is requested for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct InsightRequest {
    /// Carrier code
    pub entity: String,
    /// Fiscal year
    pub year: i32,
    /// Quarter or full year
    pub quarter: Quarter,
}

impl InsightRequest {
    /// Request for `entity` in the given period. The code is upper-cased.
    pub fn new(entity: impl AsRef<str>, year: i32, quarter: Quarter) -> Self {
        Self {
            entity: entity.as_ref().trim().to_uppercase(),
            year,
            quarter,
        }
    }
}

impl fmt::Display for InsightRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.entity, self.year, self.quarter)
    }
}

/// Source of free-text insight for a carrier's period.
pub trait InsightProvider {
    /// Produce the insight text, or fail.
    fn insight(&self, request: &InsightRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Ask `provider` for an insight, turning any failure into a warning string.
pub async fn insight_or_warning<P: InsightProvider>(
    provider: &P,
    request: &InsightRequest,
) -> String {
    match provider.insight(request).await {
        Ok(text) => text,
        Err(e) => {
            warn!(request = %request, error = %e, "Insight unavailable");
            warning(request, &e)
        }
    }
}

/// Warning shown in place of an insight that could not be produced.
pub fn warning(request: &InsightRequest, error: &DataError) -> String {
    format!("Error: Insights for {request} could not be retrieved. {error}")
}

/// Insight provider that lists the SEC filings released for a period.
#[derive(Debug)]
pub struct FilingDigest {
    client: EdgarClient,
    ciks: HashMap<String, String>,
}

impl FilingDigest {
    /// Digest provider without any registered carriers.
    pub fn new(client: EdgarClient) -> Self {
        Self {
            client,
            ciks: HashMap::new(),
        }
    }

    /// Register the SEC CIK of a carrier.
    pub fn with_cik(mut self, entity: impl AsRef<str>, cik: impl Into<String>) -> Self {
        self.ciks
            .insert(entity.as_ref().trim().to_uppercase(), cik.into());
        self
    }

    /// Register several carriers at once.
    pub fn with_ciks<I, K, V>(self, ciks: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        ciks.into_iter()
            .fold(self, |digest, (entity, cik)| digest.with_cik(entity, cik))
    }

    /// CIK registered for a carrier.
    pub fn cik(&self, entity: &str) -> Option<&str> {
        self.ciks
            .get(&entity.trim().to_uppercase())
            .map(String::as_str)
    }

    /// Filings released for the requested period.
    pub async fn filings(&self, request: &InsightRequest) -> Result<PeriodFilings> {
        let cik = self
            .cik(&request.entity)
            .ok_or_else(|| DataError::UnknownCarrier(request.entity.clone()))?;
        let window = FilingWindow::for_period(request.year, request.quarter)?;
        self.client.period_filings(cik, window).await
    }
}

impl InsightProvider for FilingDigest {
    async fn insight(&self, request: &InsightRequest) -> Result<String> {
        let period = self.filings(request).await?;
        if period.filings.is_empty() {
            return Err(DataError::FilingNotFound(format!(
                "no 8-K, 10-K or 10-Q filed between {} and {}",
                period.window.start, period.window.end
            )));
        }
        info!(request = %request, filings = period.filings.len(), "Built filing digest");
        Ok(render_digest(request, &period))
    }
}

/// Plain-text digest of a period's filings.
pub fn render_digest(request: &InsightRequest, period: &PeriodFilings) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for filing in &period.filings {
        *counts.entry(filing.form.as_str()).or_default() += 1;
    }
    let summary = counts
        .iter()
        .map(|(form, n)| format!("{n} {form}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!("{request} ({})\n", period.company);
    out.push_str(&format!(
        "Filing window: {} to {}\n",
        period.window.start, period.window.end
    ));
    out.push_str(&format!("{} filings: {summary}\n", period.filings.len()));
    for filing in &period.filings {
        out.push_str(&format!(
            "- {} {:<5} {}\n",
            filing.filing_date,
            filing.form,
            filing.document_url(&period.cik)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edgar::{EdgarConfig, FilingInfo};
    use chrono::NaiveDate;
    use std::time::Duration;

    struct Fixed(Option<&'static str>);

    impl InsightProvider for Fixed {
        async fn insight(&self, _request: &InsightRequest) -> Result<String> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| DataError::RetriesExhausted {
                    attempts: 3,
                    last_error: "HTTP 503".to_string(),
                })
        }
    }

    fn offline_client() -> EdgarClient {
        EdgarClient::with_config(EdgarConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            rate_limit: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
            max_retries: 0,
            ..EdgarConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_request_display() {
        let request = InsightRequest::new(" aal", 2023, Quarter::Q2);
        assert_eq!(request.to_string(), "AAL 2023 Q2");
    }

    #[tokio::test]
    async fn test_insight_passthrough() {
        let request = InsightRequest::new("DAL", 2023, Quarter::FullYear);
        let text = insight_or_warning(&Fixed(Some("Strong year")), &request).await;
        assert_eq!(text, "Strong year");
    }

    #[tokio::test]
    async fn test_failure_becomes_warning() {
        let request = InsightRequest::new("DAL", 2023, Quarter::FullYear);
        let text = insight_or_warning(&Fixed(None), &request).await;
        assert_eq!(
            text,
            "Error: Insights for DAL 2023 FY could not be retrieved. \
             Max attempts reached after 3 tries: HTTP 503"
        );
    }

    #[tokio::test]
    async fn test_unknown_carrier() {
        let digest = FilingDigest::new(offline_client()).with_cik("AAL", "6201");
        let request = InsightRequest::new("XYZ", 2023, Quarter::Q1);
        let err = digest.filings(&request).await.unwrap_err();
        assert!(matches!(err, DataError::UnknownCarrier(code) if code == "XYZ"));
    }

    #[test]
    fn test_cik_lookup_ignores_case() {
        let digest = FilingDigest::new(offline_client()).with_ciks([("dal", "27904")]);
        assert_eq!(digest.cik("DAL"), Some("27904"));
        assert_eq!(digest.cik("UAL"), None);
    }

    #[test]
    fn test_render_digest() {
        let request = InsightRequest::new("AAL", 2023, Quarter::Q2);
        let window = FilingWindow::for_period(2023, Quarter::Q2).unwrap();
        let filing = |form: &str, day: u32, accession: &str| FilingInfo {
            accession_number: accession.to_string(),
            form: form.to_string(),
            filing_date: NaiveDate::from_ymd_opt(2023, 7, day).unwrap(),
            primary_document: "doc.htm".to_string(),
        };
        let period = PeriodFilings {
            cik: "0000006201".to_string(),
            company: "American Airlines Group Inc.".to_string(),
            window,
            filings: vec![
                filing("10-Q", 20, "0000006201-23-000030"),
                filing("8-K", 20, "0000006201-23-000029"),
                filing("8-K", 3, "0000006201-23-000025"),
            ],
        };

        let text = render_digest(&request, &period);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "AAL 2023 Q2 (American Airlines Group Inc.)");
        assert_eq!(lines[1], "Filing window: 2023-04-01 to 2023-07-30");
        assert_eq!(lines[2], "3 filings: 1 10-Q, 2 8-K");
        assert!(lines[3].starts_with("- 2023-07-20 10-Q"));
        assert!(lines[3].ends_with("/data/6201/000000620123000030/doc.htm"));
        assert_eq!(lines.len(), 6);
    }
}
