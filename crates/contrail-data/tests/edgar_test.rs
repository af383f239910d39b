//! Integration tests for EDGAR submissions parsing and period selection

use chrono::NaiveDate;
use contrail_data::edgar::{CompanyFilings, FilingWindow, PeriodFilings, select_filings};
use contrail_data::{InsightRequest, render_digest};
use contrail_metrics::Quarter;

fn fixture() -> CompanyFilings {
    serde_json::from_str(include_str!("fixtures/submissions.json")).unwrap()
}

#[test]
fn test_parse_submissions() {
    let company = fixture();
    assert_eq!(company.cik, "6201");
    assert_eq!(company.name, "American Airlines Group Inc.");

    let filings = company.filings.recent.filings();
    assert_eq!(filings.len(), 8);
    assert_eq!(filings[0].form, "8-K");
    assert_eq!(
        filings[0].filing_date,
        NaiveDate::from_ymd_opt(2023, 10, 19).unwrap()
    );

    let page = &company.filings.files[0];
    assert_eq!(page.filing_count, 2000);
    assert_eq!(page.filing_to, NaiveDate::from_ymd_opt(2023, 2, 10).unwrap());
}

#[test]
fn test_second_quarter_selection() {
    let company = fixture();
    let window = FilingWindow::for_period(2023, Quarter::Q2).unwrap();
    let selection = select_filings(&company.filings.recent.filings(), &window);

    let forms: Vec<&str> = selection.filings.iter().map(|f| f.form.as_str()).collect();
    assert_eq!(forms, ["10-Q", "8-K", "8-K", "10-Q"]);
    assert!(selection.reached_start);

    // The older page ends before the window, so no further paging is needed
    assert!(company.filings.files[0].filing_to < window.start);
}

#[test]
fn test_full_year_selection_spans_next_year() {
    let company = fixture();
    let window = FilingWindow::for_period(2022, Quarter::FullYear).unwrap();
    let selection = select_filings(&company.filings.recent.filings(), &window);

    let forms: Vec<&str> = selection.filings.iter().map(|f| f.form.as_str()).collect();
    assert_eq!(forms, ["10-K"]);
    assert!(!selection.reached_start);
}

#[test]
fn test_digest_from_fixture() {
    let company = fixture();
    let window = FilingWindow::for_period(2023, Quarter::Q3).unwrap();
    let selection = select_filings(&company.filings.recent.filings(), &window);
    let period = PeriodFilings {
        cik: company.cik.clone(),
        company: company.name.clone(),
        window,
        filings: selection.filings,
    };

    let request = InsightRequest::new("AAL", 2023, Quarter::Q3);
    let digest = render_digest(&request, &period);
    assert!(digest.starts_with("AAL 2023 Q3 (American Airlines Group Inc.)"));
    // The second-quarter 10-Q is filed inside the third-quarter window too
    assert!(digest.contains("3 filings: 1 10-Q, 2 8-K"));
    assert!(digest.contains("edgar/data/6201/000000620123000041/aal-20231019.htm"));
}
