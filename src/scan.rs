use crate::parser::{self, ParseError};
use crate::scraper::{FetchError, MonthSource};
use crate::types::{Comparison, Report, ScanRequest, month_name};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to load month page: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to parse month page: {0}")]
    Parse(#[from] ParseError),
}

/// Walks every month from the current month through the cutoff month
/// inclusive, strictly in sequence, and accumulates the findings that
/// precede the cutoff. A navigation failure aborts the whole scan; a
/// month with the "no times" banner just contributes nothing.
pub async fn scan<S: MonthSource>(source: &S, request: &ScanRequest) -> Result<Report, ScanError> {
    let mut report = Report::default();

    for month in request.first_month()..=request.cutoff_month() {
        let name = month_name(month).unwrap_or("?");
        log::info!("Checking month: {}", name);

        let page = source.load_month(month).await?;

        if parser::has_no_times_marker(&page.html) {
            log::info!("No available times in {}", name);
            continue;
        }

        for finding in parser::parse_available_days(&page.html, month)? {
            match request.compare(&finding) {
                Comparison::EarlierMonth => {
                    log::info!("EARLIER MONTH: {}", finding);
                    report.push(finding, Comparison::EarlierMonth);
                }
                Comparison::EarlierDay => {
                    log::info!("Same month, earlier day: {}", finding);
                    report.push(finding, Comparison::EarlierDay);
                }
                Comparison::NotEarlier => {
                    log::debug!("Not earlier than cutoff: {}", finding);
                }
            }
        }
    }

    Ok(report)
}
