use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Cutoff date ({cutoff}) is before the scan start date ({current})")]
    CutoffInPast { current: NaiveDate, cutoff: NaiveDate },
    #[error(
        "Scan from {current} to {cutoff} crosses a year boundary; \
         month comparison does not wrap past December"
    )]
    YearBoundary { current: NaiveDate, cutoff: NaiveDate },
}

/// One scan run: check every month from the current month through the
/// cutoff month inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRequest {
    current: NaiveDate,
    cutoff: NaiveDate,
}

impl ScanRequest {
    /// Comparison below works on raw month/day integers, so a range that
    /// crosses into the next year is rejected up front instead of being
    /// silently mis-compared.
    pub fn new(current: NaiveDate, cutoff: NaiveDate) -> Result<Self, RequestError> {
        if cutoff < current {
            return Err(RequestError::CutoffInPast { current, cutoff });
        }
        if cutoff.year() != current.year() {
            return Err(RequestError::YearBoundary { current, cutoff });
        }
        Ok(Self { current, cutoff })
    }

    pub fn first_month(&self) -> u32 {
        self.current.month()
    }

    pub fn cutoff_month(&self) -> u32 {
        self.cutoff.month()
    }

    pub fn cutoff_day(&self) -> u32 {
        self.cutoff.day()
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn months_to_scan(&self) -> u32 {
        self.cutoff_month() - self.first_month() + 1
    }

    pub fn compare(&self, finding: &AvailabilityFinding) -> Comparison {
        if finding.month < self.cutoff_month() {
            Comparison::EarlierMonth
        } else if finding.month == self.cutoff_month() && finding.day < self.cutoff_day() {
            Comparison::EarlierDay
        } else {
            Comparison::NotEarlier
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    EarlierMonth,
    EarlierDay,
    NotEarlier,
}

/// A rendered calendar page for one month. Discarded after parsing.
#[derive(Debug, Clone)]
pub struct MonthPage {
    pub month: u32,
    pub html: String,
}

/// One day with at least one bookable slot, as parsed from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityFinding {
    pub month: u32,
    pub day: u32,
}

impl Display for AvailabilityFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match month_name(self.month) {
            Some(name) => write!(f, "{} {}", name, self.day),
            None => write!(f, "month {} day {}", self.month, self.day),
        }
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    Some(match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub finding: AvailabilityFinding,
    pub comparison: Comparison,
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.comparison {
            Comparison::EarlierDay => write!(f, "SAME MONTH, EARLIER DAY: {}", self.finding),
            _ => write!(f, "EARLIER MONTH: {}", self.finding),
        }
    }
}

/// Findings earlier than the cutoff, accumulated across all scanned months.
/// Sent as a single notification body when non-empty.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn push(&mut self, finding: AvailabilityFinding, comparison: Comparison) {
        self.entries.push(ReportEntry {
            finding,
            comparison,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn body(&self) -> String {
        let mut out = String::from("Found earlier dates:\n");
        for entry in &self.entries {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(current: NaiveDate, cutoff: NaiveDate) -> ScanRequest {
        ScanRequest::new(current, cutoff).expect("valid request")
    }

    #[test]
    fn test_earlier_month_reported_regardless_of_day() {
        let req = request(date(2025, 11, 1), date(2025, 12, 9));
        for day in [1, 9, 28, 31] {
            assert_eq!(
                req.compare(&AvailabilityFinding { month: 11, day }),
                Comparison::EarlierMonth,
                "November {} should be earlier by month",
                day
            );
        }
    }

    #[test]
    fn test_same_month_compares_days() {
        let req = request(date(2025, 12, 1), date(2025, 12, 9));
        assert_eq!(
            req.compare(&AvailabilityFinding { month: 12, day: 3 }),
            Comparison::EarlierDay
        );
        assert_eq!(
            req.compare(&AvailabilityFinding { month: 12, day: 8 }),
            Comparison::EarlierDay
        );
        assert_eq!(
            req.compare(&AvailabilityFinding { month: 12, day: 9 }),
            Comparison::NotEarlier,
            "The cutoff day itself is not earlier"
        );
        assert_eq!(
            req.compare(&AvailabilityFinding { month: 12, day: 15 }),
            Comparison::NotEarlier
        );
    }

    #[test]
    fn test_later_month_never_earlier() {
        let req = request(date(2025, 10, 1), date(2025, 11, 20));
        assert_eq!(
            req.compare(&AvailabilityFinding { month: 12, day: 1 }),
            Comparison::NotEarlier
        );
    }

    #[test]
    fn test_request_rejects_cutoff_in_past() {
        let err = ScanRequest::new(date(2025, 12, 10), date(2025, 12, 9)).unwrap_err();
        assert!(matches!(err, RequestError::CutoffInPast { .. }));
    }

    #[test]
    fn test_request_rejects_year_boundary() {
        let err = ScanRequest::new(date(2025, 11, 20), date(2026, 1, 5)).unwrap_err();
        assert!(matches!(err, RequestError::YearBoundary { .. }));
    }

    #[test]
    fn test_months_to_scan_is_inclusive() {
        let req = request(date(2025, 10, 14), date(2025, 12, 9));
        assert_eq!(req.first_month(), 10);
        assert_eq!(req.cutoff_month(), 12);
        assert_eq!(req.months_to_scan(), 3);

        let single = request(date(2025, 12, 1), date(2025, 12, 9));
        assert_eq!(single.months_to_scan(), 1);
    }

    #[test]
    fn test_report_body_format() {
        let mut report = Report::default();
        report.push(
            AvailabilityFinding { month: 11, day: 28 },
            Comparison::EarlierMonth,
        );
        report.push(
            AvailabilityFinding { month: 12, day: 3 },
            Comparison::EarlierDay,
        );

        let body = report.body();
        assert!(body.starts_with("Found earlier dates:\n"));
        assert!(body.contains("EARLIER MONTH: November 28"));
        assert!(body.contains("SAME MONTH, EARLIER DAY: December 3"));
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn test_month_name_lookup() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(13), None);
        assert_eq!(month_name(0), None);
    }

    #[test]
    fn test_finding_display() {
        let finding = AvailabilityFinding { month: 12, day: 4 };
        assert_eq!(finding.to_string(), "December 4");
    }
}
