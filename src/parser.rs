use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::NO_TIMES_MARKER;
use crate::types::AvailabilityFinding;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Day label '{0}' contains no digits")]
    MissingDay(String),
    #[error("Digits in label '{0}' do not fit in a day value")]
    DayOverflow(String),
}

// Calendly labels bookable days like "Thursday, December 4 - Times available".
static RE_TIMES_AVAILABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Times available$").expect("invalid regex: times available"));

/// A month with zero availability renders a fixed "No times in <month>"
/// banner. Its absence is what tells us per-day parsing is worth doing.
pub fn has_no_times_marker(html: &str) -> bool {
    html.contains(NO_TIMES_MARKER)
}

/// Enumerates the per-day buttons whose accessible label ends in the
/// "Times available" suffix and extracts one finding per button.
pub fn parse_available_days(
    html: &str,
    month: u32,
) -> Result<Vec<AvailabilityFinding>, ParseError> {
    let document = Html::parse_document(html);
    let button_sel = Selector::parse("button[aria-label]").expect("invalid selector: day buttons");

    let mut findings = Vec::new();
    for button in document.select(&button_sel) {
        let Some(label) = button.value().attr("aria-label") else {
            continue;
        };
        if !RE_TIMES_AVAILABLE.is_match(label) {
            continue;
        }
        let day = extract_day(label)?;
        findings.push(AvailabilityFinding { month, day });
    }
    Ok(findings)
}

/// Concatenates every ASCII digit of the label, in order, and parses the
/// result as the day-of-month. Labels are expected to carry the day as
/// their only numeric run; a label that also contains a year would yield
/// a composite number like 42025. That fragility comes with the source
/// format and is pinned by a test rather than papered over.
fn extract_day(label: &str) -> Result<u32, ParseError> {
    let digits: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(ParseError::MissingDay(label.to_string()));
    }
    digits
        .parse()
        .map_err(|_| ParseError::DayOverflow(label.to_string()))
}
