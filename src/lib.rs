mod parser;
pub mod notify;
pub mod scan;
pub mod scraper;
pub mod types;

pub use scan::scan;
pub use scraper::WebScraper;

/// Substring Calendly renders when a month has zero availability.
pub(crate) const NO_TIMES_MARKER: &str = "No times in";

pub const DEFAULT_CALENDAR_URL: &str =
    "https://calendly.com/d/cpg8-rvf-4hq/jsm-virtual-lease-signing?month=2025-";
