use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT_LANGUAGE, HeaderMap, HeaderValue};

use crate::NO_TIMES_MARKER;
use crate::types::MonthPage;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of rendered month pages. The scan loop only depends on this
/// trait, so tests can feed it canned documents instead of a live site.
#[allow(async_fn_in_trait)]
pub trait MonthSource {
    async fn load_month(&self, month: u32) -> Result<MonthPage, FetchError>;
}

// Calendly serves a degraded page to obvious bots; present a desktop UA.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

const NAVIGATION_TIMEOUT: Duration = Duration::from_secs(60);
const MARKER_WAIT: Duration = Duration::from_secs(20);
const SETTLE_POLL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    calendar_url: String,
    marker_wait: Duration,
    settle_poll: Duration,
}

impl WebScraper {
    /// `calendar_url` is the month-scoped URL prefix; the month number is
    /// appended as a plain decimal, e.g. `...?month=2025-` + `12`.
    pub fn new(calendar_url: &str) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(NAVIGATION_TIMEOUT)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            calendar_url: calendar_url.to_string(),
            marker_wait: MARKER_WAIT,
            settle_poll: SETTLE_POLL,
        })
    }

    pub fn with_settle(mut self, marker_wait: Duration, settle_poll: Duration) -> Self {
        self.marker_wait = marker_wait;
        self.settle_poll = settle_poll;
        self
    }

    pub fn month_url(&self, month: u32) -> String {
        format!("{}{}", self.calendar_url, month)
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        Ok(self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }

    /// Waits a bounded window for the "no availability" banner to render.
    /// If the window closes without it, the last document is handed to
    /// per-day parsing; a slow page and a page with real slots are
    /// indistinguishable at this point. Re-fetch failures inside the
    /// window are logged and swallowed, the last good document stands.
    async fn settle(&self, url: &str, mut html: String) -> String {
        let deadline = tokio::time::Instant::now() + self.marker_wait;
        while !html.contains(NO_TIMES_MARKER) && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(self.settle_poll).await;
            match self.get_html(url).await {
                Ok(fresh) => html = fresh,
                Err(e) => log::warn!("Re-fetch while waiting for marker failed: {}", e),
            }
        }
        html
    }
}

impl MonthSource for WebScraper {
    async fn load_month(&self, month: u32) -> Result<MonthPage, FetchError> {
        let url = self.month_url(month);
        log::info!("Loading {}", url);
        let html = self.get_html(&url).await?;
        log::debug!("Done loading page.");
        let html = self.settle(&url, html).await;
        Ok(MonthPage { month, html })
    }
}
