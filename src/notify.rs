use std::time::Duration;

use reqwest::{Client, StatusCode};

pub const DEFAULT_NTFY_BASE: &str = "https://ntfy.sh";

const TITLE: &str = "Calendly Slot";
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ntfy returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Fire-and-forget push notifications to an ntfy topic. The caller decides
/// whether a failure matters; here it never does more than get logged.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    url: String,
    topic: String,
}

impl Notifier {
    pub fn new(topic: &str) -> Result<Self, NotifyError> {
        Self::with_base(DEFAULT_NTFY_BASE, topic)
    }

    pub fn with_base(base: &str, topic: &str) -> Result<Self, NotifyError> {
        let client = Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            client,
            url: format!("{}/{}", base.trim_end_matches('/'), topic),
            topic: topic.to_string(),
        })
    }

    /// Sends one message with a fixed title at high priority. Anything
    /// other than a 200 is an error; there is no retry.
    pub async fn send(&self, body: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .header("Title", TITLE)
            .header("Priority", "high")
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status { status, body });
        }

        log::info!("Notification sent to ntfy topic '{}'", self.topic);
        Ok(())
    }
}
