use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::Result;
use crate::notify::Notifier;

pub const WEBHOOK_URL_ENV: &str = "DRIFTWATCH_WEBHOOK_URL";

/// Posts the digest as JSON to a configured webhook endpoint.
pub struct WebhookNotifier {
    url: String,
    client: Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { url, client }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(WEBHOOK_URL_ENV).ok().map(Self::new)
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "subject": subject,
            "body": body,
        });

        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;

        tracing::info!(url = %self.url, "digest dispatched to webhook");
        Ok(())
    }
}
