use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use reqwest::{Client, StatusCode};

use crate::app::{DriftError, Result};
use crate::config::SourceDefinition;
use crate::fetcher::{FetchOutcome, Fetcher};

pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Attempts per fetch, counting the first one. Applies to 429/503 and
/// network timeouts only.
const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 500;

const USER_AGENT: &str = concat!("driftwatch/", env!("CARGO_PKG_VERSION"));

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .gzip(true)
            .brotli(true)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        source: &SourceDefinition,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> Result<FetchOutcome> {
        let mut headers = HeaderMap::new();

        if let Some(etag) = etag {
            if let Ok(value) = HeaderValue::from_str(etag) {
                headers.insert(IF_NONE_MATCH, value);
            }
        }

        if let Some(last_modified) = last_modified {
            if let Ok(value) = HeaderValue::from_str(last_modified) {
                headers.insert(IF_MODIFIED_SINCE, value);
            }
        }

        for (name, value) in &source.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                headers.insert(name, value);
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;

            let response = match self
                .client
                .get(&source.url)
                .headers(headers.clone())
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) if e.is_timeout() || e.is_connect() => {
                    if attempt < MAX_ATTEMPTS {
                        backoff(attempt).await;
                        continue;
                    }
                    return Err(DriftError::Transient(format!(
                        "{} after {} attempts: {}",
                        source.url, attempt, e
                    )));
                }
                Err(e) => return Err(DriftError::Transient(e.to_string())),
            };

            let status = response.status();

            if status == StatusCode::NOT_MODIFIED {
                return Ok(FetchOutcome::NotModified);
            }

            if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::SERVICE_UNAVAILABLE
            {
                if attempt < MAX_ATTEMPTS {
                    tracing::debug!(url = %source.url, %status, attempt, "retrying after backoff");
                    backoff(attempt).await;
                    continue;
                }
                return Err(DriftError::Transient(format!(
                    "HTTP {} from {} after {} attempts",
                    status, source.url, attempt
                )));
            }

            if status.is_client_error() || status.is_server_error() {
                return Err(DriftError::Permanent(format!(
                    "HTTP {} from {}",
                    status, source.url
                )));
            }

            let etag = response
                .headers()
                .get("etag")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let last_modified = response
                .headers()
                .get("last-modified")
                .and_then(|v| v.to_str().ok())
                .map(String::from);

            let body = response.text().await?;

            return Ok(FetchOutcome::Content {
                body,
                etag,
                last_modified,
            });
        }
    }
}

async fn backoff(attempt: u32) {
    let delay = BACKOFF_BASE_MS * 2u64.pow(attempt - 1);
    tokio::time::sleep(Duration::from_millis(delay)).await;
}
