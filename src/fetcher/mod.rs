pub mod http_fetcher;

use async_trait::async_trait;

use crate::app::Result;
use crate::config::SourceDefinition;

pub use http_fetcher::HttpFetcher;

#[derive(Debug)]
pub enum FetchOutcome {
    /// Fresh content fetched successfully.
    Content {
        body: String,
        etag: Option<String>,
        last_modified: Option<String>,
    },
    /// Content not modified (HTTP 304).
    NotModified,
}

/// Conditional retrieval for one source. Transient and permanent failures
/// surface as `DriftError::Transient` / `DriftError::Permanent`; retry state
/// is local to a single call.
#[async_trait]
pub trait Fetcher {
    async fn fetch(
        &self,
        source: &SourceDefinition,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> Result<FetchOutcome>;
}
