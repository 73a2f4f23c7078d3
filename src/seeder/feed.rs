// Peer Feed - the upstream HTTP API serving the peer list
// Principle: the feed is untrusted; any surprise fails the whole fetch

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Upstream fetch timeout. A hung feed must not stall the refresh loop
/// beyond one missed cycle.
pub const FETCH_TIMEOUT_SECS: u64 = 5;

/// One entry of the upstream peer list.
///
/// Only the address string matters; it may combine host and port and may be
/// IPv6-bracketed. A missing `addr` field becomes the empty string, which
/// then fails normalization like any other malformed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPeerEntry {
    #[serde(default)]
    pub addr: String,
}

impl RawPeerEntry {
    #[cfg(test)]
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
        }
    }
}

/// Expected feed document: `{"result": [{"addr": "..."}, ...]}`.
/// Any other shape fails the fetch as a whole; there is no partial parse.
#[derive(Debug, Deserialize)]
struct FeedDocument {
    result: Vec<RawPeerEntry>,
}

/// Feed failures. All of these are transient from the seeder's point of
/// view: the refresher logs them and keeps the previous snapshot.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed feed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of raw peer entries.
///
/// The refresher only depends on this trait, so tests can inject a feed
/// without any network.
#[async_trait]
pub trait PeerFeed: Send + Sync + 'static {
    async fn fetch(&self) -> Result<Vec<RawPeerEntry>, FeedError>;
}

/// Production feed: HTTP GET against the configured API URL.
pub struct HttpPeerFeed {
    client: reqwest::Client,
    url: String,
}

impl HttpPeerFeed {
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PeerFeed for HttpPeerFeed {
    async fn fetch(&self) -> Result<Vec<RawPeerEntry>, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status()));
        }

        let body = response.text().await?;
        let document: FeedDocument = serde_json::from_str(&body)?;

        Ok(document.result)
    }
}
