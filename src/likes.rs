//! Like Count Provider
//!
//! Thin client for the external likes service. This is the only I/O on the
//! trending request path, so the request carries a bounded timeout and every
//! failure mode - connect error, timeout, non-2xx, malformed payload -
//! degrades to an empty count map instead of surfacing to the caller. No
//! retries: counts are re-fetched on every trending computation anyway, so a
//! retry would only add page latency.

use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::Result;

/// Mapping from recording id to like count; an absent key means zero.
pub type LikeCounts = HashMap<String, u64>;

/// HTTP client for the likes service. The endpoint returns a flat JSON
/// object of recording id to count.
#[derive(Debug, Clone)]
pub struct HttpLikeProvider {
    client: Client,
    endpoint: String,
}

impl HttpLikeProvider {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch the current like counts.
    pub async fn fetch_like_counts(&self) -> Result<LikeCounts> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?;
        let counts: LikeCounts = response.json().await?;
        debug!("Fetched like counts for {} recordings", counts.len());
        Ok(counts)
    }

    /// Fetch like counts, degrading any failure to an empty map. Trending
    /// then ranks purely on recency and feature bonuses.
    pub async fn fetch_like_counts_or_empty(&self) -> LikeCounts {
        match self.fetch_like_counts().await {
            Ok(counts) => counts,
            Err(e) => {
                warn!("Like count fetch failed, degrading to zero counts: {e}");
                LikeCounts::new()
            }
        }
    }
}
