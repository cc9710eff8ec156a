pub mod tweets;

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// One generated tweet as served by `/tweets/{topic}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tweet {
    #[serde(rename = "user_name", default)]
    pub author: String,
    pub text: String,
    /// Display-only ("1h ago", "Just now"); never parsed.
    #[serde(rename = "datetime", default)]
    pub timestamp: String,
}

/// Response body of the tweets endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TweetPage {
    pub tweets: Vec<Tweet>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("server returned HTTP {0}")]
    HttpStatus(u16),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A remote source of tweet pages.
///
/// `page` starts at 1. Implementations are free to ignore it; the stock
/// server returns one fresh batch per call regardless of cursor.
#[async_trait]
pub trait TweetSource: Send + Sync {
    async fn load_page(&self, topic: &str, page: u32) -> Result<Vec<Tweet>, FetchError>;
}
