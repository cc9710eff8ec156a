use super::{FetchError, Tweet, TweetPage, TweetSource};
use crate::config::PageParam;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct HttpTweetSource {
    base_url: String,
    page_param: PageParam,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTweetSource {
    pub fn new(base_url: impl Into<String>, page_param: PageParam, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tweetfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_param,
            timeout,
            client,
        }
    }

    /// `{base}/tweets/{topic}`, with `?page=N` only when paging is forwarded.
    fn page_url(&self, topic: &str, page: u32) -> String {
        let url = format!("{}/tweets/{}", self.base_url, urlencoding::encode(topic));
        match self.page_param {
            PageParam::Ignore => url,
            PageParam::Query => format!("{}?page={}", url, page),
        }
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else if let Some(status) = err.status() {
            FetchError::HttpStatus(status.as_u16())
        } else {
            FetchError::Network(err)
        }
    }
}

#[async_trait]
impl TweetSource for HttpTweetSource {
    async fn load_page(&self, topic: &str, page: u32) -> Result<Vec<Tweet>, FetchError> {
        let url = self.page_url(topic, page);
        debug!(%url, page, "requesting tweets");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        let page: TweetPage = serde_json::from_slice(&body)?;

        Ok(page.tweets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(page_param: PageParam) -> HttpTweetSource {
        HttpTweetSource::new(
            "http://localhost:5000/api/",
            page_param,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_page_url_ignores_page_by_default() {
        let source = source(PageParam::Ignore);
        assert_eq!(
            source.page_url("random", 7),
            "http://localhost:5000/api/tweets/random"
        );
    }

    #[test]
    fn test_page_url_with_query_param() {
        let source = source(PageParam::Query);
        assert_eq!(
            source.page_url("cats", 2),
            "http://localhost:5000/api/tweets/cats?page=2"
        );
    }

    #[test]
    fn test_page_url_encodes_topic_as_one_segment() {
        let source = source(PageParam::Ignore);
        assert_eq!(
            source.page_url("rust/async & you", 1),
            "http://localhost:5000/api/tweets/rust%2Fasync%20%26%20you"
        );
    }

    #[test]
    fn test_page_url_empty_topic() {
        let source = source(PageParam::Ignore);
        assert_eq!(source.page_url("", 1), "http://localhost:5000/api/tweets/");
    }
}
