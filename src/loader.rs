use crate::feeds::{FetchError, Tweet, TweetSource};
use crate::session::LoadRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

/// Result of one page load, tagged with the request that produced it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub request: LoadRequest,
    pub result: Result<Vec<Tweet>, FetchError>,
}

/// Runs `request` against `source`, giving up after `timeout`.
pub async fn load(
    source: &dyn TweetSource,
    request: LoadRequest,
    timeout: Duration,
) -> LoadOutcome {
    let result = match tokio::time::timeout(
        timeout,
        source.load_page(&request.topic, request.page),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout(timeout)),
    };

    match &result {
        Ok(tweets) => debug!(
            topic = %request.topic,
            page = request.page,
            count = tweets.len(),
            "load finished"
        ),
        Err(err) => warn!(
            topic = %request.topic,
            page = request.page,
            error = %err,
            "load failed"
        ),
    }

    LoadOutcome { request, result }
}

/// Spawns [`load`] and posts the outcome on `tx`.
pub fn spawn_load(
    source: Arc<dyn TweetSource>,
    request: LoadRequest,
    timeout: Duration,
    tx: UnboundedSender<LoadOutcome>,
) {
    tokio::spawn(async move {
        let outcome = load(source.as_ref(), request, timeout).await;
        // Receiver gone means the app is shutting down.
        let _ = tx.send(outcome);
    });
}
