//! Feed session state: topic, accumulated tweets, page cursor and the
//! single in-flight load.
//!
//! The session never performs I/O. Operations that may start a load hand
//! back a [`LoadRequest`]; the caller runs it and feeds the result to
//! [`FeedSession::complete`].

use crate::feeds::{FetchError, Tweet};
use tracing::{debug, info, warn};

pub const FIRST_PAGE: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    /// Topic generation the request was issued under.
    pub generation: u64,
    pub topic: String,
    pub page: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Tweets were appended to the feed.
    Appended(usize),
    /// The load failed; the feed is unchanged.
    Failed,
    /// The response belonged to an older topic and was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completed {
    pub applied: Applied,
    /// A load that was waiting for the previous one to resolve.
    pub next: Option<LoadRequest>,
}

#[derive(Debug)]
pub struct FeedSession {
    topic: String,
    tweets: Vec<Tweet>,
    cursor: u32,
    generation: u64,
    in_flight: Option<LoadRequest>,
    /// A load for the current (topic, cursor) is owed but could not start yet.
    queued: bool,
    last_error: Option<String>,
}

impl FeedSession {
    /// A fresh session for `topic`. The first page is queued; call
    /// [`FeedSession::next_request`] to start it.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tweets: Vec::new(),
            cursor: FIRST_PAGE,
            generation: 0,
            in_flight: None,
            queued: true,
            last_error: None,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn state(&self) -> LoadState {
        if self.is_loading() {
            LoadState::Loading
        } else {
            LoadState::Idle
        }
    }

    pub fn in_flight(&self) -> Option<&LoadRequest> {
        self.in_flight.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Starts the queued load if nothing is in flight.
    pub fn next_request(&mut self) -> Option<LoadRequest> {
        if self.in_flight.is_some() || !self.queued {
            return None;
        }

        self.queued = false;
        let request = LoadRequest {
            generation: self.generation,
            topic: self.topic.clone(),
            page: self.cursor,
        };
        debug!(topic = %request.topic, page = request.page, generation = request.generation, "load started");
        self.in_flight = Some(request.clone());
        Some(request)
    }

    /// Replaces the topic and resets the feed. Any empty string is a valid topic.
    ///
    /// If a load is in flight the new topic's first page waits for it; the
    /// old response is dropped when it arrives.
    pub fn submit_topic(&mut self, text: impl Into<String>) -> Option<LoadRequest> {
        self.topic = text.into();
        self.tweets.clear();
        self.cursor = FIRST_PAGE;
        self.generation += 1;
        self.last_error = None;
        self.queued = true;
        info!(topic = %self.topic, generation = self.generation, "topic submitted");

        self.next_request()
    }

    /// Sentinel scrolled into view. Ignored while a load is in flight.
    pub fn on_visible(&mut self) -> Option<LoadRequest> {
        if self.is_loading() {
            debug!("sentinel visible while loading, ignored");
            return None;
        }

        self.cursor += 1;
        self.queued = true;
        self.next_request()
    }

    /// Applies the result of `request` and clears the in-flight flag.
    pub fn complete(
        &mut self,
        request: &LoadRequest,
        result: Result<Vec<Tweet>, FetchError>,
    ) -> Completed {
        if self.in_flight.as_ref() != Some(request) {
            warn!(
                topic = %request.topic,
                page = request.page,
                "completion for a load that is not in flight"
            );
            return Completed {
                applied: Applied::Stale,
                next: None,
            };
        }
        self.in_flight = None;

        let applied = if request.generation != self.generation {
            debug!(
                topic = %request.topic,
                generation = request.generation,
                current = self.generation,
                "dropping stale response"
            );
            Applied::Stale
        } else {
            match result {
                Ok(tweets) => {
                    let count = tweets.len();
                    self.tweets.extend(tweets);
                    self.last_error = None;
                    info!(
                        topic = %self.topic,
                        page = request.page,
                        count,
                        total = self.tweets.len(),
                        "page appended"
                    );
                    Applied::Appended(count)
                }
                Err(err) => {
                    self.last_error = Some(err.to_string());
                    Applied::Failed
                }
            }
        };

        Completed {
            applied,
            next: self.next_request(),
        }
    }
}

impl Default for FeedSession {
    fn default() -> Self {
        Self::new("random")
    }
}
