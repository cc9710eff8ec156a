//! Infinite-scrolling terminal feed of generated tweets.
//!
//! [`session::FeedSession`] owns the feed state and decides when to load;
//! [`loader`] runs one load at a time against a [`feeds::TweetSource`];
//! [`sentinel::ListViewport`] reports when the end of the feed scrolls into view.

pub mod app;
pub mod config;
pub mod feeds;
pub mod loader;
pub mod logging;
pub mod sentinel;
pub mod session;
pub mod topic;
pub mod ui;
