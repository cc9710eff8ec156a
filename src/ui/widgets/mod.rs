pub mod topic_bar;
pub mod tweet_list;

pub use topic_bar::TopicBar;
pub use tweet_list::{Footer, TweetList};
