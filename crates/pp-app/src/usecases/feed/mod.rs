//! Feed use cases.

pub mod watch_feed;

pub use watch_feed::{FeedStream, WatchFeed};
