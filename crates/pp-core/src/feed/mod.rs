//! Photo feed domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of posts in one feed page.
pub const DEFAULT_FEED_PAGE_SIZE: usize = 20;

/// A post as shown in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFeedItem {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_profile_image_url: Option<String>,
    pub image_urls: Vec<String>,
    /// Cover image; the first entry of `image_urls` for carousels.
    pub image_url: String,
    pub is_carousel: bool,
    pub caption: Option<String>,
    pub location: Option<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub likes_count: u32,
    pub comments_count: u32,
    pub share_count: u32,
    pub share_url: Option<String>,
}

/// Parameters of a feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub limit: usize,
}

impl Default for FeedQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_FEED_PAGE_SIZE,
        }
    }
}

/// Order posts newest first and keep at most `limit`.
pub fn newest_first(mut posts: Vec<PostFeedItem>, limit: usize) -> Vec<PostFeedItem> {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    posts.truncate(limit);
    posts
}
