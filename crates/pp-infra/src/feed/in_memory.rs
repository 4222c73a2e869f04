use async_trait::async_trait;
use pp_core::feed::{newest_first, FeedQuery, PostFeedItem};
use pp_core::ports::{FeedSourceError, FeedSourcePort, FeedSubscription};
use tokio::sync::{mpsc, watch};
use tracing::debug;

const PAGE_BUFFER: usize = 8;

/// Feed source holding posts in memory.
///
/// Subscribers get the current page right away and a fresh page after every
/// [`InMemoryFeedSource::publish`], like a real-time snapshot listener.
pub struct InMemoryFeedSource {
    posts: watch::Sender<Vec<PostFeedItem>>,
}

impl InMemoryFeedSource {
    pub fn new(posts: Vec<PostFeedItem>) -> Self {
        let (posts, _) = watch::channel(posts);
        Self { posts }
    }

    pub fn publish(&self, post: PostFeedItem) {
        self.posts.send_modify(|posts| posts.push(post));
    }
}

#[async_trait]
impl FeedSourcePort for InMemoryFeedSource {
    async fn subscribe(&self, query: FeedQuery) -> Result<FeedSubscription, FeedSourceError> {
        let mut snapshots = self.posts.subscribe();
        let (tx, rx) = mpsc::channel(PAGE_BUFFER);

        let listener = tokio::spawn(async move {
            loop {
                let page = newest_first(snapshots.borrow_and_update().clone(), query.limit);
                if tx.send(Ok(page)).await.is_err() {
                    break;
                }
                if snapshots.changed().await.is_err() {
                    break;
                }
            }
            debug!("in-memory feed listener stopped");
        });

        Ok(FeedSubscription::new(rx, move || listener.abort()))
    }
}
