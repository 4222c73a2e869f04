use std::sync::Arc;

use pp_core::feed::{FeedQuery, PostFeedItem};
use pp_core::ports::{FeedSourceError, FeedSourcePort, FeedSubscription};
use tracing::{debug, info_span, warn, Instrument};

/// Use case for following the photo feed.
pub struct WatchFeed {
    feed_source: Arc<dyn FeedSourcePort>,
}

impl WatchFeed {
    pub fn new(feed_source: Arc<dyn FeedSourcePort>) -> Self {
        Self { feed_source }
    }

    pub async fn execute(&self, query: FeedQuery) -> Result<FeedStream, FeedSourceError> {
        let span = info_span!("usecase.watch_feed.execute", limit = query.limit);

        async {
            let subscription = self.feed_source.subscribe(query).await?;
            debug!("feed subscription opened");
            Ok(FeedStream { subscription })
        }
        .instrument(span)
        .await
    }
}

/// Successful feed pages, in source order.
///
/// Failed pages are logged and skipped. Dropping the stream unsubscribes.
#[derive(Debug)]
pub struct FeedStream {
    subscription: FeedSubscription,
}

impl FeedStream {
    /// Next successful page, `None` once the source closed.
    pub async fn next(&mut self) -> Option<Vec<PostFeedItem>> {
        loop {
            match self.subscription.next_page().await? {
                Ok(posts) => return Some(posts),
                Err(err) => warn!(error = %err, "skipping failed feed page"),
            }
        }
    }

    pub fn cancel(self) {
        self.subscription.cancel();
    }
}
