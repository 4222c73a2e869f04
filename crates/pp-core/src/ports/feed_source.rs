use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::feed::{FeedQuery, PostFeedItem};

#[derive(Debug, thiserror::Error)]
pub enum FeedSourceError {
    #[error("feed source unavailable: {0}")]
    Unavailable(String),
}

/// One snapshot of the feed, or the error the listener reported.
pub type FeedPage = Result<Vec<PostFeedItem>, FeedSourceError>;

type CancelHook = Box<dyn FnOnce() + Send>;

/// A live feed subscription.
///
/// Pages arrive in the order the source produced them. The cancel hook runs
/// exactly once, on [`FeedSubscription::cancel`] or on drop.
pub struct FeedSubscription {
    pages: mpsc::Receiver<FeedPage>,
    on_cancel: Option<CancelHook>,
}

impl FeedSubscription {
    pub fn new(pages: mpsc::Receiver<FeedPage>, on_cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            pages,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Next page, `None` once the source closed the subscription.
    pub async fn next_page(&mut self) -> Option<FeedPage> {
        self.pages.recv().await
    }

    pub fn cancel(mut self) {
        self.run_cancel_hook();
    }

    fn run_cancel_hook(&mut self) {
        if let Some(hook) = self.on_cancel.take() {
            self.pages.close();
            hook();
        }
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.run_cancel_hook();
    }
}

impl std::fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("cancelled", &self.on_cancel.is_none())
            .finish()
    }
}

/// Real-time source of feed pages.
#[async_trait]
pub trait FeedSourcePort: Send + Sync {
    async fn subscribe(&self, query: FeedQuery) -> Result<FeedSubscription, FeedSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancel_hook_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel(4);
        let counter = calls.clone();
        let subscription = FeedSubscription::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        subscription.cancel();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn drop_runs_cancel_hook() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (_tx, rx) = mpsc::channel(4);
        let counter = calls.clone();
        {
            let _subscription = FeedSubscription::new(rx, move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pages_arrive_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let mut subscription = FeedSubscription::new(rx, || {});
        tx.send(Ok(Vec::new())).await.unwrap();
        tx.send(Err(FeedSourceError::Unavailable("offline".into())))
            .await
            .unwrap();
        drop(tx);

        assert!(matches!(subscription.next_page().await, Some(Ok(_))));
        assert!(matches!(subscription.next_page().await, Some(Err(_))));
        assert!(subscription.next_page().await.is_none());
    }
}
