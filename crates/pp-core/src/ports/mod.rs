//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and infrastructure
//! implementations. Use cases hold them as `Arc<dyn Port>`; concrete adapters
//! are chosen once, at bootstrap.

pub mod auth_event;
pub mod auth_service;
pub mod feed_source;
pub mod saved_state;

pub use auth_event::{AuthEvent, AuthEventPort};
pub use auth_service::{AuthServiceError, AuthServicePort};
pub use feed_source::{FeedPage, FeedSourceError, FeedSourcePort, FeedSubscription};
pub use saved_state::{SavedStateError, SavedStatePort};
