pub mod auth;
pub mod events;
pub mod feed;
pub mod saved_state;

pub use auth::{FirebaseAuthConfig, FirebaseAuthService, InMemoryAuthService};
pub use events::ChannelAuthEventEmitter;
pub use feed::InMemoryFeedSource;
pub use saved_state::{InMemorySavedState, JsonFileSavedState};
