//! Business logic use cases
//!
//! [UI input] -> SignInFormController -> AuthServicePort
//! [session]  -> GetCurrentUser / SignOut
//! [feed]     -> WatchFeed -> FeedSourcePort

pub mod feed;
pub mod session;
pub mod sign_in;

pub use feed::{FeedStream, WatchFeed};
pub use session::{GetCurrentUser, SignOut};
pub use sign_in::{SignInFormController, SubmitOutcome};
