//! PixelPost Application Orchestration Layer
//!
//! This crate contains the sign-in, session and feed use cases.

pub mod app;
pub mod deps;
pub mod usecases;

pub use app::App;
pub use deps::AppDeps;
pub use usecases::{
    FeedStream, GetCurrentUser, SignInFormController, SignOut, SubmitOutcome, WatchFeed,
};
