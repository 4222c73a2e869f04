//! # pp-core
//!
//! Core domain models and business logic for PixelPost sign-in.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod auth;
pub mod config;
pub mod feed;
pub mod ports;

// Re-export commonly used types at the crate root
pub use auth::{
    AuthFailure, FormState, IdentifierKind, SecretString, SubmissionState, UserIdentity,
    ValidationError, ValidationOutcome,
};
pub use config::AppConfig;
pub use feed::PostFeedItem;
