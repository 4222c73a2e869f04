//! Sign-in use cases.
//!
//! This module exposes the sign-in form controller.

mod context;
pub mod controller;

pub use controller::{SignInFormController, SubmitOutcome};
