//! Authentication domain module.
//!
//! Input validation, the sign-in form state and the submission state machine.

pub mod form;
pub mod secret;
pub mod submission;
pub mod user;
pub mod validation;

pub use form::{FormField, FormState, PASSWORD_SLOT_KEY, USERNAME_SLOT_KEY};
pub use secret::SecretString;
pub use submission::{
    AuthFailure, SubmissionAction, SubmissionEvent, SubmissionState, SubmissionStateMachine,
};
pub use user::UserIdentity;
pub use validation::{
    classify_identifier, validate_identifier, validate_password, IdentifierKind, ValidationError,
    ValidationOutcome,
};
