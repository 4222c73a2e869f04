//! Submission state machine.
//!
//! Defines a pure state transition function for one sign-in attempt.

use serde::{Deserialize, Serialize};

use super::secret::SecretString;
use super::user::UserIdentity;

/// Lifecycle of a sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Waiting for the auth backend.
    Submitting,
    Authenticated {
        user: UserIdentity,
    },
    /// The attempt failed. All failures land here; `reason` is informational.
    Unauthenticated {
        reason: AuthFailure,
    },
}

impl SubmissionState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Authenticated { .. } | Self::Unauthenticated { .. }
        )
    }

    /// Variant name, safe to log (carries no user data).
    pub fn status(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Authenticated { .. } => "authenticated",
            Self::Unauthenticated { .. } => "unauthenticated",
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        match self {
            Self::Authenticated { user } => Some(user),
            _ => None,
        }
    }
}

/// Coarse classification of a failed sign-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailure {
    InvalidCredentials,
    UserDisabled,
    TooManyAttempts,
    Network,
    Other,
}

/// Events that drive a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// User submits a form that passed validation.
    Submit {
        identifier: String,
        password: SecretString,
    },
    /// Auth backend accepted the credentials.
    SignInSucceeded { user: UserIdentity },
    /// Auth backend rejected the credentials or could not be reached.
    SignInFailed { reason: AuthFailure },
}

/// Side-effects produced by state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionAction {
    /// Call the auth backend.
    SignIn {
        identifier: String,
        password: SecretString,
    },
}

/// Pure submission state machine: no side effects.
pub struct SubmissionStateMachine;

impl SubmissionStateMachine {
    pub fn transition(
        state: SubmissionState,
        event: SubmissionEvent,
    ) -> (SubmissionState, Vec<SubmissionAction>) {
        match (state, event) {
            // Only one outstanding sign-in; a second submit is ignored.
            (SubmissionState::Submitting, SubmissionEvent::Submit { .. }) => {
                (SubmissionState::Submitting, Vec::new())
            }
            (_, SubmissionEvent::Submit { identifier, password }) => (
                SubmissionState::Submitting,
                vec![SubmissionAction::SignIn {
                    identifier,
                    password,
                }],
            ),
            (SubmissionState::Submitting, SubmissionEvent::SignInSucceeded { user }) => {
                (SubmissionState::Authenticated { user }, Vec::new())
            }
            (SubmissionState::Submitting, SubmissionEvent::SignInFailed { reason }) => {
                (SubmissionState::Unauthenticated { reason }, Vec::new())
            }
            // Results arriving outside a submission are stale.
            (state, _event) => (state, Vec::new()),
        }
    }
}
