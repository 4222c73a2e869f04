use async_trait::async_trait;

use crate::auth::{AuthFailure, SecretString, UserIdentity};

/// Errors reported by an auth backend.
///
/// Use cases collapse these into [`AuthFailure`]; they never reach the UI as-is.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("user not found")]
    UserNotFound,

    #[error("user account is disabled")]
    UserDisabled,

    #[error("too many attempts, try again later")]
    TooManyAttempts,

    #[error("no user is signed in")]
    NotSignedIn,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected backend response: {0}")]
    Unexpected(String),
}

impl AuthServiceError {
    pub fn failure(&self) -> AuthFailure {
        match self {
            Self::InvalidCredentials | Self::UserNotFound => AuthFailure::InvalidCredentials,
            Self::UserDisabled => AuthFailure::UserDisabled,
            Self::TooManyAttempts => AuthFailure::TooManyAttempts,
            Self::Transport(_) => AuthFailure::Network,
            Self::NotSignedIn | Self::Unexpected(_) => AuthFailure::Other,
        }
    }
}

/// Credential verification against a remote auth backend.
#[async_trait]
pub trait AuthServicePort: Send + Sync {
    /// Verify credentials and start a session.
    async fn sign_in(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthServiceError>;

    /// The user of the current session.
    async fn current_user(&self) -> Result<UserIdentity, AuthServiceError>;

    async fn sign_out(&self) -> Result<(), AuthServiceError>;
}
