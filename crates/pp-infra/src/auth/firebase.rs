//! Firebase Authentication adapter
//!
//! Talks to the Identity Toolkit REST API (`accounts:signInWithPassword`).
//! The password provider only knows emails, so other identifiers are refused
//! before any request is made. The session lives in memory only; nothing
//! about it is persisted.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use pp_core::auth::{classify_identifier, IdentifierKind, SecretString, UserIdentity};
use pp_core::ports::{AuthServiceError, AuthServicePort};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const DEFAULT_IDENTITY_TOOLKIT_ENDPOINT: &str = "https://identitytoolkit.googleapis.com";

const SIGN_IN_PATH: &str = "/v1/accounts:signInWithPassword";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct FirebaseAuthConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,
    /// Base URL; point it at the auth emulator in tests.
    pub endpoint: String,
    pub timeout: Duration,
}

impl FirebaseAuthConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_IDENTITY_TOOLKIT_ENDPOINT.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: Option<String>,
    email: Option<String>,
    display_name: Option<String>,
    profile_picture: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseAuthService {
    client: reqwest::Client,
    config: FirebaseAuthConfig,
    session: RwLock<Option<UserIdentity>>,
}

impl FirebaseAuthService {
    pub fn new(config: FirebaseAuthConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build identity toolkit http client")?;

        Ok(Self {
            client,
            config,
            session: RwLock::new(None),
        })
    }

    fn sign_in_url(&self) -> String {
        format!(
            "{}{}",
            self.config.endpoint.trim_end_matches('/'),
            SIGN_IN_PATH
        )
    }
}

/// Map an Identity Toolkit error code to a port error.
///
/// Codes may carry a detail suffix, e.g. `TOO_MANY_ATTEMPTS_TRY_LATER : Access ...`.
fn map_error_code(message: &str) -> AuthServiceError {
    let code = message
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(':');

    match code {
        "EMAIL_NOT_FOUND" => AuthServiceError::UserNotFound,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL" => {
            AuthServiceError::InvalidCredentials
        }
        "USER_DISABLED" => AuthServiceError::UserDisabled,
        "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthServiceError::TooManyAttempts,
        _ => AuthServiceError::Unexpected(message.to_string()),
    }
}

fn into_identity(response: SignInResponse) -> Result<UserIdentity, AuthServiceError> {
    let uid = response
        .local_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AuthServiceError::Unexpected("user is null".to_string()))?;

    let mut user = UserIdentity::new(uid);
    user.email = response.email.filter(|v| !v.is_empty());
    user.display_name = response.display_name.filter(|v| !v.is_empty());
    user.photo_url = response.profile_picture.filter(|v| !v.is_empty());
    Ok(user)
}

#[async_trait]
impl AuthServicePort for FirebaseAuthService {
    async fn sign_in(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthServiceError> {
        if classify_identifier(identifier) != Some(IdentifierKind::Email) {
            debug!("refusing non-email identifier for password sign-in");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let request = SignInRequest {
            email: identifier,
            password: password.expose(),
            return_secure_token: true,
        };

        let response = self
            .client
            .post(self.sign_in_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| AuthServiceError::Transport(e.to_string()))?;
            let error = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => map_error_code(&envelope.error.message),
                Err(_) => AuthServiceError::Unexpected(format!("http status {status}")),
            };
            warn!(status = %status, error = %error, "identity toolkit rejected sign-in");
            return Err(error);
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthServiceError::Unexpected(e.to_string()))?;
        let user = into_identity(body)?;

        info!(uid = %user.uid, "identity toolkit sign-in succeeded");
        *self.session.write().await = Some(user.clone());
        Ok(user)
    }

    async fn current_user(&self) -> Result<UserIdentity, AuthServiceError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(AuthServiceError::NotSignedIn)
    }

    async fn sign_out(&self) -> Result<(), AuthServiceError> {
        if self.session.write().await.take().is_some() {
            info!("signed out");
        }
        Ok(())
    }
}
