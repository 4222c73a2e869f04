use std::collections::HashMap;

use async_trait::async_trait;
use pp_core::auth::{SecretString, UserIdentity};
use pp_core::ports::{AuthServiceError, AuthServicePort};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;
use tracing::info;

struct Account {
    password: SecretString,
    user: UserIdentity,
    disabled: bool,
}

/// Auth backend backed by a fixed account table.
///
/// Used for offline runs and tests. Identifiers are matched exactly.
#[derive(Default)]
pub struct InMemoryAuthService {
    accounts: HashMap<String, Account>,
    session: RwLock<Option<UserIdentity>>,
}

impl InMemoryAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        identifier: impl Into<String>,
        password: impl Into<String>,
        user: UserIdentity,
    ) -> Self {
        self.accounts.insert(
            identifier.into(),
            Account {
                password: SecretString::new(password),
                user,
                disabled: false,
            },
        );
        self
    }

    pub fn with_disabled_account(
        self,
        identifier: impl Into<String>,
        password: impl Into<String>,
        user: UserIdentity,
    ) -> Self {
        let identifier = identifier.into();
        let mut this = self.with_account(identifier.clone(), password, user);
        if let Some(account) = this.accounts.get_mut(&identifier) {
            account.disabled = true;
        }
        this
    }
}

#[async_trait]
impl AuthServicePort for InMemoryAuthService {
    async fn sign_in(
        &self,
        identifier: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, AuthServiceError> {
        let account = self
            .accounts
            .get(identifier)
            .ok_or(AuthServiceError::UserNotFound)?;

        let matches: bool = account
            .password
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();
        if !matches {
            return Err(AuthServiceError::InvalidCredentials);
        }
        if account.disabled {
            return Err(AuthServiceError::UserDisabled);
        }

        info!(uid = %account.user.uid, "in-memory sign-in succeeded");
        *self.session.write().await = Some(account.user.clone());
        Ok(account.user.clone())
    }

    async fn current_user(&self) -> Result<UserIdentity, AuthServiceError> {
        self.session
            .read()
            .await
            .clone()
            .ok_or(AuthServiceError::NotSignedIn)
    }

    async fn sign_out(&self) -> Result<(), AuthServiceError> {
        *self.session.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> InMemoryAuthService {
        InMemoryAuthService::new()
            .with_account("ada@pixelpost.app", "123456", UserIdentity::new("u1"))
            .with_disabled_account("banned", "123456", UserIdentity::new("u2"))
    }

    #[tokio::test]
    async fn known_account_signs_in() {
        let service = service();
        let user = service
            .sign_in("ada@pixelpost.app", &SecretString::new("123456"))
            .await
            .unwrap();

        assert_eq!(user.uid, "u1");
        assert_eq!(service.current_user().await.unwrap().uid, "u1");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_rejected() {
        let service = service();

        assert!(matches!(
            service
                .sign_in("ada@pixelpost.app", &SecretString::new("1234567"))
                .await,
            Err(AuthServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service
                .sign_in("nobody", &SecretString::new("123456"))
                .await,
            Err(AuthServiceError::UserNotFound)
        ));
        assert!(matches!(
            service.current_user().await,
            Err(AuthServiceError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn disabled_account_is_rejected_after_password_check() {
        let service = service();
        assert!(matches!(
            service.sign_in("banned", &SecretString::new("123456")).await,
            Err(AuthServiceError::UserDisabled)
        ));
        assert!(matches!(
            service.sign_in("banned", &SecretString::new("nope!!")).await,
            Err(AuthServiceError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn sign_out_ends_session() {
        let service = service();
        service
            .sign_in("ada@pixelpost.app", &SecretString::new("123456"))
            .await
            .unwrap();
        service.sign_out().await.unwrap();
        assert!(service.current_user().await.is_err());
    }
}
