use std::sync::Arc;

use pp_core::auth::UserIdentity;
use pp_core::ports::{AuthServiceError, AuthServicePort};
use tracing::{debug, info_span, Instrument};

/// Use case for reading the user of the current session.
pub struct GetCurrentUser {
    auth_service: Arc<dyn AuthServicePort>,
}

impl GetCurrentUser {
    pub fn new(auth_service: Arc<dyn AuthServicePort>) -> Self {
        Self { auth_service }
    }

    /// The signed-in user, or `None` when there is no session.
    pub async fn execute(&self) -> Result<Option<UserIdentity>, AuthServiceError> {
        let span = info_span!("usecase.get_current_user.execute");

        async {
            match self.auth_service.current_user().await {
                Ok(user) => Ok(Some(user)),
                Err(AuthServiceError::NotSignedIn) => {
                    debug!("no active session");
                    Ok(None)
                }
                Err(err) => Err(err),
            }
        }
        .instrument(span)
        .await
    }
}
