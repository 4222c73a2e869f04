use std::sync::Arc;

use pp_core::auth::FormField;
use pp_core::ports::{AuthServiceError, AuthServicePort, SavedStatePort};
use tracing::{info, info_span, warn, Instrument};

/// Use case for ending the current session.
///
/// Also forgets the checkpointed password so it does not outlive the session.
pub struct SignOut {
    auth_service: Arc<dyn AuthServicePort>,
    saved_state: Arc<dyn SavedStatePort>,
}

impl SignOut {
    pub fn new(auth_service: Arc<dyn AuthServicePort>, saved_state: Arc<dyn SavedStatePort>) -> Self {
        Self {
            auth_service,
            saved_state,
        }
    }

    pub async fn execute(&self) -> Result<(), AuthServiceError> {
        let span = info_span!("usecase.sign_out.execute");

        async {
            self.auth_service.sign_out().await?;
            if let Err(err) = self.saved_state.remove(FormField::Password.slot_key()) {
                warn!(error = %err, "failed to clear saved password");
            }
            info!("signed out");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
