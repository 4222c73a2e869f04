use std::sync::Arc;

use crate::usecases::{GetCurrentUser, SignInFormController, SignOut, WatchFeed};
use crate::AppDeps;

/// The application runtime.
///
/// Built once at startup from [`AppDeps`]; hands out use cases wired to the
/// shared adapters.
pub struct App {
    deps: AppDeps,
}

impl App {
    /// Create new App instance from dependencies.
    ///
    /// This constructor signature IS the dependency manifest.
    pub fn new(deps: AppDeps) -> Self {
        Self { deps }
    }

    /// A controller for a new sign-in screen session.
    pub fn sign_in_form(&self) -> SignInFormController {
        SignInFormController::new(
            Arc::clone(&self.deps.auth_service),
            Arc::clone(&self.deps.saved_state),
            Arc::clone(&self.deps.auth_events),
        )
    }

    pub fn get_current_user(&self) -> GetCurrentUser {
        GetCurrentUser::new(Arc::clone(&self.deps.auth_service))
    }

    pub fn sign_out(&self) -> SignOut {
        SignOut::new(
            Arc::clone(&self.deps.auth_service),
            Arc::clone(&self.deps.saved_state),
        )
    }

    pub fn watch_feed(&self) -> WatchFeed {
        WatchFeed::new(Arc::clone(&self.deps.feed_source))
    }
}
