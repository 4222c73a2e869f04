use std::sync::{Mutex, MutexGuard};

use pp_core::auth::{FormState, SubmissionState};
use tracing::error;

/// State owned by one sign-in screen session.
///
/// ## Lock Ordering
/// Never hold both locks. Each mutation takes one lock, updates the state and
/// publishes the snapshot before releasing it, so observers see snapshots in
/// mutation order. No lock is held across an `.await`.
pub(crate) struct SignInContext {
    form: Mutex<FormState>,
    submission: Mutex<SubmissionState>,
}

impl SignInContext {
    pub(crate) fn new(form: FormState) -> Self {
        Self {
            form: Mutex::new(form),
            submission: Mutex::new(SubmissionState::Idle),
        }
    }

    pub(crate) fn form(&self) -> MutexGuard<'_, FormState> {
        self.form.lock().unwrap_or_else(|poisoned| {
            error!("form state mutex poisoned, recovering from poisoned state");
            poisoned.into_inner()
        })
    }

    pub(crate) fn submission(&self) -> MutexGuard<'_, SubmissionState> {
        self.submission.lock().unwrap_or_else(|poisoned| {
            error!("submission state mutex poisoned, recovering from poisoned state");
            poisoned.into_inner()
        })
    }
}
