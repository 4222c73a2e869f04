use crate::auth::{FormState, SubmissionState};

/// A snapshot published to the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    FormChanged(FormState),
    SubmissionChanged(SubmissionState),
}

/// Receives sign-in state snapshots, in mutation order.
pub trait AuthEventPort: Send + Sync {
    fn emit_form_state_changed(&self, state: FormState);
    fn emit_submission_state_changed(&self, state: SubmissionState);
}
