use pp_core::auth::{FormState, SubmissionState};
use pp_core::ports::{AuthEvent, AuthEventPort};
use tokio::sync::mpsc;
use tracing::debug;

/// Forwards sign-in snapshots to a single UI consumer over an unbounded channel.
///
/// Sends never block, so publishing from inside a state lock is fine. Once the
/// receiver is gone, snapshots are dropped.
#[derive(Debug, Clone)]
pub struct ChannelAuthEventEmitter {
    tx: mpsc::UnboundedSender<AuthEvent>,
}

impl ChannelAuthEventEmitter {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<AuthEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, event: AuthEvent) {
        if self.tx.send(event).is_err() {
            debug!("auth event receiver dropped, discarding snapshot");
        }
    }
}

impl AuthEventPort for ChannelAuthEventEmitter {
    fn emit_form_state_changed(&self, state: FormState) {
        self.send(AuthEvent::FormChanged(state));
    }

    fn emit_submission_state_changed(&self, state: SubmissionState) {
        self.send(AuthEvent::SubmissionChanged(state));
    }
}
