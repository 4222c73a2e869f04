//! Sign-in form controller.
//!
//! Owns the form and submission state of one sign-in screen, drives the
//! submission state machine against the auth backend and publishes every
//! change to the UI.

use std::sync::Arc;

use pp_core::auth::{
    classify_identifier, FormField, FormState, SecretString, SubmissionAction, SubmissionEvent,
    SubmissionState, SubmissionStateMachine,
};
use pp_core::ports::{AuthEventPort, AuthServicePort, SavedStatePort};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use super::context::SignInContext;

/// Result of one [`SignInFormController::submit`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend answered and the submission reached a terminal state.
    Completed(SubmissionState),
    /// Re-validation failed; nothing was sent.
    Rejected(FormState),
    /// Another submission is still in flight.
    AlreadySubmitting,
    /// The controller was closed before the backend answered.
    Cancelled,
}

/// Controller for one sign-in screen session.
pub struct SignInFormController {
    context: SignInContext,
    auth_service: Arc<dyn AuthServicePort>,
    saved_state: Arc<dyn SavedStatePort>,
    events: Arc<dyn AuthEventPort>,
    shutdown: CancellationToken,
}

impl SignInFormController {
    /// Create a controller, rehydrating the form from the saved-state slots.
    ///
    /// Publishes the restored form and the `Idle` submission state.
    pub fn new(
        auth_service: Arc<dyn AuthServicePort>,
        saved_state: Arc<dyn SavedStatePort>,
        events: Arc<dyn AuthEventPort>,
    ) -> Self {
        let identifier = restore_slot(saved_state.as_ref(), FormField::Identifier);
        let password = restore_slot(saved_state.as_ref(), FormField::Password);
        let form = FormState::new(identifier, password);
        debug!(
            restored_valid = form.is_form_valid(),
            "sign-in form restored from saved state"
        );

        events.emit_form_state_changed(form.clone());
        events.emit_submission_state_changed(SubmissionState::Idle);

        Self {
            context: SignInContext::new(form),
            auth_service,
            saved_state,
            events,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn on_identifier_changed(&self, text: &str) -> FormState {
        self.on_field_changed(FormField::Identifier, text)
    }

    pub fn on_password_changed(&self, text: &str) -> FormState {
        self.on_field_changed(FormField::Password, text)
    }

    /// Validate the current input and, if valid, sign in.
    ///
    /// Authentication errors never escape: they end in `Unauthenticated`.
    pub async fn submit(&self) -> SubmitOutcome {
        let span = info_span!("usecase.sign_in.submit");

        async {
            if self.is_closed() {
                return SubmitOutcome::Cancelled;
            }

            // In-flight check comes before validation so edits made during a
            // sign-in cannot turn a duplicate submit into a rejection.
            if self.context.submission().is_submitting() {
                debug!("submit ignored, sign-in already in flight");
                return SubmitOutcome::AlreadySubmitting;
            }

            let (identifier, password) = match self.revalidate() {
                Ok(credentials) => credentials,
                Err(form) => return SubmitOutcome::Rejected(form),
            };

            let (previous, action) = {
                let mut submission = self.context.submission();
                let previous = submission.clone();
                let (next, actions) = SubmissionStateMachine::transition(
                    previous.clone(),
                    SubmissionEvent::Submit {
                        identifier,
                        password,
                    },
                );
                let Some(action) = actions.into_iter().next() else {
                    debug!("submit ignored, sign-in already in flight");
                    return SubmitOutcome::AlreadySubmitting;
                };
                info!(
                    from = previous.status(),
                    to = next.status(),
                    "submission state transition"
                );
                *submission = next.clone();
                self.events.emit_submission_state_changed(next);
                (previous, action)
            };

            let mut in_flight = InFlight {
                controller: self,
                previous: Some(previous),
            };

            let SubmissionAction::SignIn {
                identifier,
                password,
            } = action;
            debug!(kind = ?classify_identifier(&identifier), "calling auth service");

            let event = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => {
                    info!("sign-in abandoned, controller closed");
                    return SubmitOutcome::Cancelled;
                }
                result = self.auth_service.sign_in(&identifier, &password) => match result {
                    Ok(user) => SubmissionEvent::SignInSucceeded { user },
                    Err(err) => {
                        warn!(error = %err, "sign-in failed");
                        SubmissionEvent::SignInFailed { reason: err.failure() }
                    }
                },
            };

            in_flight.disarm();
            self.complete(event)
        }
        .instrument(span)
        .await
    }

    /// Tear the controller down.
    ///
    /// An in-flight sign-in is abandoned and its result discarded; later input
    /// and submits are ignored.
    pub fn close(&self) {
        if !self.shutdown.is_cancelled() {
            info!("closing sign-in controller");
            self.shutdown.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    pub fn form_state(&self) -> FormState {
        self.context.form().clone()
    }

    pub fn submission_state(&self) -> SubmissionState {
        self.context.submission().clone()
    }

    fn on_field_changed(&self, field: FormField, text: &str) -> FormState {
        let mut form = self.context.form();
        if self.is_closed() {
            debug!(?field, "ignoring input on closed sign-in controller");
            return form.clone();
        }

        let next = match field {
            FormField::Identifier => form.clone().with_identifier(text),
            FormField::Password => form.clone().with_password(text),
        };
        *form = next.clone();
        self.checkpoint(field, text);
        self.events.emit_form_state_changed(next.clone());
        next
    }

    /// Re-run validation on the stored text instead of trusting the UI flag.
    fn revalidate(&self) -> Result<(String, SecretString), FormState> {
        let mut form = self.context.form();
        let fresh = form.revalidated();
        let changed = fresh != *form;
        *form = fresh.clone();

        if !fresh.is_form_valid() {
            info!(
                identifier_error = ?fresh.identifier_error(),
                password_error = ?fresh.password_error(),
                "submit rejected by validation"
            );
            self.events.emit_form_state_changed(fresh.clone());
            return Err(fresh);
        }
        if changed {
            self.events.emit_form_state_changed(fresh.clone());
        }

        Ok((fresh.identifier().to_string(), fresh.password().clone()))
    }

    fn complete(&self, event: SubmissionEvent) -> SubmitOutcome {
        let mut submission = self.context.submission();
        if self.is_closed() {
            debug!("discarding sign-in result, controller closed");
            return SubmitOutcome::Cancelled;
        }

        let from = submission.clone();
        let (next, _) = SubmissionStateMachine::transition(from.clone(), event);
        info!(
            from = from.status(),
            to = next.status(),
            "submission state transition"
        );
        *submission = next.clone();
        self.events.emit_submission_state_changed(next.clone());
        SubmitOutcome::Completed(next)
    }

    /// Roll back a submission whose future was dropped mid-flight.
    fn abandon(&self, previous: SubmissionState) {
        let mut submission = self.context.submission();
        if self.is_closed() || !submission.is_submitting() {
            return;
        }
        warn!(
            to = previous.status(),
            "submit dropped before the auth service answered, restoring state"
        );
        *submission = previous.clone();
        self.events.emit_submission_state_changed(previous);
    }

    fn checkpoint(&self, field: FormField, text: &str) {
        if let Err(err) = self.saved_state.set(field.slot_key(), text) {
            warn!(slot = field.slot_key(), error = %err, "failed to checkpoint sign-in input");
        }
    }
}

fn restore_slot(saved_state: &dyn SavedStatePort, field: FormField) -> String {
    match saved_state.get(field.slot_key()) {
        Ok(value) => value.unwrap_or_default(),
        Err(err) => {
            warn!(slot = field.slot_key(), error = %err, "failed to restore sign-in input");
            String::new()
        }
    }
}

/// Rolls the submission back if the submit future is dropped before it completes.
struct InFlight<'a> {
    controller: &'a SignInFormController,
    previous: Option<SubmissionState>,
}

impl InFlight<'_> {
    fn disarm(&mut self) {
        self.previous = None;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.controller.abandon(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pp_core::auth::{AuthFailure, UserIdentity, ValidationError};
    use pp_core::ports::{AuthEvent, AuthServiceError, SavedStateError};
    use pp_infra::InMemorySavedState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn slots_with(entries: &[(&str, &str)]) -> Arc<InMemorySavedState> {
        let slots = InMemorySavedState::new();
        for (key, value) in entries {
            slots.set(key, value).unwrap();
        }
        Arc::new(slots)
    }

    /// Rejects every write, as a full disk would.
    struct FailingSlots;

    impl SavedStatePort for FailingSlots {
        fn get(&self, _key: &str) -> Result<Option<String>, SavedStateError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), SavedStateError> {
            Err(SavedStateError::Io("disk full".into()))
        }

        fn remove(&self, _key: &str) -> Result<(), SavedStateError> {
            Err(SavedStateError::Io("disk full".into()))
        }
    }

    #[derive(Default)]
    struct RecordingEvents {
        events: Mutex<Vec<AuthEvent>>,
    }

    impl RecordingEvents {
        fn submission_states(&self) -> Vec<SubmissionState> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    AuthEvent::SubmissionChanged(s) => Some(s.clone()),
                    AuthEvent::FormChanged(_) => None,
                })
                .collect()
        }

        fn form_states(&self) -> Vec<FormState> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .filter_map(|e| match e {
                    AuthEvent::FormChanged(f) => Some(f.clone()),
                    AuthEvent::SubmissionChanged(_) => None,
                })
                .collect()
        }
    }

    impl AuthEventPort for RecordingEvents {
        fn emit_form_state_changed(&self, state: FormState) {
            self.events.lock().unwrap().push(AuthEvent::FormChanged(state));
        }

        fn emit_submission_state_changed(&self, state: SubmissionState) {
            self.events
                .lock()
                .unwrap()
                .push(AuthEvent::SubmissionChanged(state));
        }
    }

    /// Answers every sign-in with a fixed result.
    struct ScriptedAuth {
        succeed: bool,
        calls: AtomicUsize,
    }

    impl ScriptedAuth {
        fn succeeding() -> Self {
            Self {
                succeed: true,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                succeed: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AuthServicePort for ScriptedAuth {
        async fn sign_in(
            &self,
            _identifier: &str,
            _password: &SecretString,
        ) -> Result<UserIdentity, AuthServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(UserIdentity::new("u1").with_email("a@b.com"))
            } else {
                Err(AuthServiceError::InvalidCredentials)
            }
        }

        async fn current_user(&self) -> Result<UserIdentity, AuthServiceError> {
            Err(AuthServiceError::NotSignedIn)
        }

        async fn sign_out(&self) -> Result<(), AuthServiceError> {
            Ok(())
        }
    }

    /// Never answers; signals when a sign-in starts.
    #[derive(Default)]
    struct HangingAuth {
        started: Notify,
    }

    #[async_trait]
    impl AuthServicePort for HangingAuth {
        async fn sign_in(
            &self,
            _identifier: &str,
            _password: &SecretString,
        ) -> Result<UserIdentity, AuthServiceError> {
            self.started.notify_one();
            std::future::pending().await
        }

        async fn current_user(&self) -> Result<UserIdentity, AuthServiceError> {
            Err(AuthServiceError::NotSignedIn)
        }

        async fn sign_out(&self) -> Result<(), AuthServiceError> {
            Ok(())
        }
    }

    fn controller(
        auth: Arc<dyn AuthServicePort>,
        slots: Arc<dyn SavedStatePort>,
        events: Arc<RecordingEvents>,
    ) -> SignInFormController {
        SignInFormController::new(auth, slots, events)
    }

    #[test]
    fn new_restores_and_revalidates_saved_input() {
        let slots = slots_with(&[("username", "abcde"), ("password", "123")]);
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(Arc::new(ScriptedAuth::succeeding()), slots, events.clone());

        let form = controller.form_state();
        assert_eq!(form.identifier(), "abcde");
        assert_eq!(form.password().expose(), "123");
        assert_eq!(form.password_error(), Some(ValidationError::PasswordTooShort));
        assert!(!form.is_form_valid());

        assert_eq!(events.form_states(), vec![form]);
        assert_eq!(events.submission_states(), vec![SubmissionState::Idle]);
    }

    #[test]
    fn field_changes_checkpoint_and_publish() {
        let slots = Arc::new(InMemorySavedState::new());
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(
            Arc::new(ScriptedAuth::succeeding()),
            slots.clone(),
            events.clone(),
        );

        let form = controller.on_identifier_changed("ab");
        assert_eq!(form.identifier_error(), Some(ValidationError::UsernameTooShort));
        let form = controller.on_password_changed("abcdef");
        assert!(!form.is_form_valid());
        let form = controller.on_identifier_changed("abcde");
        assert!(form.is_form_valid());

        assert_eq!(slots.get("username").unwrap().as_deref(), Some("abcde"));
        assert_eq!(slots.get("password").unwrap().as_deref(), Some("abcdef"));
        // Initial snapshot plus one per change.
        assert_eq!(events.form_states().len(), 4);
        assert_eq!(events.form_states().last(), Some(&form));
    }

    #[test]
    fn identifier_change_is_idempotent() {
        let controller = controller(
            Arc::new(ScriptedAuth::succeeding()),
            Arc::new(InMemorySavedState::new()),
            Arc::new(RecordingEvents::default()),
        );

        let once = controller.on_identifier_changed("user@example.com");
        let twice = controller.on_identifier_changed("user@example.com");
        assert_eq!(once, twice);
        assert_eq!(controller.form_state(), once);
    }

    #[test]
    fn checkpoint_failure_does_not_block_input() {
        let controller = controller(
            Arc::new(ScriptedAuth::succeeding()),
            Arc::new(FailingSlots),
            Arc::new(RecordingEvents::default()),
        );

        let form = controller.on_identifier_changed("abcde");
        assert_eq!(form.identifier(), "abcde");
        assert_eq!(form.identifier_error(), None);
    }

    #[tokio::test]
    async fn submit_success_publishes_submitting_then_authenticated() {
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(
            Arc::new(ScriptedAuth::succeeding()),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        );
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let outcome = controller.submit().await;

        let user = UserIdentity::new("u1").with_email("a@b.com");
        assert_eq!(
            outcome,
            SubmitOutcome::Completed(SubmissionState::Authenticated { user: user.clone() })
        );
        assert_eq!(
            events.submission_states(),
            vec![
                SubmissionState::Idle,
                SubmissionState::Submitting,
                SubmissionState::Authenticated { user },
            ]
        );
    }

    #[tokio::test]
    async fn submit_failure_publishes_unauthenticated() {
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(
            Arc::new(ScriptedAuth::failing()),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        );
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let outcome = controller.submit().await;

        let failed = SubmissionState::Unauthenticated {
            reason: AuthFailure::InvalidCredentials,
        };
        assert_eq!(outcome, SubmitOutcome::Completed(failed.clone()));
        assert_eq!(
            events.submission_states(),
            vec![SubmissionState::Idle, SubmissionState::Submitting, failed]
        );
    }

    #[tokio::test]
    async fn resubmit_from_terminal_state() {
        let auth = Arc::new(ScriptedAuth::failing());
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(auth.clone(), Arc::new(InMemorySavedState::new()), events.clone());
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        controller.submit().await;
        controller.submit().await;

        assert_eq!(auth.calls.load(Ordering::SeqCst), 2);
        let states = events.submission_states();
        assert_eq!(states.len(), 5);
        assert_eq!(states[3], SubmissionState::Submitting);
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_without_calling_backend() {
        let auth = Arc::new(ScriptedAuth::succeeding());
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(auth.clone(), Arc::new(InMemorySavedState::new()), events.clone());
        controller.on_identifier_changed("ab");
        controller.on_password_changed("123456");

        let outcome = controller.submit().await;

        match outcome {
            SubmitOutcome::Rejected(form) => {
                assert_eq!(form.identifier_error(), Some(ValidationError::UsernameTooShort));
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.submission_state(), SubmissionState::Idle);
        assert_eq!(events.submission_states(), vec![SubmissionState::Idle]);
    }

    #[tokio::test]
    async fn untouched_form_is_rejected() {
        let controller = controller(
            Arc::new(ScriptedAuth::succeeding()),
            Arc::new(InMemorySavedState::new()),
            Arc::new(RecordingEvents::default()),
        );

        let SubmitOutcome::Rejected(form) = controller.submit().await else {
            panic!("empty form must not be submitted");
        };
        assert_eq!(form.identifier_error(), Some(ValidationError::FieldRequired));
        assert_eq!(form.password_error(), Some(ValidationError::PasswordRequired));
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_ignored() {
        let auth = Arc::new(HangingAuth::default());
        let events = Arc::new(RecordingEvents::default());
        let controller = Arc::new(controller(
            auth.clone(),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        ));
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        auth.started.notified().await;

        assert_eq!(controller.submit().await, SubmitOutcome::AlreadySubmitting);
        assert_eq!(controller.submission_state(), SubmissionState::Submitting);

        controller.close();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Cancelled);
    }

    #[tokio::test]
    async fn submit_while_in_flight_skips_validation() {
        let auth = Arc::new(HangingAuth::default());
        let events = Arc::new(RecordingEvents::default());
        let controller = Arc::new(controller(
            auth.clone(),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        ));
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        auth.started.notified().await;

        // Editing during the sign-in leaves the form invalid.
        controller.on_identifier_changed("ab");
        let forms_before = events.form_states().len();

        assert_eq!(controller.submit().await, SubmitOutcome::AlreadySubmitting);
        assert_eq!(events.form_states().len(), forms_before);
        assert_eq!(
            events.submission_states(),
            vec![SubmissionState::Idle, SubmissionState::Submitting]
        );

        controller.close();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Cancelled);
    }

    #[tokio::test]
    async fn close_discards_in_flight_result() {
        let auth = Arc::new(HangingAuth::default());
        let events = Arc::new(RecordingEvents::default());
        let controller = Arc::new(controller(
            auth.clone(),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        ));
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit().await })
        };
        auth.started.notified().await;
        controller.close();

        assert_eq!(pending.await.unwrap(), SubmitOutcome::Cancelled);
        assert_eq!(
            events.submission_states(),
            vec![SubmissionState::Idle, SubmissionState::Submitting]
        );

        // Closed controllers ignore input and submits.
        let before = controller.form_state();
        assert_eq!(controller.on_identifier_changed("other"), before);
        assert_eq!(controller.submit().await, SubmitOutcome::Cancelled);
    }

    #[tokio::test]
    async fn dropped_submit_restores_previous_state() {
        let events = Arc::new(RecordingEvents::default());
        let controller = controller(
            Arc::new(HangingAuth::default()),
            Arc::new(InMemorySavedState::new()),
            events.clone(),
        );
        controller.on_identifier_changed("abcde");
        controller.on_password_changed("123456");

        let result = tokio::time::timeout(Duration::from_millis(20), controller.submit()).await;

        assert!(result.is_err(), "hanging sign-in must time out");
        assert_eq!(controller.submission_state(), SubmissionState::Idle);
        assert_eq!(
            events.submission_states(),
            vec![
                SubmissionState::Idle,
                SubmissionState::Submitting,
                SubmissionState::Idle,
            ]
        );
    }
}
