//! Drives a form's submission through a [`SubmitHandler`].
//!
//! The form state sits behind a mutex shared by every clone of the
//! controller, so an input handler can keep editing fields while a
//! submission is in flight. The lock is never held across an await point.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use parking_lot::Mutex;

use crate::error::SubmitRejected;
use crate::schema::ValidatedForm;
use crate::state::{FormState, SubmitStatus};
use crate::submit::SubmitHandler;
use crate::upload::UploadEvent;
use crate::value::FieldValue;

/// A form plus the handler its submissions go to.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use inquest::{FieldValue, FormController, FormState, Schema, SimulatedSubmitHandler, SubmitStatus};
///
/// # #[tokio::main]
/// # async fn main() {
/// let schema = Arc::new(Schema::form().field("name", Schema::string().min_len(2)));
/// let handler = SimulatedSubmitHandler::new().with_delay(Duration::from_millis(1));
/// let controller = FormController::new(FormState::new(schema), handler);
///
/// controller.set_value("name", FieldValue::from("Ada"));
/// let status = controller.submit().await.unwrap();
/// assert_eq!(status, SubmitStatus::Succeeded);
/// # }
/// ```
#[derive(Clone)]
pub struct FormController {
    state: Arc<Mutex<FormState>>,
    handler: Arc<dyn SubmitHandler>,
}

impl FormController {
    pub fn new<H>(state: FormState, handler: H) -> Self
    where
        H: SubmitHandler + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(state)),
            handler: Arc::new(handler),
        }
    }

    /// Runs `f` with shared access to the form state.
    pub fn with_state<R>(&self, f: impl FnOnce(&FormState) -> R) -> R {
        f(&self.state.lock())
    }

    /// Runs `f` with exclusive access to the form state.
    pub fn update<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> R {
        f(&mut self.state.lock())
    }

    pub fn set_value(&self, field: impl Into<String>, value: FieldValue) {
        self.state.lock().set_value(field, value);
    }

    pub fn apply_upload_event(&self, field: &str, event: UploadEvent) {
        self.state.lock().apply_upload_event(field, event);
    }

    pub fn status(&self) -> SubmitStatus {
        self.state.lock().status()
    }

    /// Validates the form and, if it passes, hands it to the submit handler.
    ///
    /// Returns the status the submission ended in: Succeeded, or Failed if
    /// the handler returned an error or did not finish within the configured
    /// timeout. Returns an error without calling the handler if the form is
    /// invalid or another submission is in flight.
    ///
    /// If the returned future is dropped before it completes, or the handler
    /// panics, the submission ends as Failed so the form can be resubmitted.
    pub async fn submit(&self) -> Result<SubmitStatus, SubmitRejected> {
        let (form, timeout) = {
            let mut state = self.state.lock();
            let form = state.begin_submit()?;
            (form, state.config().submit_timeout())
        };
        let pending = PendingSubmit::new(Arc::clone(&self.state));

        let outcome = self.deliver(&form, timeout).await;

        Ok(pending.finish(outcome))
    }

    async fn deliver(&self, form: &ValidatedForm, timeout: Option<Duration>) -> anyhow::Result<()> {
        let call = self.handler.submit(form);
        match timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(anyhow!("submit handler timed out after {:?}", limit))),
            None => call.await,
        }
    }
}

/// An in-flight submission. Dropped without [`PendingSubmit::finish`], it
/// fails the submission.
struct PendingSubmit {
    state: Arc<Mutex<FormState>>,
    finished: bool,
}

impl PendingSubmit {
    fn new(state: Arc<Mutex<FormState>>) -> Self {
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self, outcome: anyhow::Result<()>) -> SubmitStatus {
        self.finished = true;
        let mut state = self.state.lock();
        state.finish_submit(outcome);
        state.status()
    }
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        if !self.finished {
            self.state
                .lock()
                .finish_submit(Err::<(), _>("submission cancelled"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::config::{FormConfig, DEFAULT_ROOT_ERROR};
    use crate::schema::Schema;
    use crate::submit::{MockSubmitHandler, SimulatedSubmitHandler};

    fn state() -> FormState {
        FormState::new(Arc::new(
            Schema::form().field("name", Schema::string().min_len(2)),
        ))
    }

    fn valid_state() -> FormState {
        let mut state = state();
        state.set_value("name", FieldValue::from("Ada"));
        state
    }

    #[tokio::test]
    async fn test_success_reaches_handler() {
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_submit()
            .withf(|form| form.text("name") == Some("Ada"))
            .times(1)
            .returning(|_| Ok(()));

        let controller = FormController::new(valid_state(), handler);
        assert_eq!(controller.submit().await.unwrap(), SubmitStatus::Succeeded);
        assert!(controller.with_state(|s| s.root_error().is_none()));
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_handler() {
        let mut handler = MockSubmitHandler::new();
        handler.expect_submit().times(0);

        let controller = FormController::new(state(), handler);
        let rejected = controller.submit().await.unwrap_err();

        assert!(matches!(rejected, SubmitRejected::Invalid(_)));
        assert_eq!(controller.status(), SubmitStatus::Idle);
    }

    #[tokio::test]
    async fn test_handler_error_fails_submission() {
        let mut handler = MockSubmitHandler::new();
        handler
            .expect_submit()
            .times(1)
            .returning(|_| Err(anyhow!("503 Service Unavailable")));

        let controller = FormController::new(valid_state(), handler);
        assert_eq!(controller.submit().await.unwrap(), SubmitStatus::Failed);
        controller.with_state(|s| {
            assert_eq!(s.root_error(), Some(DEFAULT_ROOT_ERROR));
            assert_eq!(s.value("name"), Some(&FieldValue::from("Ada")));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fails_submission() {
        let config = FormConfig::default().with_submit_timeout(Some(Duration::from_secs(1)));
        let handler = SimulatedSubmitHandler::new().with_delay(Duration::from_secs(60));

        let controller = FormController::new(valid_state().with_config(config), handler);
        assert_eq!(controller.submit().await.unwrap(), SubmitStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_submit_is_refused() {
        let controller = FormController::new(valid_state(), SimulatedSubmitHandler::new());

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        while controller.status() != SubmitStatus::Submitting {
            tokio::task::yield_now().await;
        }

        assert_eq!(controller.submit().await.unwrap_err(), SubmitRejected::InFlight);
        assert_eq!(first.await.unwrap().unwrap(), SubmitStatus::Succeeded);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_during_submission_are_kept() {
        let controller = FormController::new(valid_state(), SimulatedSubmitHandler::new());

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        while controller.status() != SubmitStatus::Submitting {
            tokio::task::yield_now().await;
        }
        controller.set_value("name", FieldValue::from("Grace"));

        first.await.unwrap().unwrap();
        assert_eq!(
            controller.with_state(|s| s.value("name").cloned()),
            Some(FieldValue::from("Grace"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_fails_and_allows_retry() {
        let handler = SimulatedSubmitHandler::new().with_delay(Duration::from_secs(1));
        let controller = FormController::new(valid_state(), handler);

        let cancelled = tokio::time::timeout(Duration::from_millis(10), controller.submit()).await;
        assert!(cancelled.is_err());

        controller.with_state(|s| {
            assert_eq!(s.status(), SubmitStatus::Failed);
            assert_eq!(s.root_error(), Some(DEFAULT_ROOT_ERROR));
        });
        assert!(controller.update(|s| s.reset()));
        assert_eq!(controller.submit().await.unwrap(), SubmitStatus::Succeeded);
    }

    struct PanickingHandler;

    #[async_trait]
    impl SubmitHandler for PanickingHandler {
        async fn submit(&self, _form: &ValidatedForm) -> anyhow::Result<()> {
            panic!("handler bug");
        }
    }

    #[tokio::test]
    async fn test_panicking_handler_fails_submission() {
        let controller = FormController::new(valid_state(), PanickingHandler);

        let task = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit().await }
        });
        assert!(task.await.unwrap_err().is_panic());

        assert_eq!(controller.status(), SubmitStatus::Failed);
        assert!(controller.with_state(|s| s.is_submit_enabled()));
    }
}
