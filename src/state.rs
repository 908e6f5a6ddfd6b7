//! Form state and the submission state machine.
//!
//! ```text
//! Idle ──submit──▶ Submitting ──handler ok──▶ Succeeded
//!  ▲                   │                          │
//!  │                   └──handler err──▶ Failed   │
//!  └──────────reset──────────────────────┴────────┘
//! ```
//!
//! A submit attempt from Idle, Succeeded or Failed first validates every
//! field. If anything fails the status does not change and the messages are
//! stored for display. While Submitting, further attempts are refused.

use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;

use crate::config::FormConfig;
use crate::error::SubmitRejected;
use crate::path::FieldPath;
use crate::report::ValidationReport;
use crate::schema::{FormSchema, ValidatedForm};
use crate::upload::UploadEvent;
use crate::value::{FieldValue, FormValues};

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmitStatus {
    /// True for Succeeded and Failed.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmitStatus::Succeeded | SubmitStatus::Failed)
    }
}

/// Values, messages and submission status of one form.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use inquest::{FieldValue, FormState, Schema, SubmitRejected, SubmitStatus};
///
/// let schema = Arc::new(Schema::form().field("name", Schema::string().min_len(2)));
/// let mut form = FormState::new(schema);
///
/// form.set_value("name", FieldValue::from("A"));
/// let rejected = form.begin_submit().unwrap_err();
/// assert!(matches!(rejected, SubmitRejected::Invalid(_)));
/// assert_eq!(form.status(), SubmitStatus::Idle);
///
/// form.set_value("name", FieldValue::from("Ada"));
/// let validated = form.begin_submit().unwrap();
/// assert_eq!(validated.text("name"), Some("Ada"));
/// assert_eq!(form.status(), SubmitStatus::Submitting);
///
/// form.finish_submit(Ok::<(), String>(()));
/// assert_eq!(form.status(), SubmitStatus::Succeeded);
/// ```
pub struct FormState {
    schema: Arc<FormSchema>,
    config: FormConfig,
    values: FormValues,
    errors: ValidationReport,
    status: SubmitStatus,
    root_error: Option<String>,
    submit_count: u32,
}

impl FormState {
    /// Creates an idle form with no values.
    pub fn new(schema: Arc<FormSchema>) -> Self {
        Self {
            schema,
            config: FormConfig::default(),
            values: FormValues::new(),
            errors: ValidationReport::new(),
            status: SubmitStatus::Idle,
            root_error: None,
            submit_count: 0,
        }
    }

    pub fn with_config(mut self, config: FormConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Stores a field value. Allowed in every state, including Submitting.
    ///
    /// Once the form has been submitted, the edited field is re-checked so
    /// its message tracks the input (see
    /// [`FormConfig::revalidate_on_change`]).
    pub fn set_value(&mut self, field: impl Into<String>, value: FieldValue) {
        let field = field.into();
        self.values.insert(field.clone(), value);

        if self.config.revalidate_on_change && self.submit_count > 0 {
            self.revalidate(&field);
        }
    }

    /// Applies a notification from an upload control bound to `field`.
    ///
    /// The file's message is cleared either way; the file is checked again
    /// on the next submit.
    pub fn apply_upload_event(&mut self, field: &str, event: UploadEvent) {
        let value = match event {
            UploadEvent::Selected(file) => FieldValue::File(file),
            UploadEvent::Cleared => FieldValue::Empty,
        };
        self.values.insert(field.to_string(), value);
        self.errors.remove(field);
    }

    /// Per-field messages from the last validation.
    pub fn errors(&self) -> &ValidationReport {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn clear_error(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// The message of the last failed submission, if it has not been cleared.
    pub fn root_error(&self) -> Option<&str> {
        self.root_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// False only while a submission is in flight.
    pub fn is_submit_enabled(&self) -> bool {
        !self.is_submitting()
    }

    /// Number of submit attempts, valid or not, that were not refused as
    /// in-flight.
    pub fn submit_count(&self) -> u32 {
        self.submit_count
    }

    /// Starts a submission.
    ///
    /// Validates every field. On success the stored messages are cleared,
    /// the status becomes Submitting, and the validated form is returned for
    /// the submit handler. Otherwise the status is unchanged.
    pub fn begin_submit(&mut self) -> Result<ValidatedForm, SubmitRejected> {
        if self.is_submitting() {
            tracing::debug!("submit refused: already in flight");
            return Err(SubmitRejected::InFlight);
        }
        self.submit_count = self.submit_count.saturating_add(1);

        match self.schema.validate(&self.values).into_result() {
            Ok(form) => {
                self.errors.clear();
                self.status = SubmitStatus::Submitting;
                tracing::debug!(fields = form.len(), "submission started");
                Ok(form)
            }
            Err(errors) => {
                self.errors = ValidationReport::from_errors(&errors);
                tracing::debug!(invalid = self.errors.len(), "submit refused: invalid fields");
                Err(SubmitRejected::Invalid(self.errors.clone()))
            }
        }
    }

    /// Records the submit handler's outcome.
    ///
    /// Success clears the root error. Failure sets the configured generic
    /// root error; the underlying error is only logged. Values are kept
    /// either way. Returns false, changing nothing, if no submission is in
    /// flight.
    pub fn finish_submit<E: Display>(&mut self, outcome: Result<(), E>) -> bool {
        if !self.is_submitting() {
            tracing::warn!(status = ?self.status, "ignoring submit outcome outside of a submission");
            return false;
        }

        match outcome {
            Ok(()) => {
                self.status = SubmitStatus::Succeeded;
                self.root_error = None;
                tracing::info!("submission succeeded");
            }
            Err(err) => {
                self.status = SubmitStatus::Failed;
                self.root_error = Some(self.config.root_error_message.clone());
                tracing::warn!(error = %err, "submission failed");
            }
        }
        true
    }

    /// Returns a finished form to Idle and clears the root error. Returns
    /// false while Submitting.
    pub fn reset(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.status = SubmitStatus::Idle;
        self.root_error = None;
        true
    }

    fn revalidate(&mut self, field: &str) {
        self.errors.remove(field);
        if let Some(error) = self.schema.check_field(field, &self.values) {
            self.errors
                .insert_first(&FieldPath::field(field), &error.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::value::FileRef;

    fn form() -> FormState {
        let schema = Schema::form()
            .field("name", Schema::string().min_len(2).error("too short"))
            .field(
                "file",
                Schema::file().mime_types(["image/png"]).error("png only"),
            );
        FormState::new(Arc::new(schema))
    }

    fn fill_valid(state: &mut FormState) {
        state.set_value("name", FieldValue::from("Ada"));
        state.set_value("file", FieldValue::from(FileRef::new("a.png", "image/png", 1)));
    }

    #[test]
    fn test_starts_idle() {
        let state = form();
        assert_eq!(state.status(), SubmitStatus::Idle);
        assert!(state.is_submit_enabled());
        assert!(state.errors().is_empty());
        assert!(state.root_error().is_none());
    }

    #[test]
    fn test_invalid_submit_keeps_status() {
        let mut state = form();
        let rejected = state.begin_submit().unwrap_err();

        let report = rejected.report().unwrap();
        assert_eq!(report.get("name"), Some("Required"));
        assert_eq!(state.status(), SubmitStatus::Idle);
        assert_eq!(state.error("file"), Some("Required"));
        assert_eq!(state.submit_count(), 1);
    }

    #[test]
    fn test_second_submit_refused_while_in_flight() {
        let mut state = form();
        fill_valid(&mut state);
        state.begin_submit().unwrap();

        assert_eq!(state.begin_submit().unwrap_err(), SubmitRejected::InFlight);
        assert!(!state.is_submit_enabled());
        assert_eq!(state.submit_count(), 1);
    }

    #[test]
    fn test_failure_sets_generic_root_error() {
        let mut state = form();
        fill_valid(&mut state);
        state.begin_submit().unwrap();

        assert!(state.finish_submit(Err("connection reset by peer")));
        assert_eq!(state.status(), SubmitStatus::Failed);
        assert_eq!(state.root_error(), Some(crate::config::DEFAULT_ROOT_ERROR));
        assert_eq!(state.value("name"), Some(&FieldValue::from("Ada")));
    }

    #[test]
    fn test_resubmit_after_failure() {
        let mut state = form();
        fill_valid(&mut state);
        state.begin_submit().unwrap();
        state.finish_submit(Err("boom"));

        state.begin_submit().unwrap();
        state.finish_submit(Ok::<(), String>(()));
        assert_eq!(state.status(), SubmitStatus::Succeeded);
        assert!(state.root_error().is_none());
    }

    #[test]
    fn test_finish_outside_submission_is_ignored() {
        let mut state = form();
        assert!(!state.finish_submit(Ok::<(), String>(())));
        assert_eq!(state.status(), SubmitStatus::Idle);
    }

    #[test]
    fn test_reset() {
        let mut state = form();
        fill_valid(&mut state);
        state.begin_submit().unwrap();
        assert!(!state.reset());

        state.finish_submit(Err("boom"));
        assert!(state.reset());
        assert_eq!(state.status(), SubmitStatus::Idle);
        assert!(state.root_error().is_none());
    }

    #[test]
    fn test_revalidates_after_first_submit() {
        let mut state = form();
        state.set_value("name", FieldValue::from("A"));
        assert!(state.errors().is_empty());

        let _ = state.begin_submit();
        assert_eq!(state.error("name"), Some("too short"));

        state.set_value("name", FieldValue::from("Ada"));
        assert_eq!(state.error("name"), None);

        state.set_value("name", FieldValue::from("B"));
        assert_eq!(state.error("name"), Some("too short"));
    }

    #[test]
    fn test_revalidation_can_be_disabled() {
        let mut state = form().with_config(FormConfig::default().with_revalidate_on_change(false));
        state.set_value("name", FieldValue::from("A"));
        let _ = state.begin_submit();

        state.set_value("name", FieldValue::from("Ada"));
        assert_eq!(state.error("name"), Some("too short"));
    }

    #[test]
    fn test_upload_event_clears_file_error() {
        let mut state = form();
        state.set_value("file", FieldValue::from(FileRef::new("a.zip", "application/zip", 1)));
        let _ = state.begin_submit();
        assert_eq!(state.error("file"), Some("png only"));

        state.apply_upload_event("file", UploadEvent::Cleared);
        assert_eq!(state.error("file"), None);
        assert_eq!(state.value("file"), Some(&FieldValue::Empty));

        let file = FileRef::new("b.png", "image/png", 1);
        state.apply_upload_event("file", UploadEvent::Selected(file.clone()));
        assert_eq!(state.value("file"), Some(&FieldValue::File(file)));
    }

    #[test]
    fn test_edits_allowed_while_submitting() {
        let mut state = form();
        fill_valid(&mut state);
        let submitted = state.begin_submit().unwrap();

        state.set_value("name", FieldValue::from("Grace"));
        assert_eq!(submitted.text("name"), Some("Ada"));
        assert_eq!(state.value("name"), Some(&FieldValue::from("Grace")));
    }
}
