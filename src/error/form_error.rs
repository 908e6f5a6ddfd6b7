//! Errors returned by the form state machine and its configuration.

use thiserror::Error;

use crate::report::ValidationReport;

/// Why a submit attempt did not start.
///
/// Neither case is fatal: the form stays usable and the user can retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitRejected {
    /// At least one field failed validation. The report holds the first
    /// message of every failing field.
    #[error("form has {} invalid field(s)", .0.len())]
    Invalid(ValidationReport),

    /// Another submission is still in flight.
    #[error("a submission is already in progress")]
    InFlight,
}

impl SubmitRejected {
    /// Returns the validation report if the rejection was caused by invalid fields.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            SubmitRejected::Invalid(report) => Some(report),
            SubmitRejected::InFlight => None,
        }
    }
}

/// Errors raised while loading a [`FormConfig`](crate::FormConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document is not valid JSON for `FormConfig`.
    #[error("failed to parse form config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has a value outside its allowed range.
    #[error("invalid form config: {0}")]
    Invalid(String),
}
