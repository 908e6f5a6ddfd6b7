//! Boolean schema validation.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::FieldValue;

use super::traits::{first_failure, type_error, FieldSchema, Predicate};

#[derive(Clone)]
enum BoolConstraint {
    IsTrue { message: Option<String> },
    Refine { predicate: Predicate<bool>, message: Option<String> },
}

/// A schema for checkbox-style fields.
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, Schema};
///
/// let consent = Schema::boolean().is_true().error("Consent must be granted");
///
/// assert!(consent.validate(&FieldValue::from(true), &FieldPath::root()).is_success());
///
/// let errors = consent
///     .validate(&FieldValue::from(false), &FieldPath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().message, "Consent must be granted");
/// ```
#[derive(Clone)]
pub struct BoolSchema {
    constraints: Vec<BoolConstraint>,
    type_error_message: Option<String>,
}

impl BoolSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires the value to be `true`.
    pub fn is_true(mut self) -> Self {
        self.constraints
            .push(BoolConstraint::IsTrue { message: None });
        self
    }

    /// Requires `predicate` to hold for the value.
    pub fn refine<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&bool) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(BoolConstraint::Refine {
            predicate: Arc::new(predicate),
            message: None,
        });
        self
    }

    /// Sets the message of the most recent constraint, or the type error
    /// message if no constraint was declared yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                BoolConstraint::IsTrue { message: m }
                | BoolConstraint::Refine { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    pub fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<bool, FieldErrors> {
        let b = match value.as_bool() {
            Some(b) => b,
            None => return type_error(value, path, "boolean", self.type_error_message.as_ref()),
        };

        let failure = self.constraints.iter().find_map(|c| match c {
            BoolConstraint::IsTrue { message } => (!b).then(|| {
                let msg = message.clone().unwrap_or_else(|| "Must be checked".to_string());
                FieldError::new(path.clone(), msg)
                    .with_code("must_be_true")
                    .with_expected("true")
                    .with_got("false")
            }),
            BoolConstraint::Refine { predicate, message } => (!predicate(&b)).then(|| {
                let msg = message.clone().unwrap_or_else(|| "Invalid input".to_string());
                FieldError::new(path.clone(), msg).with_code("custom")
            }),
        });

        first_failure(failure, || b)
    }
}

impl Default for BoolSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema for BoolSchema {
    type Output = bool;

    fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<bool, FieldErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate(value, path).map(FieldValue::Bool)
    }
}
