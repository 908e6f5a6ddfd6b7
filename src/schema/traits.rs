//! Traits for field schema polymorphism.
//!
//! [`FieldSchema`] is implemented by every typed schema (string, number,
//! boolean, options, file). [`ValueValidator`] erases the output type so a
//! [`FormSchema`](super::FormSchema) can hold heterogeneous field schemas.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::FieldValue;

/// A predicate used by `refine` constraints.
pub(crate) type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A schema that validates the value of a single field.
///
/// Constraints run in the order they were declared and validation stops at
/// the first failure, so a failing field always yields exactly one error.
///
/// The `Send + Sync` bounds let schemas be shared between the UI loop and a
/// task running the submit handler.
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, Schema};
/// use inquest::schema::FieldSchema;
///
/// let schema = Schema::string().min_len(2).max_len(10);
/// let result = schema.validate(&FieldValue::from("Ada"), &FieldPath::field("name"));
/// assert!(result.is_success());
/// ```
pub trait FieldSchema: Send + Sync {
    /// The typed value produced by successful validation.
    type Output;

    /// Validates a value against this schema.
    fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<Self::Output, FieldErrors>;

    /// Validates a value and returns it as a [`FieldValue`] on success.
    fn validate_to_value(&self, value: &FieldValue, path: &FieldPath)
        -> Validation<FieldValue, FieldErrors>;
}

/// A type-erased field schema.
///
/// Every [`FieldSchema`] is a `ValueValidator` through the blanket impl below.
pub trait ValueValidator: Send + Sync {
    /// Validates a value and returns it as a [`FieldValue`] on success.
    fn validate_value(&self, value: &FieldValue, path: &FieldPath)
        -> Validation<FieldValue, FieldErrors>;
}

impl<S: FieldSchema> ValueValidator for S {
    fn validate_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate_to_value(value, path)
    }
}

/// Builds the failure returned when a value has the wrong kind.
///
/// An empty value reports `"Required"` unless a custom message was set.
pub(crate) fn type_error<T>(
    value: &FieldValue,
    path: &FieldPath,
    expected: &str,
    custom: Option<&String>,
) -> Validation<T, FieldErrors> {
    let message = match custom {
        Some(message) => message.clone(),
        None if value.is_empty() => "Required".to_string(),
        None => format!("Expected {}, received {}", expected, value.kind()),
    };
    let code = if value.is_empty() { "required" } else { "invalid_type" };

    Validation::Failure(FieldErrors::single(
        FieldError::new(path.clone(), message)
            .with_code(code)
            .with_got(value.kind())
            .with_expected(expected),
    ))
}

/// Wraps the first failing constraint, if any, into a `Validation`.
pub(crate) fn first_failure<T>(
    failure: Option<FieldError>,
    output: impl FnOnce() -> T,
) -> Validation<T, FieldErrors> {
    match failure {
        Some(error) => Validation::Failure(FieldErrors::single(error)),
        None => Validation::Success(output()),
    }
}
