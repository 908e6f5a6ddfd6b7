//! Field validation error types.
//!
//! This module provides [`FieldError`] for a single constraint failure and
//! [`FieldErrors`] for accumulating failures across the fields of a form.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::FieldPath;

/// A single constraint failure with context.
///
/// - **path**: the field (or the root) the failure belongs to
/// - **message**: the text shown to the user
/// - **got** / **expected**: optional detail for diagnostics
/// - **code**: machine-readable constraint name
///
/// # Example
///
/// ```rust
/// use inquest::{FieldError, FieldPath};
///
/// let error = FieldError::new(FieldPath::field("email"), "Invalid email")
///     .with_code("email")
///     .with_got("not-an-email");
///
/// assert_eq!(error.code, "email");
/// assert_eq!(error.to_string(), "email: Invalid email (got: not-an-email)");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// The field that failed validation.
    pub path: FieldPath,
    /// Human-readable error message.
    pub message: String,
    /// The offending value, formatted for diagnostics.
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// Machine-readable error code (e.g., `min_length`).
    pub code: String,
}

impl FieldError {
    /// Creates a new field error. The code defaults to "validation_error".
    pub fn new(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    /// Sets the error code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the "got" field and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the "expected" field and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for FieldError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<FieldError>();
    assert_sync::<FieldError>();
};

/// A non-empty collection of field errors.
///
/// Wraps a `NonEmptyVec<FieldError>` so a `Validation::Failure` always
/// carries at least one error. Implements `Semigroup` so failures from
/// independent fields can be combined.
///
/// ```rust
/// use inquest::{FieldError, FieldErrors, FieldPath};
/// use stillwater::prelude::*;
///
/// let name = FieldErrors::single(FieldError::new(FieldPath::field("name"), "too short"));
/// let phone = FieldErrors::single(FieldError::new(FieldPath::field("phone"), "malformed"));
///
/// assert_eq!(name.combine(phone).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldErrors(NonEmptyVec<FieldError>);

impl FieldErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: FieldError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a collection from a `NonEmptyVec` of errors.
    pub fn from_non_empty(errors: NonEmptyVec<FieldError>) -> Self {
        Self(errors)
    }

    /// Creates a collection from a `Vec`, or None if it is empty.
    pub fn try_from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self::from_vec(errors))
        }
    }

    /// Creates a collection from a `Vec<FieldError>`.
    ///
    /// # Panics
    ///
    /// Panics if the provided vec is empty.
    pub fn from_vec(errors: Vec<FieldError>) -> Self {
        Self(NonEmptyVec::from_vec(errors).expect("FieldErrors requires at least one error"))
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns all errors attached to `path`.
    pub fn at_path(&self, path: &FieldPath) -> Vec<&FieldError> {
        self.0.iter().filter(|e| &e.path == path).collect()
    }

    /// Returns all errors attached to the named field.
    pub fn for_field(&self, name: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.path.name() == Some(name)).collect()
    }

    /// Returns all errors with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.code == code).collect()
    }

    /// Returns the first error.
    pub fn first(&self) -> &FieldError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<FieldError>`.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0.into_vec()
    }
}

impl Semigroup for FieldErrors {
    fn combine(self, other: Self) -> Self {
        FieldErrors(self.0.combine(other.0))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} form error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = &'a FieldError;
    type IntoIter = Box<dyn Iterator<Item = &'a FieldError> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
