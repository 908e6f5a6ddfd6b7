//! Display-ready validation results.
//!
//! [`ValidationReport`] is what a form shows next to its inputs: for each
//! failing field, the message of the first constraint it failed. A field
//! that passed has no entry.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::FieldErrors;
use crate::path::FieldPath;

/// First failure message per field, in schema declaration order.
///
/// Errors attached to the form as a whole are kept separately under
/// [`root`](Self::root).
///
/// # Example
///
/// ```rust
/// use inquest::{FieldError, FieldErrors, FieldPath, ValidationReport};
///
/// let errors = FieldErrors::from_vec(vec![
///     FieldError::new(FieldPath::field("name"), "too short"),
///     FieldError::new(FieldPath::field("name"), "ignored, not first"),
///     FieldError::new(FieldPath::field("email"), "Invalid email"),
/// ]);
///
/// let report = ValidationReport::from_errors(&errors);
/// assert_eq!(report.get("name"), Some("too short"));
/// assert_eq!(report.get("email"), Some("Invalid email"));
/// assert_eq!(report.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    fields: IndexMap<String, String>,
    root: Option<String>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a report keeping the first error of every field.
    pub fn from_errors(errors: &FieldErrors) -> Self {
        let mut report = Self::new();
        for error in errors {
            report.insert_first(&error.path, &error.message);
        }
        report
    }

    /// Records `message` for `path` unless that location already has one.
    pub fn insert_first(&mut self, path: &FieldPath, message: &str) {
        match path {
            FieldPath::Root => {
                if self.root.is_none() {
                    self.root = Some(message.to_string());
                }
            }
            FieldPath::Field(name) => {
                self.fields
                    .entry(name.clone())
                    .or_insert_with(|| message.to_string());
            }
        }
    }

    /// Returns the message for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Returns true if the field has a message.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Returns the form-level message, if any.
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Removes the message of a single field, returning it.
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.fields.shift_remove(field)
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.fields.clear();
        self.root = None;
    }

    /// Number of failing fields plus one if a root message is present.
    pub fn len(&self) -> usize {
        self.fields.len() + usize::from(self.root.is_some())
    }

    /// True when nothing failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.root.is_none()
    }

    /// Iterates over `(field, message)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names of the failing fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}
