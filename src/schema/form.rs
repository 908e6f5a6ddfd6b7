//! Form schema validation.
//!
//! This module provides [`FormSchema`], an ordered set of named field schemas
//! plus cross-field constraints, and [`ValidatedForm`], the value map handed
//! to a submit handler once every field has passed.

use indexmap::IndexMap;
use serde::Serialize;
use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::report::ValidationReport;
use crate::value::{FieldValue, FileRef, FormValues, SelectOption};

use super::traits::{FieldSchema, ValueValidator};

type CrossFieldFn = Box<dyn Fn(&ValidatedForm) -> Validation<(), FieldErrors> + Send + Sync>;

struct FieldDef {
    validator: Box<dyn ValueValidator>,
    required: bool,
}

/// Form values that passed every field and cross-field constraint.
///
/// Contains only declared fields, in declaration order. Optional fields left
/// empty are absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidatedForm(IndexMap<String, FieldValue>);

impl ValidatedForm {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn file(&self, field: &str) -> Option<&FileRef> {
        self.get(field).and_then(FieldValue::as_file)
    }

    pub fn options(&self, field: &str) -> Option<&[SelectOption]> {
        self.get(field).and_then(FieldValue::as_options)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_values(self) -> FormValues {
        self.0
    }
}

/// A schema for a whole form.
///
/// Fields are validated in declaration order and every field is checked,
/// so one submit attempt reports all failing fields at once. Within a field
/// the first failing constraint wins. Cross-field constraints run only once
/// every field has passed.
///
/// # Example
///
/// ```rust
/// use inquest::{FormValues, FieldValue, Schema};
///
/// let schema = Schema::form()
///     .field("name", Schema::string().min_len(2))
///     .field("email", Schema::string().email());
///
/// let mut values = FormValues::new();
/// values.insert("name".into(), FieldValue::from("A"));
/// values.insert("email".into(), FieldValue::from("ada@example.com"));
///
/// let report = schema.check(&values);
/// assert!(report.contains("name"));
/// assert!(!report.contains("email"));
/// ```
pub struct FormSchema {
    fields: IndexMap<String, FieldDef>,
    cross_field: Vec<CrossFieldFn>,
    deny_unknown: bool,
}

impl FormSchema {
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            cross_field: Vec::new(),
            deny_unknown: false,
        }
    }

    /// Adds a required field.
    ///
    /// Declaring a name twice replaces the earlier schema but keeps its
    /// position.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: FieldSchema + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                validator: Box::new(schema),
                required: true,
            },
        );
        self
    }

    /// Adds an optional field. An empty or absent value passes and is left
    /// out of the validated form; anything else must satisfy `schema`.
    pub fn optional<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: FieldSchema + 'static,
    {
        self.fields.insert(
            name.into(),
            FieldDef {
                validator: Box::new(schema),
                required: false,
            },
        );
        self
    }

    /// Rejects values for fields the schema does not declare.
    ///
    /// By default such values are ignored and never reach the submit handler.
    pub fn deny_unknown_fields(mut self) -> Self {
        self.deny_unknown = true;
        self
    }

    /// Adds a cross-field constraint.
    ///
    /// ```rust
    /// use inquest::{FieldError, FieldErrors, FieldPath, FieldValue, FormValues, Schema};
    /// use stillwater::Validation;
    ///
    /// let schema = Schema::form()
    ///     .field("password", Schema::string())
    ///     .field("confirm", Schema::string())
    ///     .custom(|form| {
    ///         if form.text("password") == form.text("confirm") {
    ///             Validation::Success(())
    ///         } else {
    ///             Validation::Failure(FieldErrors::single(
    ///                 FieldError::new(FieldPath::field("confirm"), "passwords differ")
    ///                     .with_code("mismatch"),
    ///             ))
    ///         }
    ///     });
    ///
    /// let mut values = FormValues::new();
    /// values.insert("password".into(), FieldValue::from("hunter2"));
    /// values.insert("confirm".into(), FieldValue::from("hunter3"));
    /// assert_eq!(schema.check(&values).get("confirm"), Some("passwords differ"));
    /// ```
    pub fn custom<F>(mut self, check: F) -> Self
    where
        F: Fn(&ValidatedForm) -> Validation<(), FieldErrors> + Send + Sync + 'static,
    {
        self.cross_field.push(Box::new(check));
        self
    }

    /// Requires `target` to be filled in whenever `field` satisfies `condition`.
    pub fn require_if<F>(
        self,
        field: impl Into<String>,
        condition: F,
        target: impl Into<String>,
    ) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        let field = field.into();
        let target = target.into();
        self.custom(move |form| {
            let triggered = form.get(&field).is_some_and(&condition);
            if triggered && !form.contains(&target) {
                Validation::Failure(FieldErrors::single(
                    FieldError::new(
                        FieldPath::field(target.as_str()),
                        format!("'{}' is required when '{}' is set", target, field),
                    )
                    .with_code("conditional_required"),
                ))
            } else {
                Validation::Success(())
            }
        })
    }

    /// Names of the declared fields, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Validates all values.
    ///
    /// Returns the validated form, or every failure: at most one per field
    /// from the field pass, or the cross-field failures.
    pub fn validate(&self, values: &FormValues) -> Validation<ValidatedForm, FieldErrors> {
        let empty = FieldValue::Empty;
        let mut errors = Vec::new();
        let mut validated = IndexMap::new();

        for (name, def) in &self.fields {
            let value = values.get(name).unwrap_or(&empty);
            if !def.required && value.is_empty() {
                continue;
            }

            match def.validator.validate_value(value, &FieldPath::field(name.as_str())) {
                Validation::Success(v) => {
                    validated.insert(name.clone(), v);
                }
                Validation::Failure(e) => errors.extend(e),
            }
        }

        if self.deny_unknown {
            for name in values.keys().filter(|k| !self.fields.contains_key(*k)) {
                errors.push(
                    FieldError::new(
                        FieldPath::field(name.as_str()),
                        format!("unknown field '{}'", name),
                    )
                    .with_code("unknown_field"),
                );
            }
        }

        if let Some(errors) = FieldErrors::try_from_vec(errors) {
            tracing::debug!(failed = errors.len(), "form field validation failed");
            return Validation::Failure(errors);
        }

        let form = ValidatedForm(validated);
        let cross_errors: Vec<FieldError> = self
            .cross_field
            .iter()
            .filter_map(|check| check(&form).into_result().err())
            .flatten()
            .collect();

        match FieldErrors::try_from_vec(cross_errors) {
            Some(errors) => {
                tracing::debug!(failed = errors.len(), "cross-field validation failed");
                Validation::Failure(errors)
            }
            None => Validation::Success(form),
        }
    }

    /// Validates all values and returns the first message per failing field.
    ///
    /// An empty report means the form is valid.
    pub fn check(&self, values: &FormValues) -> ValidationReport {
        match self.validate(values) {
            Validation::Success(_) => ValidationReport::new(),
            Validation::Failure(errors) => ValidationReport::from_errors(&errors),
        }
    }

    /// Validates a single declared field, returning its error if it fails.
    ///
    /// Cross-field constraints are not evaluated. Returns None for unknown
    /// field names.
    pub fn check_field(&self, name: &str, values: &FormValues) -> Option<FieldError> {
        let def = self.fields.get(name)?;
        let empty = FieldValue::Empty;
        let value = values.get(name).unwrap_or(&empty);
        if !def.required && value.is_empty() {
            return None;
        }

        def.validator
            .validate_value(value, &FieldPath::field(name))
            .into_result()
            .err()
            .map(|errors| errors.first().clone())
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::new()
    }
}
