//! Numeric schema validation.
//!
//! This module provides [`NumberSchema`] for numeric fields with bounds,
//! sign and whole-number constraints.

use std::ops::RangeInclusive;
use std::sync::Arc;

use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::FieldValue;

use super::traits::{first_failure, type_error, FieldSchema, Predicate};

#[derive(Clone)]
enum NumberConstraint {
    Min { value: f64, message: Option<String> },
    Max { value: f64, message: Option<String> },
    Positive { message: Option<String> },
    Integer { message: Option<String> },
    Refine { predicate: Predicate<f64>, message: Option<String> },
}

/// A schema for numeric fields.
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, Schema};
///
/// let schema = Schema::number().integer().range(1.0..=10.0);
///
/// assert!(schema.validate(&FieldValue::from(3.0), &FieldPath::root()).is_success());
/// assert!(schema.validate(&FieldValue::from(3.5), &FieldPath::root()).is_failure());
/// assert!(schema.validate(&FieldValue::from(11.0), &FieldPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct NumberSchema {
    constraints: Vec<NumberConstraint>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    /// Creates a number schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires the value to be at least `value` (inclusive).
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            message: None,
        });
        self
    }

    /// Requires the value to be at most `value` (inclusive).
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            message: None,
        });
        self
    }

    /// Shorthand for `.min(start).max(end)`.
    pub fn range(self, range: RangeInclusive<f64>) -> Self {
        self.min(*range.start()).max(*range.end())
    }

    /// Requires the value to be greater than zero.
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Positive { message: None });
        self
    }

    /// Requires a whole number.
    pub fn integer(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Integer { message: None });
        self
    }

    /// Requires `predicate` to hold for the value.
    pub fn refine<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&f64) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(NumberConstraint::Refine {
            predicate: Arc::new(predicate),
            message: None,
        });
        self
    }

    /// Sets the message of the most recent constraint, or the type error
    /// message if no constraint was declared yet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let age = Schema::number()
    ///     .error("Age must be a number")
    ///     .min(18.0)
    ///     .error("You must be an adult");
    /// let path = FieldPath::field("age");
    ///
    /// let text = age.validate(&FieldValue::from("x"), &path).into_result().unwrap_err();
    /// assert_eq!(text.first().message, "Age must be a number");
    ///
    /// let minor = age.validate(&FieldValue::from(12.0), &path).into_result().unwrap_err();
    /// assert_eq!(minor.first().message, "You must be an adult");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                NumberConstraint::Min { message: m, .. }
                | NumberConstraint::Max { message: m, .. }
                | NumberConstraint::Positive { message: m }
                | NumberConstraint::Integer { message: m }
                | NumberConstraint::Refine { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Validates a value, returning the number on success.
    ///
    /// NaN and infinities are rejected as the wrong kind.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let schema = Schema::number().positive();
    ///
    /// let n = schema.validate(&FieldValue::from(2.5), &FieldPath::root()).into_result();
    /// assert_eq!(n.unwrap(), 2.5);
    /// assert!(schema.validate(&FieldValue::from(f64::NAN), &FieldPath::root()).is_failure());
    /// ```
    pub fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<f64, FieldErrors> {
        let n = match value.as_number() {
            Some(n) if n.is_finite() => n,
            _ => return type_error(value, path, "number", self.type_error_message.as_ref()),
        };

        let failure = self
            .constraints
            .iter()
            .find_map(|c| check_constraint(c, n, path));

        first_failure(failure, || n)
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema for NumberSchema {
    type Output = f64;

    fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<f64, FieldErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate(value, path).map(FieldValue::Number)
    }
}

fn check_constraint(constraint: &NumberConstraint, n: f64, path: &FieldPath) -> Option<FieldError> {
    match constraint {
        NumberConstraint::Min { value, message } => (n < *value).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("Number must be greater than or equal to {}", value));
            FieldError::new(path.clone(), msg)
                .with_code("min_value")
                .with_expected(format!(">= {}", value))
                .with_got(n.to_string())
        }),
        NumberConstraint::Max { value, message } => (n > *value).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("Number must be less than or equal to {}", value));
            FieldError::new(path.clone(), msg)
                .with_code("max_value")
                .with_expected(format!("<= {}", value))
                .with_got(n.to_string())
        }),
        NumberConstraint::Positive { message } => (n <= 0.0).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| "Number must be greater than 0".to_string());
            FieldError::new(path.clone(), msg)
                .with_code("positive")
                .with_expected("> 0")
                .with_got(n.to_string())
        }),
        NumberConstraint::Integer { message } => (n.fract() != 0.0).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| "Expected integer, received float".to_string());
            FieldError::new(path.clone(), msg)
                .with_code("integer")
                .with_got(n.to_string())
        }),
        NumberConstraint::Refine { predicate, message } => (!predicate(&n)).then(|| {
            let msg = message.clone().unwrap_or_else(|| "Invalid input".to_string());
            FieldError::new(path.clone(), msg).with_code("custom")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_of(schema: &NumberSchema, n: f64) -> Option<String> {
        schema
            .validate(&FieldValue::from(n), &FieldPath::root())
            .into_result()
            .err()
            .map(|e| e.first().code.clone())
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let schema = NumberSchema::new().range(0.0..=100.0);
        assert_eq!(code_of(&schema, 0.0), None);
        assert_eq!(code_of(&schema, 100.0), None);
        assert_eq!(code_of(&schema, -0.5).as_deref(), Some("min_value"));
        assert_eq!(code_of(&schema, 100.5).as_deref(), Some("max_value"));
    }

    #[test]
    fn test_positive_and_integer() {
        let schema = NumberSchema::new().positive().integer();
        assert_eq!(code_of(&schema, 0.0).as_deref(), Some("positive"));
        assert_eq!(code_of(&schema, 1.5).as_deref(), Some("integer"));
        assert_eq!(code_of(&schema, 2.0), None);
    }

    #[test]
    fn test_non_finite_is_type_error() {
        let schema = NumberSchema::new();
        assert_eq!(code_of(&schema, f64::NAN).as_deref(), Some("invalid_type"));
        assert_eq!(code_of(&schema, f64::INFINITY).as_deref(), Some("invalid_type"));
    }

    #[test]
    fn test_text_is_type_error() {
        let schema = NumberSchema::new().error("age must be a number");
        let errors = schema
            .validate(&FieldValue::from("42"), &FieldPath::field("age"))
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().message, "age must be a number");
    }

    #[test]
    fn test_refine() {
        let schema = NumberSchema::new().refine(|n| *n % 5.0 == 0.0).error("steps of five");
        assert_eq!(code_of(&schema, 10.0), None);
        assert_eq!(code_of(&schema, 11.0).as_deref(), Some("custom"));
    }
}
