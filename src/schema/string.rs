//! String schema validation.
//!
//! This module provides [`StringSchema`] for text fields: length bounds,
//! regex patterns, and the built-in email and phone number formats.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::FieldValue;

use super::traits::{first_failure, type_error, FieldSchema, Predicate};

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$";

// One or more digit groups, optionally parenthesised, joined by at most one
// separator. Digit count is checked separately.
const PHONE_PATTERN: &str = r"^\+?(\(\d{1,4}\)|\d)([ .\-]?(\(\d{1,4}\)|\d))*$";

const PHONE_MIN_DIGITS: usize = 9;
const PHONE_MAX_DIGITS: usize = 15;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

/// Returns true if `value` looks like an email address.
pub fn is_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_regex().is_match(value)
}

/// Returns true if `value` looks like a mobile phone number.
///
/// Accepts an optional leading `+`, digits separated by single spaces,
/// dashes or dots, and parenthesised area codes. The number must contain
/// between 9 and 15 digits.
///
/// ```rust
/// use inquest::schema::is_phone_number;
///
/// assert!(is_phone_number("+1-212-456-7890"));
/// assert!(is_phone_number("2124567890"));
/// assert!(is_phone_number("+44 (20) 7946 0958"));
/// assert!(!is_phone_number("123"));
/// assert!(!is_phone_number("212--456-7890"));
/// ```
pub fn is_phone_number(value: &str) -> bool {
    let digits = value.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) && phone_regex().is_match(value)
}

#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
    Phone {
        message: Option<String>,
    },
    Refine {
        predicate: Predicate<str>,
        message: Option<String>,
    },
}

/// A schema for text fields.
///
/// Constraints are checked in declaration order; the first one that fails
/// decides the field's error.
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, Schema};
/// use inquest::schema::FieldSchema;
///
/// let schema = Schema::string()
///     .min_len(2)
///     .error("Must be 5 or more characters long");
///
/// let result = schema.validate(&FieldValue::from("A"), &FieldPath::field("name"));
/// let errors = result.into_result().unwrap_err();
/// assert_eq!(errors.first().message, "Must be 5 or more characters long");
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires at least `min` characters (Unicode scalar values).
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let schema = Schema::string().min_len(2);
    /// assert!(schema.validate(&FieldValue::from("Al"), &FieldPath::root()).is_success());
    /// assert!(schema.validate(&FieldValue::from("é"), &FieldPath::root()).is_failure());
    /// ```
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Requires at most `max` characters (Unicode scalar values).
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Requires the string to match a regex.
    ///
    /// Returns an error if the pattern does not compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let zip = Schema::string().pattern(r"^\d{5}$").unwrap();
    /// assert!(zip.validate(&FieldValue::from("10115"), &FieldPath::root()).is_success());
    /// assert!(zip.validate(&FieldValue::from("1011"), &FieldPath::root()).is_failure());
    ///
    /// assert!(Schema::string().pattern("(unclosed").is_err());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Requires an email address. See [`is_email`].
    pub fn email(mut self) -> Self {
        self.constraints
            .push(StringConstraint::Email { message: None });
        self
    }

    /// Requires a mobile phone number. See [`is_phone_number`].
    pub fn phone(mut self) -> Self {
        self.constraints
            .push(StringConstraint::Phone { message: None });
        self
    }

    /// Requires `predicate` to hold for the string.
    pub fn refine<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(StringConstraint::Refine {
            predicate: Arc::new(predicate),
            message: None,
        });
        self
    }

    /// Sets the message of the most recent constraint.
    ///
    /// Called before any constraint, it sets the message used when the value
    /// is missing or not text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let email = Schema::string()
    ///     .error("Email is required")
    ///     .email()
    ///     .error("Invalid email");
    /// let path = FieldPath::field("email");
    ///
    /// let missing = email.validate(&FieldValue::Empty, &path).into_result().unwrap_err();
    /// assert_eq!(missing.first().message, "Email is required");
    ///
    /// let malformed = email
    ///     .validate(&FieldValue::from("ada@"), &path)
    ///     .into_result()
    ///     .unwrap_err();
    /// assert_eq!(malformed.first().message, "Invalid email");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::MinLength { message: m, .. }
                | StringConstraint::MaxLength { message: m, .. }
                | StringConstraint::Pattern { message: m, .. }
                | StringConstraint::Email { message: m }
                | StringConstraint::Phone { message: m }
                | StringConstraint::Refine { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Validates a value, returning the string on success.
    ///
    /// Stops at the first failing constraint, so a failure carries exactly
    /// one error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema};
    ///
    /// let schema = Schema::string().min_len(3).max_len(5);
    /// let path = FieldPath::field("code");
    ///
    /// let ok = schema.validate(&FieldValue::from("abcd"), &path).into_result();
    /// assert_eq!(ok.unwrap(), "abcd");
    ///
    /// let errors = schema
    ///     .validate(&FieldValue::from(true), &path)
    ///     .into_result()
    ///     .unwrap_err();
    /// assert_eq!(errors.len(), 1);
    /// assert_eq!(errors.first().code, "invalid_type");
    /// ```
    pub fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<String, FieldErrors> {
        let s = match value.as_text() {
            Some(s) => s,
            None => return type_error(value, path, "text", self.type_error_message.as_ref()),
        };

        let failure = self
            .constraints
            .iter()
            .find_map(|c| check_constraint(c, s, path));

        first_failure(failure, || s.to_string())
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema for StringSchema {
    type Output = String;

    fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<String, FieldErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate(value, path).map(FieldValue::Text)
    }
}

fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &FieldPath,
) -> Option<FieldError> {
    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            (len < *min).then(|| {
                let msg = message.clone().unwrap_or_else(|| {
                    format!("String must contain at least {} character(s)", min)
                });
                FieldError::new(path.clone(), msg)
                    .with_code("min_length")
                    .with_expected(format!("at least {} characters", min))
                    .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            (len > *max).then(|| {
                let msg = message.clone().unwrap_or_else(|| {
                    format!("String must contain at most {} character(s)", max)
                });
                FieldError::new(path.clone(), msg)
                    .with_code("max_length")
                    .with_expected(format!("at most {} characters", max))
                    .with_got(format!("{} characters", len))
            })
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => (!regex.is_match(value)).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| format!("must match pattern '{}'", pattern_str));
            FieldError::new(path.clone(), msg)
                .with_code("pattern")
                .with_expected(format!("string matching '{}'", pattern_str))
                .with_got(value.to_string())
        }),
        StringConstraint::Email { message } => (!is_email(value)).then(|| {
            let msg = message.clone().unwrap_or_else(|| "Invalid email".to_string());
            FieldError::new(path.clone(), msg)
                .with_code("email")
                .with_expected("email address")
                .with_got(value.to_string())
        }),
        StringConstraint::Phone { message } => (!is_phone_number(value)).then(|| {
            let msg = message
                .clone()
                .unwrap_or_else(|| "Invalid phone number".to_string());
            FieldError::new(path.clone(), msg)
                .with_code("phone")
                .with_expected("mobile phone number")
                .with_got(value.to_string())
        }),
        StringConstraint::Refine { predicate, message } => (!predicate(value)).then(|| {
            let msg = message.clone().unwrap_or_else(|| "Invalid input".to_string());
            FieldError::new(path.clone(), msg).with_code("custom")
        }),
    }
}
