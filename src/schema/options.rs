//! Option list schema validation.
//!
//! This module provides [`OptionsSchema`] for fields backed by a select
//! control: item count bounds, uniqueness, and membership in the option source.

use std::collections::HashMap;
use std::sync::Arc;

use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::{FieldValue, OptionValue, SelectOption};

use super::traits::{first_failure, type_error, FieldSchema, Predicate};

#[derive(Clone)]
enum OptionsConstraint {
    MinItems {
        min: usize,
        message: Option<String>,
    },
    MaxItems {
        max: usize,
        message: Option<String>,
    },
    Unique {
        message: Option<String>,
    },
    Within {
        allowed: Vec<OptionValue>,
        message: Option<String>,
    },
    Refine {
        predicate: Predicate<[SelectOption]>,
        message: Option<String>,
    },
}

/// A schema for lists of selected options.
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, Schema, SelectOption};
///
/// let skills = Schema::options()
///     .non_empty()
///     .error("You must select at least one skill");
///
/// let picked = FieldValue::from(vec![SelectOption::new("React", 1)]);
/// assert!(skills.validate(&picked, &FieldPath::root()).is_success());
///
/// let errors = skills
///     .validate(&FieldValue::from(Vec::new()), &FieldPath::root())
///     .into_result()
///     .unwrap_err();
/// assert_eq!(errors.first().message, "You must select at least one skill");
/// ```
#[derive(Clone)]
pub struct OptionsSchema {
    constraints: Vec<OptionsConstraint>,
    type_error_message: Option<String>,
}

impl OptionsSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires at least `min` selected options.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(OptionsConstraint::MinItems { min, message: None });
        self
    }

    /// Requires at most `max` selected options.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(OptionsConstraint::MaxItems { max, message: None });
        self
    }

    /// Requires at least one selected option. Same as `.min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Requires every selected option to have a distinct value.
    pub fn unique(mut self) -> Self {
        self.constraints
            .push(OptionsConstraint::Unique { message: None });
        self
    }

    /// Requires every selected option to come from `source`, compared by value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema, SelectOption};
    ///
    /// let source = vec![SelectOption::new("React", 1), SelectOption::new("Vue", 2)];
    /// let schema = Schema::options().within(&source);
    ///
    /// let renamed = FieldValue::from(vec![SelectOption::new("React.js", 1)]);
    /// assert!(schema.validate(&renamed, &FieldPath::root()).is_success());
    ///
    /// let unknown = FieldValue::from(vec![SelectOption::new("Elm", 9)]);
    /// assert!(schema.validate(&unknown, &FieldPath::root()).is_failure());
    /// ```
    pub fn within(mut self, source: &[SelectOption]) -> Self {
        self.constraints.push(OptionsConstraint::Within {
            allowed: source.iter().map(|o| o.value.clone()).collect(),
            message: None,
        });
        self
    }

    /// Requires `predicate` to hold for the whole selection.
    pub fn refine<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&[SelectOption]) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(OptionsConstraint::Refine {
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
    /// use inquest::{FieldPath, FieldValue, Schema, SelectOption};
    ///
    /// let schema = Schema::options()
    ///     .non_empty()
    ///     .unique()
    ///     .error("Pick each skill once");
    ///
    /// let twice = FieldValue::from(vec![
    ///     SelectOption::new("Go", 4),
    ///     SelectOption::new("Go", 4),
    /// ]);
    /// let errors = schema.validate(&twice, &FieldPath::root()).into_result().unwrap_err();
    /// assert_eq!(errors.first().message, "Pick each skill once");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                OptionsConstraint::MinItems { message: m, .. }
                | OptionsConstraint::MaxItems { message: m, .. }
                | OptionsConstraint::Unique { message: m }
                | OptionsConstraint::Within { message: m, .. }
                | OptionsConstraint::Refine { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Validates a value, returning the selected options on success.
    ///
    /// # Example
    ///
    /// ```rust
    /// use inquest::{FieldPath, FieldValue, Schema, SelectOption};
    ///
    /// let schema = Schema::options().max_len(1);
    /// let picked = FieldValue::from(vec![SelectOption::new("Rust", 5)]);
    ///
    /// let selected = schema.validate(&picked, &FieldPath::root()).into_result().unwrap();
    /// assert_eq!(selected[0].label, "Rust");
    ///
    /// let missing = schema
    ///     .validate(&FieldValue::Empty, &FieldPath::field("skills"))
    ///     .into_result()
    ///     .unwrap_err();
    /// assert_eq!(missing.first().code, "required");
    /// ```
    pub fn validate(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<Vec<SelectOption>, FieldErrors> {
        let selected = match value.as_options() {
            Some(selected) => selected,
            None => return type_error(value, path, "options", self.type_error_message.as_ref()),
        };

        let failure = self
            .constraints
            .iter()
            .find_map(|c| check_constraint(c, selected, path));

        first_failure(failure, || selected.to_vec())
    }
}

impl Default for OptionsSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema for OptionsSchema {
    type Output = Vec<SelectOption>;

    fn validate(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<Vec<SelectOption>, FieldErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate(value, path).map(FieldValue::Options)
    }
}

fn check_constraint(
    constraint: &OptionsConstraint,
    selected: &[SelectOption],
    path: &FieldPath,
) -> Option<FieldError> {
    match constraint {
        OptionsConstraint::MinItems { min, message } => (selected.len() < *min).then(|| {
            let msg = message.clone().unwrap_or_else(|| {
                format!("Array must contain at least {} element(s)", min)
            });
            FieldError::new(path.clone(), msg)
                .with_code("min_items")
                .with_expected(format!("at least {} items", min))
                .with_got(format!("{} items", selected.len()))
        }),
        OptionsConstraint::MaxItems { max, message } => (selected.len() > *max).then(|| {
            let msg = message.clone().unwrap_or_else(|| {
                format!("Array must contain at most {} element(s)", max)
            });
            FieldError::new(path.clone(), msg)
                .with_code("max_items")
                .with_expected(format!("at most {} items", max))
                .with_got(format!("{} items", selected.len()))
        }),
        OptionsConstraint::Unique { message } => {
            let duplicates = find_duplicates(selected);
            duplicates.first().map(|(value, indices)| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("option '{}' is selected more than once", value));
                FieldError::new(path.clone(), msg)
                    .with_code("unique")
                    .with_got(format!("duplicates at indices {:?}", indices))
            })
        }
        OptionsConstraint::Within { allowed, message } => selected
            .iter()
            .find(|o| !allowed.contains(&o.value))
            .map(|unknown| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("'{}' is not an available option", unknown.label));
                FieldError::new(path.clone(), msg)
                    .with_code("unknown_option")
                    .with_got(unknown.value.to_string())
            }),
        OptionsConstraint::Refine { predicate, message } => (!predicate(selected)).then(|| {
            let msg = message.clone().unwrap_or_else(|| "Invalid input".to_string());
            FieldError::new(path.clone(), msg).with_code("custom")
        }),
    }
}

/// Returns each repeated option value with the indices it appears at,
/// ordered by first appearance.
fn find_duplicates(selected: &[SelectOption]) -> Vec<(&OptionValue, Vec<usize>)> {
    let mut seen: HashMap<&OptionValue, Vec<usize>> = HashMap::new();
    let mut order = Vec::new();

    for (index, option) in selected.iter().enumerate() {
        let indices = seen.entry(&option.value).or_default();
        if indices.is_empty() {
            order.push(&option.value);
        }
        indices.push(index);
    }

    order
        .into_iter()
        .filter_map(|value| {
            let indices = seen.remove(value)?;
            (indices.len() > 1).then_some((value, indices))
        })
        .collect()
}
