//! Selection state of a dropdown select control.
//!
//! [`SelectState`] tracks which options are picked and whether the dropdown
//! is open. Time is passed in by the caller, so the "stay open" window that
//! keeps the list open while an option click is being handled can be driven
//! by any event loop and tested without sleeping.

use std::time::{Duration, Instant};

use crate::config::FormConfig;
use crate::value::{FieldValue, SelectOption};

/// The picked options.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Any number of options, in the order they were picked.
    Multiple(Vec<SelectOption>),
    /// At most one option.
    Single(Option<SelectOption>),
}

/// State of one select control.
///
/// # Example
///
/// ```rust
/// use inquest::{SelectOption, SelectState};
///
/// let react = SelectOption::new("React", 1);
/// let mut skills = SelectState::multiple();
///
/// skills.select(&react);
/// assert!(skills.is_selected(&react));
///
/// // Selecting again removes it.
/// skills.select(&react);
/// assert!(skills.selected().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SelectState {
    selection: Selection,
    open: bool,
    stay_open_until: Option<Instant>,
    stay_open_window: Duration,
}

impl SelectState {
    /// A multi-select with nothing picked.
    pub fn multiple() -> Self {
        Self::with_selection(Selection::Multiple(Vec::new()))
    }

    /// A single-select with nothing picked.
    pub fn single() -> Self {
        Self::with_selection(Selection::Single(None))
    }

    fn with_selection(selection: Selection) -> Self {
        Self {
            selection,
            open: false,
            stay_open_until: None,
            stay_open_window: FormConfig::default().stay_open_window(),
        }
    }

    /// Uses the stay-open window from `config`.
    pub fn configured(mut self, config: &FormConfig) -> Self {
        self.stay_open_window = config.stay_open_window();
        self
    }

    /// Picks or unpicks `option`.
    ///
    /// In multiple mode an option whose value is already picked is removed,
    /// otherwise it is appended. In single mode the selection is replaced.
    pub fn select(&mut self, option: &SelectOption) {
        match &mut self.selection {
            Selection::Multiple(selected) => {
                if let Some(index) = selected.iter().position(|o| o.value == option.value) {
                    selected.remove(index);
                } else {
                    selected.push(option.clone());
                }
            }
            Selection::Single(current) => *current = Some(option.clone()),
        }
    }

    /// Unpicks everything.
    pub fn clear(&mut self) {
        match &mut self.selection {
            Selection::Multiple(selected) => selected.clear(),
            Selection::Single(current) => *current = None,
        }
    }

    /// Returns true if `option` should be shown as picked.
    ///
    /// Multiple mode matches by label, so two options sharing a label show
    /// the same state. Single mode requires both label and value to match.
    pub fn is_selected(&self, option: &SelectOption) -> bool {
        match &self.selection {
            Selection::Multiple(selected) => selected.iter().any(|o| o.label == option.label),
            Selection::Single(current) => current
                .as_ref()
                .is_some_and(|o| o.label == option.label && o.value == option.value),
        }
    }

    /// The picked options, in pick order.
    pub fn selected(&self) -> &[SelectOption] {
        match &self.selection {
            Selection::Multiple(selected) => selected,
            Selection::Single(current) => current.as_slice(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selection as a form value. A single-select with nothing picked is empty.
    pub fn to_field_value(&self) -> FieldValue {
        match &self.selection {
            Selection::Multiple(selected) => FieldValue::Options(selected.clone()),
            Selection::Single(Some(option)) => FieldValue::Options(vec![option.clone()]),
            Selection::Single(None) => FieldValue::Empty,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens a closed list and closes an open one.
    pub fn toggle_open(&mut self) {
        self.open = !self.open;
    }

    /// Marks the start of a press on an option, keeping the list open until
    /// the stay-open window has elapsed.
    pub fn press_option(&mut self, now: Instant) {
        self.stay_open_until = Some(now + self.stay_open_window);
    }

    /// Handles focus leaving the control. Closes the list unless an option
    /// press is still inside its stay-open window. Returns true if the list
    /// was closed.
    pub fn blur(&mut self, now: Instant) -> bool {
        if self.stays_open(now) {
            return false;
        }
        self.stay_open_until = None;
        let was_open = self.open;
        self.open = false;
        was_open
    }

    /// Handles a click on an option of the list. Ignored while the list is
    /// closed. Returns true if the selection changed.
    pub fn click_option(&mut self, option: &SelectOption) -> bool {
        if !self.open {
            return false;
        }
        self.select(option);
        true
    }

    fn stays_open(&self, now: Instant) -> bool {
        self.stay_open_until.is_some_and(|until| now < until)
    }
}
