//! Field values held by a form.
//!
//! A form is a flat map from field name to [`FieldValue`]. Values are plain
//! data: text inputs hold [`FieldValue::Text`], the skills picker holds
//! [`FieldValue::Options`], the uploader holds a [`FileRef`] describing the
//! selected file, and so on. Every value serializes to untagged JSON so a
//! whole form can be logged or sent as a single object.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Current values of a form, keyed by field name in insertion order.
pub type FormValues = IndexMap<String, FieldValue>;

/// The value of an option in a select field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Number(i64),
    Text(String),
}

impl Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for OptionValue {
    fn from(n: i64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Number(i64::from(n))
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

/// An entry of a select field: a display label and the value it stands for.
///
/// Two options are the same option when their `value`s are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: OptionValue,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

impl PartialEq for SelectOption {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for SelectOption {}

/// Metadata of a file picked by the user.
///
/// Only what validation needs is kept; the bytes stay with whoever read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    /// MIME type as reported by the source, e.g. `application/pdf`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
}

impl FileRef {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
        }
    }

    /// Shortened name for narrow displays: the first nine characters of the
    /// name, an ellipsis, then the extension.
    ///
    /// ```rust
    /// use inquest::FileRef;
    ///
    /// let file = FileRef::new("curriculum-vitae.pdf", "application/pdf", 1024);
    /// assert_eq!(file.short_name(), "curriculu...pdf");
    /// ```
    pub fn short_name(&self) -> String {
        let head: String = self.name.chars().take(9).collect();
        let extension = self.name.rsplit('.').next().unwrap_or_default();
        format!("{}...{}", head, extension)
    }
}

/// The value of a single form field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The field has not been filled in.
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    File(FileRef),
    Options(Vec<SelectOption>),
}

impl FieldValue {
    /// Returns the name of this value's kind, used in type error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Empty => "empty",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::File(_) => "file",
            FieldValue::Options(_) => "options",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileRef> {
        match self {
            FieldValue::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn as_options(&self) -> Option<&[SelectOption]> {
        match self {
            FieldValue::Options(options) => Some(options),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<FileRef> for FieldValue {
    fn from(file: FileRef) -> Self {
        FieldValue::File(file)
    }
}

impl From<Option<FileRef>> for FieldValue {
    fn from(file: Option<FileRef>) -> Self {
        file.map(FieldValue::File).unwrap_or_default()
    }
}

impl From<Vec<SelectOption>> for FieldValue {
    fn from(options: Vec<SelectOption>) -> Self {
        FieldValue::Options(options)
    }
}
