//! Field locations for validation errors.
//!
//! Form values are a flat map of named fields, so an error either belongs to
//! one field or to the form as a whole (the root). [`FieldPath`] captures
//! exactly those two cases.

use std::fmt::{self, Display};

/// The location a validation error is attached to.
///
/// # Example
///
/// ```rust
/// use inquest::FieldPath;
///
/// let path = FieldPath::field("email");
/// assert_eq!(path.to_string(), "email");
/// assert_eq!(path.name(), Some("email"));
///
/// assert!(FieldPath::root().is_root());
/// assert_eq!(FieldPath::root().to_string(), "(root)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FieldPath {
    /// The form as a whole.
    #[default]
    Root,
    /// A single named field.
    Field(String),
}

impl FieldPath {
    /// Returns the root location.
    pub fn root() -> Self {
        FieldPath::Root
    }

    /// Returns the location of a named field.
    pub fn field(name: impl Into<String>) -> Self {
        FieldPath::Field(name.into())
    }

    /// Returns true if this is the root location.
    pub fn is_root(&self) -> bool {
        matches!(self, FieldPath::Root)
    }

    /// Returns the field name, or None for the root.
    pub fn name(&self) -> Option<&str> {
        match self {
            FieldPath::Root => None,
            FieldPath::Field(name) => Some(name),
        }
    }
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Root => write!(f, "(root)"),
            FieldPath::Field(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for FieldPath {
    fn from(name: &str) -> Self {
        FieldPath::field(name)
    }
}
