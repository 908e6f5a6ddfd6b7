//! Schema definitions for form validation.
//!
//! Each field schema checks one kind of value (text, number, boolean, option
//! list, file) against an ordered list of constraints and reports the first
//! one that fails. [`FormSchema`] combines named field schemas and reports
//! every failing field at once.
//!
//! # Example
//!
//! ```rust
//! use inquest::{FieldPath, FieldValue, Schema};
//!
//! let schema = Schema::string().min_len(1).max_len(100);
//!
//! let result = schema.validate(&FieldValue::from("hello"), &FieldPath::root());
//! assert!(result.is_success());
//! ```

mod boolean;
pub mod contact;
mod file;
mod form;
mod number;
mod options;
mod string;
mod traits;

pub use boolean::BoolSchema;
pub use file::FileSchema;
pub use form::{FormSchema, ValidatedForm};
pub use number::NumberSchema;
pub use options::OptionsSchema;
pub use string::{is_email, is_phone_number, StringSchema};
pub use traits::{FieldSchema, ValueValidator};

/// Entry point for creating validation schemas.
///
/// # Example
///
/// ```rust
/// use inquest::Schema;
///
/// let signup = Schema::form()
///     .field("name", Schema::string().min_len(2))
///     .field("age", Schema::number().integer().min(18.0))
///     .field("topics", Schema::options().non_empty())
///     .field("cv", Schema::file().mime_types(["application/pdf"]))
///     .field("terms", Schema::boolean().is_true());
/// ```
pub struct Schema;

impl Schema {
    /// Creates a schema for text fields.
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a schema for numeric fields.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a schema for checkbox fields.
    pub fn boolean() -> BoolSchema {
        BoolSchema::new()
    }

    /// Creates a schema for multi-select fields.
    pub fn options() -> OptionsSchema {
        OptionsSchema::new()
    }

    /// Creates a schema for file upload fields.
    pub fn file() -> FileSchema {
        FileSchema::new()
    }

    /// Creates an empty form schema.
    pub fn form() -> FormSchema {
        FormSchema::new()
    }
}
