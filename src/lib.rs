//! # Inquest
//!
//! Validation and submission state for contact-style forms.
//!
//! ## Overview
//!
//! A form is described by a [`FormSchema`]: an ordered set of named fields,
//! each with a field schema listing its constraints. Validating a form checks
//! every field and reports every failing one, but only the first failing
//! constraint of each field, so the user sees one message per input. Error
//! accumulation across fields is built on stillwater's `Validation` type.
//!
//! Around the schema sit the pieces a form UI needs:
//!
//! - [`SelectState`]: single and multi-select dropdowns
//! - [`FileDropState`]: drag and drop or file dialog uploads with read progress
//! - [`FormState`]: values, messages and the submission state machine
//! - [`FormController`]: runs a [`SubmitHandler`] with a timeout
//!
//! ## Example
//!
//! ```rust
//! use inquest::schema::contact::{contact_form_schema, fields, messages};
//! use inquest::{FieldValue, FormValues};
//!
//! let mut values = FormValues::new();
//! values.insert(fields::EMAIL.into(), FieldValue::from("not-an-email"));
//!
//! let report = contact_form_schema().check(&values);
//! assert_eq!(report.get(fields::EMAIL), Some(messages::EMAIL_INVALID));
//! assert_eq!(report.get(fields::NAME), Some("Required"));
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod path;
pub mod report;
pub mod schema;
pub mod select;
pub mod state;
pub mod submit;
pub mod upload;
pub mod value;

pub use config::FormConfig;
pub use controller::FormController;
pub use error::{ConfigError, FieldError, FieldErrors, SubmitRejected};
pub use path::FieldPath;
pub use report::ValidationReport;
pub use schema::{
    BoolSchema, FieldSchema, FileSchema, FormSchema, NumberSchema, OptionsSchema, Schema,
    StringSchema, ValidatedForm, ValueValidator,
};
pub use select::{SelectState, Selection};
pub use state::{FormState, SubmitStatus};
pub use submit::{SimulatedSubmitHandler, SubmitHandler};
pub use upload::{read_with_progress, FileDropState, ReadTicket, UploadEvent};
pub use value::{FieldValue, FileRef, FormValues, OptionValue, SelectOption};

/// Type alias for validation results using FieldErrors
pub type ValidationResult<T> = stillwater::Validation<T, FieldErrors>;
