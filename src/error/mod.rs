//! Error types for validation failures and form operations.
//!
//! Field failures ([`FieldError`], [`FieldErrors`]) are data produced by the
//! schema engine. [`SubmitRejected`] and [`ConfigError`] are returned by the
//! form state machine and configuration loader.

mod field_error;
mod form_error;

pub use field_error::{FieldError, FieldErrors};
pub use form_error::{ConfigError, SubmitRejected};
