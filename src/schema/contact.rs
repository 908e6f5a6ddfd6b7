//! The contact form: its fields, skill options and validation rules.

use serde::Serialize;

use crate::value::{FileRef, SelectOption};

use super::{FormSchema, Schema, ValidatedForm};

/// Field names of the contact form.
pub mod fields {
    pub const NAME: &str = "name";
    pub const PHONE: &str = "phone";
    pub const EMAIL: &str = "email";
    pub const SKILLS: &str = "skills";
    pub const FILE: &str = "file";
    pub const CONSENT: &str = "consent";

    /// All fields in display order.
    pub const ALL: [&str; 6] = [NAME, PHONE, EMAIL, SKILLS, FILE, CONSENT];
}

/// User-facing messages of the contact form.
pub mod messages {
    pub const NAME_TOO_SHORT: &str = "Must be 5 or more characters long";
    pub const PHONE_INVALID: &str = "Must be like 2124567890 or +1-212-456-7890";
    pub const EMAIL_INVALID: &str = "Invalid email";
    pub const SKILLS_EMPTY: &str = "You must select at least one skill";
    pub const FILE_UNSUPPORTED: &str =
        "Unsupported file format. Only PDF, DOCX, PNG are accepted.";
    pub const FILE_TOO_LARGE: &str = "The file is too large. The maximum file size is 5 MB.";
    pub const CONSENT_REQUIRED: &str = "Consent must be granted";
}

/// Minimum length of the name field.
pub const NAME_MIN_LEN: usize = 2;

/// MIME types accepted by the file field.
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["application/pdf", "application/msword", "image/png"];

/// Files must be strictly smaller than this many bytes.
pub const MAX_FILE_SIZE: u64 = 5_000_000;

/// The options offered by the skills picker, in display order.
pub fn skill_options() -> Vec<SelectOption> {
    [
        "React",
        "NextJS",
        "PHP",
        "NodeJS",
        "TailwindCSS",
        "HTML/CSS",
        "Python",
        "Java",
        "Bootstrap",
        "Shadcn",
        "Next UI",
        "Django",
        "Laravel",
    ]
    .into_iter()
    .zip(1i64..)
    .map(|(label, value)| SelectOption::new(label, value))
    .collect()
}

/// Builds the validation schema of the contact form.
///
/// ```rust
/// use inquest::schema::contact::{contact_form_schema, fields, messages};
/// use inquest::{FieldValue, FormValues};
///
/// let mut values = FormValues::new();
/// values.insert(fields::NAME.into(), FieldValue::from("A"));
///
/// let report = contact_form_schema().check(&values);
/// assert_eq!(report.get(fields::NAME), Some(messages::NAME_TOO_SHORT));
/// ```
pub fn contact_form_schema() -> FormSchema {
    Schema::form()
        .field(
            fields::NAME,
            Schema::string()
                .min_len(NAME_MIN_LEN)
                .error(messages::NAME_TOO_SHORT),
        )
        .field(
            fields::PHONE,
            Schema::string().phone().error(messages::PHONE_INVALID),
        )
        .field(
            fields::EMAIL,
            Schema::string().email().error(messages::EMAIL_INVALID),
        )
        .field(
            fields::SKILLS,
            Schema::options().non_empty().error(messages::SKILLS_EMPTY),
        )
        .field(
            fields::FILE,
            Schema::file()
                .error(messages::FILE_UNSUPPORTED)
                .mime_types(ALLOWED_MIME_TYPES)
                .error(messages::FILE_UNSUPPORTED)
                .max_size(MAX_FILE_SIZE)
                .error(messages::FILE_TOO_LARGE),
        )
        .field(
            fields::CONSENT,
            Schema::boolean().is_true().error(messages::CONSENT_REQUIRED),
        )
}

/// Typed view of a validated contact form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactSubmission {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub skills: Vec<SelectOption>,
    pub file: FileRef,
    pub consent: bool,
}

impl ContactSubmission {
    /// Extracts the contact fields, or None if any is missing or has the
    /// wrong kind.
    pub fn from_form(form: &ValidatedForm) -> Option<Self> {
        Some(Self {
            name: form.text(fields::NAME)?.to_string(),
            phone: form.text(fields::PHONE)?.to_string(),
            email: form.text(fields::EMAIL)?.to_string(),
            skills: form.options(fields::SKILLS)?.to_vec(),
            file: form.file(fields::FILE)?.clone(),
            consent: form.flag(fields::CONSENT)?,
        })
    }
}
