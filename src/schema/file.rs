//! File schema validation.
//!
//! This module provides [`FileSchema`] for upload fields: presence, MIME type
//! whitelist and size limit.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{FieldError, FieldErrors};
use crate::path::FieldPath;
use crate::value::{FieldValue, FileRef};

use super::traits::{first_failure, type_error, FieldSchema, Predicate};

#[derive(Clone)]
enum FileConstraint {
    MimeTypes {
        allowed: Vec<String>,
        message: Option<String>,
    },
    MaxSize {
        limit: u64,
        message: Option<String>,
    },
    Refine {
        predicate: Predicate<FileRef>,
        message: Option<String>,
    },
}

/// A schema for file fields.
///
/// A missing file fails the presence check, reported with the type error
/// message (`"Required"` unless overridden with [`error`](Self::error)
/// before any constraint).
///
/// # Example
///
/// ```rust
/// use inquest::{FieldPath, FieldValue, FileRef, Schema};
///
/// let schema = Schema::file()
///     .mime_types(["application/pdf", "image/png"])
///     .max_size(5_000_000);
///
/// let cv = FieldValue::from(FileRef::new("cv.pdf", "application/pdf", 1_000_000));
/// assert!(schema.validate(&cv, &FieldPath::root()).is_success());
///
/// let archive = FieldValue::from(FileRef::new("cv.zip", "application/zip", 1_000));
/// assert!(schema.validate(&archive, &FieldPath::root()).is_failure());
/// ```
#[derive(Clone)]
pub struct FileSchema {
    constraints: Vec<FileConstraint>,
    type_error_message: Option<String>,
}

impl FileSchema {
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Requires the file's MIME type to be one of `allowed`.
    pub fn mime_types<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints.push(FileConstraint::MimeTypes {
            allowed: allowed.into_iter().map(Into::into).collect(),
            message: None,
        });
        self
    }

    /// Requires the file to be strictly smaller than `limit` bytes.
    pub fn max_size(mut self, limit: u64) -> Self {
        self.constraints.push(FileConstraint::MaxSize {
            limit,
            message: None,
        });
        self
    }

    /// Requires `predicate` to hold for the file.
    pub fn refine<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FileRef) -> bool + Send + Sync + 'static,
    {
        self.constraints.push(FileConstraint::Refine {
            predicate: Arc::new(predicate),
            message: None,
        });
        self
    }

    /// Sets the message of the most recent constraint, or the presence/type
    /// error message if no constraint was declared yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                FileConstraint::MimeTypes { message: m, .. }
                | FileConstraint::MaxSize { message: m, .. }
                | FileConstraint::Refine { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    pub fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<FileRef, FieldErrors> {
        let file = match value.as_file() {
            Some(file) => file,
            None => return type_error(value, path, "file", self.type_error_message.as_ref()),
        };

        let failure = self.constraints.iter().find_map(|c| match c {
            FileConstraint::MimeTypes { allowed, message } => {
                (!allowed.iter().any(|t| t == &file.mime_type)).then(|| {
                    let msg = message.clone().unwrap_or_else(|| {
                        format!("Unsupported file type '{}'", file.mime_type)
                    });
                    FieldError::new(path.clone(), msg)
                        .with_code("mime_type")
                        .with_expected(allowed.join(", "))
                        .with_got(file.mime_type.clone())
                })
            }
            FileConstraint::MaxSize { limit, message } => (file.size >= *limit).then(|| {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("File must be smaller than {} bytes", limit));
                FieldError::new(path.clone(), msg)
                    .with_code("max_size")
                    .with_expected(format!("less than {} bytes", limit))
                    .with_got(format!("{} bytes", file.size))
            }),
            FileConstraint::Refine { predicate, message } => (!predicate(file)).then(|| {
                let msg = message.clone().unwrap_or_else(|| "Invalid input".to_string());
                FieldError::new(path.clone(), msg).with_code("custom")
            }),
        });

        first_failure(failure, || file.clone())
    }
}

impl Default for FileSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldSchema for FileSchema {
    type Output = FileRef;

    fn validate(&self, value: &FieldValue, path: &FieldPath) -> Validation<FileRef, FieldErrors> {
        self.validate(value, path)
    }

    fn validate_to_value(
        &self,
        value: &FieldValue,
        path: &FieldPath,
    ) -> Validation<FieldValue, FieldErrors> {
        self.validate(value, path).map(FieldValue::File)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(mime: &str, size: u64) -> FieldValue {
        FieldValue::from(FileRef::new("upload", mime, size))
    }

    fn code_of(schema: &FileSchema, value: &FieldValue) -> Option<String> {
        schema
            .validate(value, &FieldPath::field("file"))
            .into_result()
            .err()
            .map(|e| e.first().code.clone())
    }

    #[test]
    fn test_size_limit_is_exclusive() {
        let schema = FileSchema::new().max_size(100);
        assert_eq!(code_of(&schema, &file("image/png", 99)), None);
        assert_eq!(code_of(&schema, &file("image/png", 100)).as_deref(), Some("max_size"));
    }

    #[test]
    fn test_mime_checked_before_size() {
        let schema = FileSchema::new().mime_types(["image/png"]).max_size(10);
        assert_eq!(
            code_of(&schema, &file("application/zip", 1_000)).as_deref(),
            Some("mime_type")
        );
        assert_eq!(code_of(&schema, &file("image/png", 1_000)).as_deref(), Some("max_size"));
    }

    #[test]
    fn test_missing_file() {
        let schema = FileSchema::new().error("Attach a file").mime_types(["image/png"]);
        let errors = schema
            .validate(&FieldValue::Empty, &FieldPath::field("file"))
            .into_result()
            .unwrap_err();
        assert_eq!(errors.first().code, "required");
        assert_eq!(errors.first().message, "Attach a file");
    }

    #[test]
    fn test_refine_on_name() {
        let schema = FileSchema::new()
            .refine(|f| !f.name.is_empty())
            .error("file needs a name");
        let unnamed = FieldValue::from(FileRef::new("", "image/png", 1));
        assert_eq!(code_of(&schema, &unnamed).as_deref(), Some("custom"));
    }
}
