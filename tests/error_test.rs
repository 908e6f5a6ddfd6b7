//! Integration tests for FieldError, FieldErrors and ValidationReport.

use inquest::{FieldError, FieldErrors, FieldPath, ValidationReport, ValidationResult};
use stillwater::prelude::*;
use stillwater::Validation;

#[test]
fn test_field_error_full_context() {
    let error = FieldError::new(FieldPath::field("email"), "Invalid email")
        .with_code("email")
        .with_got("not-an-email")
        .with_expected("email address");

    assert_eq!(error.path.to_string(), "email");
    assert_eq!(error.message, "Invalid email");
    assert_eq!(error.code, "email");
    assert_eq!(error.got, Some("not-an-email".to_string()));
    assert_eq!(error.expected, Some("email address".to_string()));
}

#[test]
fn test_field_errors_never_empty() {
    let errors = FieldErrors::single(FieldError::new(FieldPath::root(), "oops"));

    assert!(!errors.is_empty());
    assert_eq!(errors.len(), 1);
    assert!(FieldErrors::try_from_vec(Vec::new()).is_none());
}

#[test]
fn test_errors_combine_via_semigroup() {
    let name = FieldErrors::single(FieldError::new(FieldPath::field("name"), "Required"));
    let email = FieldErrors::single(FieldError::new(FieldPath::field("email"), "Invalid email"));
    let consent = FieldErrors::single(FieldError::new(
        FieldPath::field("consent"),
        "Consent must be granted",
    ));

    let combined = name.combine(email).combine(consent);

    let fields: Vec<String> = combined.iter().map(|e| e.path.to_string()).collect();
    assert_eq!(fields, vec!["name", "email", "consent"]);
}

#[test]
fn test_validation_and_accumulates_errors() {
    let phone: ValidationResult<String> = Validation::Failure(FieldErrors::single(
        FieldError::new(FieldPath::field("phone"), "bad phone"),
    ));
    let skills: ValidationResult<String> = Validation::Failure(FieldErrors::single(
        FieldError::new(FieldPath::field("skills"), "no skills"),
    ));

    match phone.and(skills) {
        Validation::Failure(errors) => {
            assert_eq!(errors.len(), 2);
            assert_eq!(errors.for_field("skills").len(), 1);
        }
        Validation::Success(_) => panic!("Expected failure"),
    }
}

#[test]
fn test_validation_and_then_short_circuits() {
    let first: ValidationResult<i32> = Validation::Failure(FieldErrors::single(
        FieldError::new(FieldPath::field("first"), "first error"),
    ));

    let result = first.and_then(|_| -> ValidationResult<i32> {
        Validation::Failure(FieldErrors::single(FieldError::new(
            FieldPath::field("second"),
            "second error",
        )))
    });

    let errors = result.into_result().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.first().path, FieldPath::field("first"));
}

#[test]
fn test_query_errors_by_path_and_code() {
    let errors = FieldErrors::from_vec(vec![
        FieldError::new(FieldPath::field("file"), "wrong type").with_code("mime_type"),
        FieldError::new(FieldPath::field("file"), "too big").with_code("max_size"),
        FieldError::new(FieldPath::field("name"), "Required").with_code("required"),
        FieldError::new(FieldPath::root(), "mismatch").with_code("custom"),
    ]);

    assert_eq!(errors.at_path(&FieldPath::field("file")).len(), 2);
    assert_eq!(errors.at_path(&FieldPath::root()).len(), 1);
    assert_eq!(errors.with_code("required").len(), 1);
    assert!(errors.with_code("nonexistent").is_empty());
}

#[test]
fn test_display_lists_every_error() {
    let errors = FieldErrors::from_vec(vec![
        FieldError::new(FieldPath::field("name"), "Required"),
        FieldError::new(FieldPath::field("email"), "Invalid email"),
    ]);

    let display = errors.to_string();
    assert!(display.contains("2 form error(s)"));
    assert!(display.contains("1. name: Required"));
    assert!(display.contains("2. email: Invalid email"));
}

#[test]
fn test_report_keeps_first_message_per_field() {
    let errors = FieldErrors::from_vec(vec![
        FieldError::new(FieldPath::field("file"), "wrong type"),
        FieldError::new(FieldPath::field("file"), "too big"),
        FieldError::new(FieldPath::root(), "form level"),
    ]);

    let report = ValidationReport::from_errors(&errors);
    assert_eq!(report.get("file"), Some("wrong type"));
    assert_eq!(report.root(), Some("form level"));
    assert_eq!(report.len(), 2);
}

#[test]
fn test_report_serializes_for_display() {
    let mut report = ValidationReport::new();
    report.insert_first(&FieldPath::field("name"), "Required");

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["fields"]["name"], "Required");
    assert!(json["root"].is_null());
}
