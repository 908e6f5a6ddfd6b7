//! Runtime settings of a form.
//!
//! [`FormConfig`] has sensible defaults and can be loaded from JSON; any
//! missing key keeps its default.
//!
//! ```rust
//! use std::time::Duration;
//! use inquest::FormConfig;
//!
//! let config = FormConfig::from_json_str(r#"{ "submit_timeout_ms": 5000 }"#).unwrap();
//! assert_eq!(config.submit_timeout(), Some(Duration::from_secs(5)));
//! assert_eq!(config.stay_open_window(), Duration::from_millis(200));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Root error shown when a submission fails.
pub const DEFAULT_ROOT_ERROR: &str = "Unexpected error, please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// How long a pressed select option keeps the dropdown open, in milliseconds.
    pub stay_open_ms: u64,
    /// Upper bound on a submit handler call, in milliseconds. `None` waits forever.
    pub submit_timeout_ms: Option<u64>,
    /// Message recorded as the root error when a submission fails.
    pub root_error_message: String,
    /// Re-check an edited field once the form has been submitted at least once.
    pub revalidate_on_change: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            stay_open_ms: 200,
            submit_timeout_ms: Some(30_000),
            root_error_message: DEFAULT_ROOT_ERROR.to_string(),
            revalidate_on_change: true,
        }
    }
}

impl FormConfig {
    /// Parses a JSON document and checks the resulting settings.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FormConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Returns self if every setting is usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.root_error_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "root_error_message must not be blank".to_string(),
            ));
        }
        if self.submit_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "submit_timeout_ms must be positive; use null to disable the timeout".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn stay_open_window(&self) -> Duration {
        Duration::from_millis(self.stay_open_ms)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_stay_open_window(mut self, window: Duration) -> Self {
        self.stay_open_ms = duration_to_millis(window);
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.submit_timeout_ms = timeout.map(duration_to_millis);
        self
    }

    pub fn with_root_error_message(mut self, message: impl Into<String>) -> Self {
        self.root_error_message = message.into();
        self
    }

    pub fn with_revalidate_on_change(mut self, enabled: bool) -> Self {
        self.revalidate_on_change = enabled;
        self
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert_eq!(config.stay_open_window(), Duration::from_millis(200));
        assert_eq!(config.submit_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.root_error_message, DEFAULT_ROOT_ERROR);
        assert!(config.revalidate_on_change);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        assert_eq!(FormConfig::from_json_str("{}").unwrap(), FormConfig::default());
    }

    #[test]
    fn test_null_timeout_disables_it() {
        let config = FormConfig::from_json_str(r#"{ "submit_timeout_ms": null }"#).unwrap();
        assert_eq!(config.submit_timeout(), None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = FormConfig::from_json_str(r#"{ "submit_timeout_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_blank_root_message_rejected() {
        let err = FormConfig::default()
            .with_root_error_message("  ")
            .validated()
            .unwrap_err();
        assert!(err.to_string().contains("root_error_message"));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = FormConfig::from_json_str(r#"{ "stay_open": 10 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_builders() {
        let config = FormConfig::default()
            .with_stay_open_window(Duration::from_millis(50))
            .with_submit_timeout(None)
            .with_revalidate_on_change(false);
        assert_eq!(config.stay_open_ms, 50);
        assert_eq!(config.submit_timeout(), None);
        assert!(!config.revalidate_on_change);
    }
}
