//! Submission backends.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::schema::ValidatedForm;

/// Receives validated forms.
///
/// Errors are logged and turned into the form's generic root error; their
/// text is never shown to the user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    /// Delivers a validated form.
    async fn submit(&self, form: &ValidatedForm) -> Result<()>;
}

/// Handler that waits, logs the submitted values as JSON and succeeds.
///
/// Stands in for a real backend during development and in demos.
#[derive(Debug, Clone)]
pub struct SimulatedSubmitHandler {
    delay: Duration,
    fail_with: Option<String>,
}

impl SimulatedSubmitHandler {
    /// Default delay before a simulated submission completes.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    pub fn new() -> Self {
        Self {
            delay: Self::DEFAULT_DELAY,
            fail_with: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Makes every submission fail with `reason` after the delay.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fail_with = Some(reason.into());
        self
    }
}

impl Default for SimulatedSubmitHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmitHandler for SimulatedSubmitHandler {
    async fn submit(&self, form: &ValidatedForm) -> Result<()> {
        tokio::time::sleep(self.delay).await;

        if let Some(reason) = &self.fail_with {
            anyhow::bail!("simulated submission failure: {}", reason);
        }

        let payload = serde_json::to_string(form)?;
        tracing::info!(%payload, "form submitted");
        Ok(())
    }
}
