//! Render configuration.

use std::time::Duration;

use reel_timeline::DEFAULT_FPS;

use crate::error::{WorkerError, WorkerResult};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Base URL of the render backend. `None` disables rendering entirely and
    /// the pipeline returns partial results.
    pub backend_url: Option<String>,
    /// Bearer token for the render backend
    pub api_key: Option<String>,
    /// Fixed wait between poll attempts
    pub poll_interval: Duration,
    /// Maximum number of poll attempts before the job times out
    pub max_poll_attempts: u32,
    /// Outer request budget the whole poll loop must fit in
    pub request_budget: Duration,
    /// Frame rate compositions are rendered at
    pub fps: u32,
    /// Codec requested from the backend
    pub codec: String,
    /// Retries the backend may spend internally on a single render
    pub backend_max_retries: u32,
    /// Timeout for individual HTTP calls to the backend
    pub http_timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            api_key: None,
            poll_interval: Duration::from_secs(2),
            max_poll_attempts: 120,
            request_budget: Duration::from_secs(300),
            fps: DEFAULT_FPS,
            codec: "h264".to_string(),
            backend_max_retries: 1,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl RenderConfig {
    /// Create config from environment variables.
    pub fn from_env() -> WorkerResult<Self> {
        let defaults = Self::default();
        let config = Self {
            backend_url: non_empty_var("RENDER_BACKEND_URL"),
            api_key: non_empty_var("RENDER_API_KEY"),
            poll_interval: Duration::from_secs(
                std::env::var("RENDER_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.poll_interval.as_secs()),
            ),
            max_poll_attempts: std::env::var("RENDER_MAX_POLL_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_poll_attempts),
            request_budget: Duration::from_secs(
                std::env::var("RENDER_REQUEST_BUDGET_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.request_budget.as_secs()),
            ),
            fps: std::env::var("RENDER_FPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.fps),
            http_timeout: Duration::from_secs(
                std::env::var("RENDER_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.http_timeout.as_secs()),
            ),
            ..defaults
        };
        config.validate()?;
        Ok(config)
    }

    /// Whether a render backend is configured.
    pub fn has_backend(&self) -> bool {
        self.backend_url.is_some()
    }

    /// Longest time the poll loop can spend sleeping.
    pub fn max_poll_wait(&self) -> Duration {
        self.poll_interval.saturating_mul(self.max_poll_attempts)
    }

    /// Reject settings the poll loop cannot honor.
    pub fn validate(&self) -> WorkerResult<()> {
        if self.max_poll_attempts == 0 {
            return Err(WorkerError::config_error("max poll attempts must be at least 1"));
        }
        if self.fps == 0 {
            return Err(WorkerError::config_error("fps must be positive"));
        }
        // The last poll may take a full HTTP timeout after the final sleep.
        if self.max_poll_wait() + self.http_timeout > self.request_budget {
            return Err(WorkerError::config_error(format!(
                "{} poll attempts every {:?} plus a {:?} poll timeout \
                 exceed the request budget of {:?}",
                self.max_poll_attempts,
                self.poll_interval,
                self.http_timeout,
                self.request_budget
            )));
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fit_budget() {
        let config = RenderConfig::default();
        assert_eq!(config.max_poll_wait(), Duration::from_secs(240));
        assert!(config.validate().is_ok());
        assert!(!config.has_backend());
        assert_eq!(config.codec, "h264");
        assert_eq!(config.backend_max_retries, 1);
    }

    #[test]
    fn test_rejects_poll_wait_over_budget() {
        let config = RenderConfig {
            poll_interval: Duration::from_secs(3),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(WorkerError::ConfigError(_))));
    }

    #[test]
    fn test_rejects_poll_timeout_that_overruns_budget() {
        // 240s of sleeps fits on its own, but not with a 61s poll on top.
        let config = RenderConfig {
            http_timeout: Duration::from_secs(61),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(WorkerError::ConfigError(_))));

        let config = RenderConfig {
            http_timeout: Duration::from_secs(60),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_attempts_and_fps() {
        let config = RenderConfig {
            max_poll_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RenderConfig {
            fps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
