use std::env;
use std::time::Duration;

use crate::transport::RetryConfig;
use crate::validation::ValidationMode;

/// Default base URL of the remote agent resource.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Directory configuration, loadable from environment variables
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Base URL; `/agents/` is appended
    pub base_url: String,
    /// Upper bound on every call to the remote resource
    pub timeout: Duration,
    /// Retry behavior for idempotent requests
    pub retry: RetryConfig,
    /// Whether failed validation blocks submission
    pub validation_mode: ValidationMode,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
            validation_mode: ValidationMode::default(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables
    ///
    /// * `AGENT_DIRECTORY_BASE_URL` (default `http://localhost:8000/api`)
    /// * `AGENT_DIRECTORY_TIMEOUT_SECS` (default 30)
    /// * `AGENT_DIRECTORY_MAX_RETRIES` (default 2)
    /// * `AGENT_DIRECTORY_VALIDATION`: `advisory` (default) or `enforce`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup("AGENT_DIRECTORY_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_url);

        let timeout_secs: u64 = lookup("AGENT_DIRECTORY_TIMEOUT_SECS")
            .unwrap_or_else(|| DEFAULT_TIMEOUT_SECS.to_string())
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue("AGENT_DIRECTORY_TIMEOUT_SECS"))?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue("AGENT_DIRECTORY_TIMEOUT_SECS"));
        }

        let max_retries = match lookup("AGENT_DIRECTORY_MAX_RETRIES") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AGENT_DIRECTORY_MAX_RETRIES"))?,
            None => defaults.retry.max_retries,
        };

        let validation_mode = match lookup("AGENT_DIRECTORY_VALIDATION") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("AGENT_DIRECTORY_VALIDATION"))?,
            None => defaults.validation_mode,
        };

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            retry: RetryConfig {
                max_retries,
                ..defaults.retry
            },
            validation_mode,
        })
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DirectoryConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.validation_mode, ValidationMode::Advisory);
    }

    #[test]
    fn test_values_from_lookup() {
        let config = DirectoryConfig::from_lookup(lookup(&[
            ("AGENT_DIRECTORY_BASE_URL", "https://agents.example.com/api"),
            ("AGENT_DIRECTORY_TIMEOUT_SECS", "5"),
            ("AGENT_DIRECTORY_MAX_RETRIES", "0"),
            ("AGENT_DIRECTORY_VALIDATION", "enforce"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "https://agents.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.validation_mode, ValidationMode::Enforce);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_timeout =
            DirectoryConfig::from_lookup(lookup(&[("AGENT_DIRECTORY_TIMEOUT_SECS", "soon")]));
        assert!(matches!(
            bad_timeout,
            Err(ConfigError::InvalidValue("AGENT_DIRECTORY_TIMEOUT_SECS"))
        ));

        let zero_timeout =
            DirectoryConfig::from_lookup(lookup(&[("AGENT_DIRECTORY_TIMEOUT_SECS", "0")]));
        assert!(zero_timeout.is_err());

        let bad_mode =
            DirectoryConfig::from_lookup(lookup(&[("AGENT_DIRECTORY_VALIDATION", "strict")]));
        assert!(matches!(
            bad_mode,
            Err(ConfigError::InvalidValue("AGENT_DIRECTORY_VALIDATION"))
        ));
    }

    #[test]
    fn test_builders() {
        let config = DirectoryConfig::default()
            .with_base_url("http://127.0.0.1:9000")
            .with_timeout(Duration::from_millis(250))
            .with_retry(RetryConfig::disabled())
            .with_validation_mode(ValidationMode::Enforce);

        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.retry.max_retries, 0);
        assert_eq!(config.validation_mode, ValidationMode::Enforce);
    }
}
