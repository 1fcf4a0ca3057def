//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::webhook::RetryPolicy;

use super::cli::Cli;
use super::defaults;
use super::error::ConfigError;
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// Webhook URL. Empty when delivery is disabled; otherwise a valid absolute URL.
    pub url: String,

    /// Per-attempt request timeout
    pub timeout: Duration,

    /// Retry policy for failed deliveries
    pub retry_policy: RetryPolicy,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = if self.url.is_empty() {
            "disabled"
        } else {
            self.url.as_str()
        };

        write!(
            f,
            "Config {{ url: {url}, timeout: {}s, retry: {}x/{}s }}",
            self.timeout.as_secs(),
            self.retry_policy.max_attempts,
            self.retry_policy.base_delay.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A non-empty URL is invalid
    /// - The timeout is zero
    /// - The retry attempt count or base delay is zero
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let timeout = Self::resolve_timeout(cli, toml)?;
        let retry_policy = Self::build_retry_policy(cli, toml)?;

        Ok(Self {
            url,
            timeout,
            retry_policy,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns true if a destination is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.url.is_empty()
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        // An explicit empty CLI value still wins, so `--url ""` disables a TOML url.
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.url.as_deref()))
            .unwrap_or_default()
            .trim();

        if url_str.is_empty() {
            return Ok(String::new());
        }

        Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        Ok(url_str.to_string())
    }

    fn resolve_timeout(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.webhook.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn build_retry_policy(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryPolicy, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        let max_attempts = cli
            .retry_max
            .or_else(|| retry.and_then(|r| r.max_attempts))
            .unwrap_or(defaults::RETRY_MAX_ATTEMPTS);

        let base_delay_secs = cli
            .retry_delay
            .or_else(|| retry.and_then(|r| r.base_delay))
            .unwrap_or(defaults::RETRY_BASE_DELAY_SECS);

        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetry(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if base_delay_secs == 0 {
            return Err(ConfigError::InvalidRetry(
                "base_delay must be greater than 0".to_string(),
            ));
        }

        Ok(RetryPolicy::new()
            .with_max_attempts(max_attempts)
            .with_base_delay(Duration::from_secs(base_delay_secs)))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
