//! Run configuration.
//!
//! [`OnboardConfig`] gathers everything a run needs besides its inputs: which
//! dashboard host to start from, the time zone given to new networks, request
//! tuning, and the tolerance policy for pre-existing networks and bind failures.

use crate::client::{ClientConfig, DASHBOARD_DEFAULT_BASE_URL};
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Time zone assigned to every network created by a run.
pub const DEFAULT_TIME_ZONE: &str = "Europe/Helsinki";

/// Configuration for an onboarding run.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OnboardConfig {
    /// Dashboard API base URL used before the organization shard is known
    #[validate(url)]
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Time zone for created networks
    #[validate(length(min = 1))]
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    /// Request timeout in seconds; transport default when absent
    #[validate(range(min = 1, max = 300))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Tolerance policy
    #[serde(default)]
    pub policy: OnboardPolicy,
}

fn default_api_base_url() -> String {
    DASHBOARD_DEFAULT_BASE_URL.to_string()
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

impl OnboardConfig {
    /// Create a configuration for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(api_base_url: impl Into<String>) -> Result<Self, Error> {
        let config = Self {
            api_base_url: api_base_url.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = Some(seconds);
        self
    }

    /// Set the tolerance policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: OnboardPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Request timeout, if one is configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        match self.timeout() {
            Some(timeout) => ClientConfig::new().with_timeout(timeout),
            None => ClientConfig::new(),
        }
    }
}

impl Default for OnboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            time_zone: default_time_zone(),
            request_timeout_secs: None,
            policy: OnboardPolicy::default(),
        }
    }
}

/// What a run tolerates instead of stopping.
///
/// The two switches are independent; the legacy `ignore_error` mode sets both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardPolicy {
    /// Reuse a network that already exists under the requested name
    #[serde(default)]
    pub ignore_existing_network: bool,

    /// Finish the run even if binding the network to its template fails
    #[serde(default)]
    pub tolerate_bind_failure: bool,
}

impl OnboardPolicy {
    /// Stop on an existing network and on bind failure.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            ignore_existing_network: false,
            tolerate_bind_failure: false,
        }
    }

    /// Legacy `ignore_error` mode: tolerate both conditions.
    #[must_use]
    pub const fn ignore_error() -> Self {
        Self {
            ignore_existing_network: true,
            tolerate_bind_failure: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboard_config_new() {
        let config = OnboardConfig::new("https://dashboard.example.com/api/v0/").unwrap();
        assert_eq!(config.api_base_url, "https://dashboard.example.com/api/v0/");
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert!(config.timeout().is_none());
        assert_eq!(config.policy, OnboardPolicy::strict());
    }

    #[test]
    fn test_onboard_config_invalid_url() {
        let result = OnboardConfig::new("not-a-url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_onboard_config_default() {
        let config = OnboardConfig::default();
        assert_eq!(config.api_base_url, DASHBOARD_DEFAULT_BASE_URL);
        assert_eq!(config.time_zone, "Europe/Helsinki");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_onboard_config_builder() {
        let config = OnboardConfig::default()
            .with_timeout(45)
            .with_policy(OnboardPolicy::ignore_error());

        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.client_config().timeout, Some(Duration::from_secs(45)));
        assert!(config.policy.ignore_existing_network);
        assert!(config.policy.tolerate_bind_failure);
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = OnboardConfig::default();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(301);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_time_zone() {
        let mut config = OnboardConfig::default();
        config.time_zone = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policies_are_independent() {
        let policy: OnboardPolicy =
            serde_json::from_str(r#"{"tolerate_bind_failure": true}"#).unwrap();
        assert!(!policy.ignore_existing_network);
        assert!(policy.tolerate_bind_failure);
        assert_ne!(policy, OnboardPolicy::ignore_error());
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: OnboardConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.time_zone, DEFAULT_TIME_ZONE);
        assert_eq!(config.api_base_url, DASHBOARD_DEFAULT_BASE_URL);
        assert_eq!(config.policy, OnboardPolicy::default());
    }
}
