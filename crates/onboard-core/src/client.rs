//! HTTP client tuning.
//!
//! Every dashboard call is attempted exactly once. Requests carry no timeout
//! unless one is configured, leaving the transport default in place.

use std::time::Duration;

/// Default dashboard API base URL (shard-independent entry point).
pub const DASHBOARD_DEFAULT_BASE_URL: &str = "https://dashboard.meraki.com/api/v0/";

/// Default connect timeout in seconds
pub const DASHBOARD_CONNECT_TIMEOUT: u64 = 10;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Request timeout; `None` keeps the transport default
    pub timeout: Option<Duration>,

    /// Connect timeout
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Configuration with no request timeout.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(DASHBOARD_CONNECT_TIMEOUT),
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
