//! Client configuration

use std::env;
use std::time::Duration;

use tr064_discovery::DEFAULT_SEARCH_TARGET;

use crate::error::{ApiError, Result};

/// Overrides the SSDP receive window, in milliseconds
pub const ENV_DISCOVERY_TIMEOUT: &str = "TR064_DISCOVERY_TIMEOUT_MS";
/// Overrides the SSDP search target
pub const ENV_SEARCH_TARGET: &str = "TR064_SEARCH_TARGET";
/// Overrides the HTTP read and description fetch timeouts, in milliseconds
pub const ENV_HTTP_TIMEOUT: &str = "TR064_HTTP_TIMEOUT_MS";

/// Configuration for a [`Gateway`](crate::Gateway)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// How long to wait for the single SSDP reply
    pub discovery_timeout: Duration,

    /// `ST` header of the discovery probe
    pub search_target: String,

    /// TCP connect timeout for action calls
    pub connect_timeout: Duration,

    /// Read timeout for action calls
    pub read_timeout: Duration,

    /// Overall timeout for fetching the description document
    pub description_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            discovery_timeout: Duration::from_secs(1),
            search_target: DEFAULT_SEARCH_TARGET.to_string(),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(10),
            description_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with any `TR064_*` environment variables that are set
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DISCOVERY_TIMEOUT) {
            self.discovery_timeout = parse_millis(ENV_DISCOVERY_TIMEOUT, &raw)?;
        }
        if let Some(target) = lookup(ENV_SEARCH_TARGET) {
            let target = target.trim();
            if target.is_empty() {
                return Err(ApiError::Config(format!("{} is empty", ENV_SEARCH_TARGET)));
            }
            self.search_target = target.to_string();
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT) {
            let timeout = parse_millis(ENV_HTTP_TIMEOUT, &raw)?;
            self.read_timeout = timeout;
            self.description_timeout = timeout;
        }
        Ok(self)
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    pub fn with_search_target(mut self, search_target: impl Into<String>) -> Self {
        self.search_target = search_target.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_description_timeout(mut self, timeout: Duration) -> Self {
        self.description_timeout = timeout;
        self
    }
}

/// Timeouts must be positive; a zero socket timeout is rejected by the OS
fn parse_millis(name: &str, raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ApiError::Config(format!("{} must be greater than zero", name))),
        Ok(millis) => Ok(Duration::from_millis(millis)),
        Err(_) => Err(ApiError::Config(format!(
            "{} must be a number of milliseconds, got {:?}",
            name, raw
        ))),
    }
}
