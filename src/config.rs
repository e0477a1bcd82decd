use crate::error::{Result, SearchError};
use std::time::Duration;

/// Settings used to assemble a [`Connection`](crate::connection::Connection).
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub default_index: Option<String>,
    pub report_queries: bool,
    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub cache_max_capacity: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_index: None,
            report_queries: false,
            cache_enabled: false,
            cache_ttl_seconds: 300,
            cache_max_capacity: 10_000,
        }
    }
}

impl ConnectionConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(index) = std::env::var("SEARCH_DEFAULT_INDEX") {
            config.default_index = Some(index);
        }

        if let Ok(report) = std::env::var("SEARCH_REPORT_QUERIES") {
            config.report_queries = parse_flag("SEARCH_REPORT_QUERIES", &report)?;
        }

        if let Ok(enabled) = std::env::var("SEARCH_CACHE_ENABLED") {
            config.cache_enabled = parse_flag("SEARCH_CACHE_ENABLED", &enabled)?;
        }

        if let Ok(ttl) = std::env::var("SEARCH_CACHE_TTL_SECONDS") {
            config.cache_ttl_seconds = ttl.parse().map_err(|e| {
                SearchError::ConfigurationError(format!("Invalid cache_ttl_seconds: {e}"))
            })?;
        }

        if let Ok(capacity) = std::env::var("SEARCH_CACHE_MAX_CAPACITY") {
            config.cache_max_capacity = capacity.parse().map_err(|e| {
                SearchError::ConfigurationError(format!("Invalid cache_max_capacity: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(self.default_index.as_deref(), Some(index) if index.trim().is_empty()) {
            return Err(SearchError::ConfigurationError(
                "default_index must not be blank".to_string(),
            ));
        }

        if self.cache_enabled && self.cache_ttl_seconds == 0 {
            return Err(SearchError::ConfigurationError(
                "cache_ttl_seconds must be positive when caching is enabled".to_string(),
            ));
        }

        if self.cache_enabled && self.cache_max_capacity == 0 {
            return Err(SearchError::ConfigurationError(
                "cache_max_capacity must be positive when caching is enabled".to_string(),
            ));
        }

        Ok(())
    }

    /// TTL applied to every query when caching is enabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_enabled
            .then(|| Duration::from_secs(self.cache_ttl_seconds))
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SearchError::ConfigurationError(format!(
            "Invalid boolean for {name}: {other}"
        ))),
    }
}
