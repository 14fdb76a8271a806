use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Configuration for a [`Session`](crate::Session).
///
/// Build it fluently or deserialize it; durations are given in milliseconds:
///
/// ```json
/// { "dialect": "postgres", "interpolate": false, "query_timeout_ms": 5000,
///   "slow_query_threshold_ms": 200, "log_args": true }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Dialect registry name (`mysql`, `postgres`, `sqlite3`, `mssql`).
    #[serde(default = "default_dialect")]
    pub dialect: String,
    /// Inline values as literals instead of binding them. Bytes always stay bound.
    #[serde(default)]
    pub interpolate: bool,
    /// Per-run timeout. `None` means no timeout (default).
    #[serde(default, rename = "query_timeout_ms", deserialize_with = "millis")]
    pub query_timeout: Option<Duration>,
    /// Runs slower than this emit a slow query event.
    #[serde(default, rename = "slow_query_threshold_ms", deserialize_with = "millis")]
    pub slow_query_threshold: Option<Duration>,
    /// Attach the bound values (as JSON) to event fields.
    #[serde(default)]
    pub log_args: bool,
}

fn default_dialect() -> String {
    "postgres".to_string()
}

fn millis<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Duration>, D::Error> {
    Ok(Option::<u64>::deserialize(de)?.map(Duration::from_millis))
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            interpolate: false,
            query_timeout: None,
            slow_query_threshold: None,
            log_args: false,
        }
    }
}

impl SessionConfig {
    /// Create a new configuration with defaults (postgres, binding, no timeout).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect by registry name.
    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.dialect = name.into();
        self
    }

    /// Inline values as literals.
    pub fn interpolate(mut self, on: bool) -> Self {
        self.interpolate = on;
        self
    }

    /// Set the query timeout.
    ///
    /// Runs exceeding this duration are cancelled and return a timeout error.
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Attach bound values to event fields.
    pub fn log_args(mut self, on: bool) -> Self {
        self.log_args = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SessionConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dialect, "postgres");
        assert!(!config.interpolate);
        assert!(config.query_timeout.is_none());
    }

    #[test]
    fn test_deserialize_millis() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"dialect":"mysql","query_timeout_ms":1500,"slow_query_threshold_ms":null,"log_args":true}"#,
        )
        .unwrap();
        assert_eq!(config.dialect, "mysql");
        assert_eq!(config.query_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.slow_query_threshold, None);
        assert!(config.log_args);
    }

    #[test]
    fn test_builder() {
        let config = SessionConfig::new()
            .dialect("sqlite3")
            .interpolate(true)
            .with_query_timeout(Duration::from_secs(1));
        assert_eq!(config.dialect, "sqlite3");
        assert!(config.interpolate);
        assert_eq!(config.query_timeout, Some(Duration::from_secs(1)));
    }
}
