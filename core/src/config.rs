//! Client configuration resolved from the environment.
//!
//! Recognized keys, all optional:
//! - `API_BASE_URL`: prefix for every endpoint (default `http://localhost:3000/api`)
//! - `API_TIMEOUT`: per-request deadline in milliseconds (default `10000`)
//! - `ENABLE_LOGGING`: request/response logging, on only for the exact value `true`

use std::time::Duration;

pub const BASE_URL_VAR: &str = "API_BASE_URL";
pub const TIMEOUT_VAR: &str = "API_TIMEOUT";
pub const LOGGING_VAR: &str = "ENABLE_LOGGING";

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub enable_logging: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            enable_logging: false,
        }
    }
}

impl ClientConfig {
    /// Defaults with a different base URL. The URL is used verbatim.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset. A timeout that does not start with a
    /// positive integer falls back to the default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = lookup(TIMEOUT_VAR)
            .as_deref()
            .and_then(parse_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        let enable_logging = lookup(LOGGING_VAR).as_deref() == Some("true");

        Self {
            base_url,
            timeout,
            enable_logging,
        }
    }
}

/// Parse the leading decimal digits of `raw`, ignoring leading whitespace
/// and anything after the digits. Zero is rejected.
fn parse_timeout_ms(raw: &str) -> Option<u64> {
    let trimmed = raw.trim_start();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse::<u64>().ok().filter(|ms| *ms > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn resolve(pairs: &[(&str, &str)]) -> ClientConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClientConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = resolve(&[]);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.timeout, Duration::from_millis(10_000));
        assert!(!config.enable_logging);
    }

    #[test]
    fn overrides_are_applied() {
        let config = resolve(&[
            ("API_BASE_URL", "https://crm.example.org/api"),
            ("API_TIMEOUT", "2500"),
            ("ENABLE_LOGGING", "true"),
        ]);
        assert_eq!(config.base_url, "https://crm.example.org/api");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.enable_logging);
    }

    #[test]
    fn empty_base_url_counts_as_unset() {
        let config = resolve(&[("API_BASE_URL", "")]);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn timeout_uses_leading_digits() {
        assert_eq!(parse_timeout_ms("750ms"), Some(750));
        assert_eq!(parse_timeout_ms("  42"), Some(42));
        assert_eq!(parse_timeout_ms("+15"), Some(15));
        assert_eq!(parse_timeout_ms("abc"), None);
        assert_eq!(parse_timeout_ms("0"), None);
        assert_eq!(parse_timeout_ms("-5"), None);
        assert_eq!(parse_timeout_ms(""), None);
    }

    #[test]
    fn unusable_timeout_falls_back_to_default() {
        let config = resolve(&[("API_TIMEOUT", "soon")]);
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
    }

    #[test]
    fn logging_requires_exact_true() {
        assert!(!resolve(&[("ENABLE_LOGGING", "TRUE")]).enable_logging);
        assert!(!resolve(&[("ENABLE_LOGGING", "1")]).enable_logging);
        assert!(resolve(&[("ENABLE_LOGGING", "true")]).enable_logging);
    }
}
