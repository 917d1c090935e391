/*
 * Responsibility
 * - harness settings from the environment (.env is honoured via dotenvy)
 *   - HARNESS_BASE_URL: base that relative request URIs are resolved against
 *   - HARNESS_DISPATCH_TIMEOUT_MS: upper bound for one dispatch (0 / unset = none)
 *   - HARNESS_LOG: default tracing filter when RUST_LOG is not set
 * - validation (bad values fail instead of silently defaulting)
 */
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost/";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub base_url: Url,
    pub dispatch_timeout: Option<Duration>,
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid url"),
            dispatch_timeout: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`HarnessConfig::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("HARNESS_BASE_URL") {
            config.base_url = parse_base_url(&raw)?;
        }

        if let Some(raw) = lookup("HARNESS_DISPATCH_TIMEOUT_MS") {
            let millis = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "HARNESS_DISPATCH_TIMEOUT_MS",
                reason: e.to_string(),
            })?;
            config.dispatch_timeout = (millis > 0).then(|| Duration::from_millis(millis));
        }

        if let Some(filter) = lookup("HARNESS_LOG")
            && !filter.trim().is_empty()
        {
            config.log_filter = filter.trim().to_string();
        }

        Ok(config)
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = Some(timeout);
        self
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "HARNESS_BASE_URL",
        reason,
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".into()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = HarnessConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(DEFAULT_BASE_URL, config.base_url.as_str());
        assert_eq!(None, config.dispatch_timeout);
        assert_eq!(DEFAULT_LOG_FILTER, config.log_filter);
    }

    #[test]
    fn reads_all_keys() {
        let config = HarnessConfig::from_lookup(lookup(&[
            ("HARNESS_BASE_URL", "https://api.test/v2/"),
            ("HARNESS_DISPATCH_TIMEOUT_MS", "250"),
            ("HARNESS_LOG", "debug,handler_test_driver=trace"),
        ]))
        .unwrap();

        assert_eq!("https://api.test/v2/", config.base_url.as_str());
        assert_eq!(Some(Duration::from_millis(250)), config.dispatch_timeout);
        assert_eq!("debug,handler_test_driver=trace", config.log_filter);
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config =
            HarnessConfig::from_lookup(lookup(&[("HARNESS_DISPATCH_TIMEOUT_MS", "0")])).unwrap();
        assert_eq!(None, config.dispatch_timeout);
    }

    #[rstest]
    #[case("HARNESS_DISPATCH_TIMEOUT_MS", "soon")]
    #[case("HARNESS_BASE_URL", "not a url")]
    #[case("HARNESS_BASE_URL", "ftp://files.test/")]
    #[case("HARNESS_BASE_URL", "mailto:someone@example.com")]
    fn rejects_invalid_values(#[case] key: &str, #[case] value: &str) {
        let err = HarnessConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
        let ConfigError::Invalid { key: reported, .. } = err;
        assert_eq!(key, reported);
    }
}
