//! Persistence API configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for StoreTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// API root without a trailing slash, e.g. `https://host/api`.
    pub base_url: String,
    /// Bearer token used by headless tools when no login session exists.
    pub api_token: Option<String>,
    pub timeouts: StoreTimeouts,
}

impl StoreConfig {
    /// Config for `base_url` with default timeouts and no token.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_owned(), api_token: None, timeouts: StoreTimeouts::default() }
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `INVITELY_API_URL`: default `http://127.0.0.1:8080/api`
    /// - `INVITELY_API_TOKEN`: bearer token for headless use
    /// - `INVITELY_REQUEST_TIMEOUT_SECS`: default 30
    /// - `INVITELY_CONNECT_TIMEOUT_SECS`: default 10
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("INVITELY_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_token = lookup("INVITELY_API_TOKEN")
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty());
        let timeouts = StoreTimeouts {
            request_secs: parse_u64(lookup("INVITELY_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(lookup("INVITELY_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Self { api_token, timeouts, ..Self::new(base_url.trim()) }
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
