//! Client configuration parsed from environment variables.

use std::path::PathBuf;

use crate::error::ApiError;
use crate::util::i18n::Locale;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_QUERY_CACHE_MAX_ENTRIES: u64 = 1000;
/// Entries expire after five minutes unless refreshed.
pub const DEFAULT_QUERY_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for ClientTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Bounds for the query cache. `ttl_secs: None` keeps entries until evicted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCacheLimits {
    pub max_entries: u64,
    pub ttl_secs: Option<u64>,
}

impl Default for QueryCacheLimits {
    fn default() -> Self {
        Self { max_entries: DEFAULT_QUERY_CACHE_MAX_ENTRIES, ttl_secs: Some(DEFAULT_QUERY_CACHE_TTL_SECS) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeouts: ClientTimeouts,
    pub query_cache: QueryCacheLimits,
    pub storage_dir: Option<PathBuf>,
    pub locale: Locale,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeouts: ClientTimeouts::default(),
            query_cache: QueryCacheLimits::default(),
            storage_dir: None,
            locale: Locale::default(),
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `MARKETPLACE_API_URL`: default `http://localhost:8080`
    /// - `MARKETPLACE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `MARKETPLACE_CONNECT_TIMEOUT_SECS`: default 10
    /// - `MARKETPLACE_QUERY_CACHE_MAX_ENTRIES`: default 1000
    /// - `MARKETPLACE_QUERY_CACHE_TTL_SECS`: default 300, `0` disables expiry
    /// - `MARKETPLACE_STORAGE_DIR`: in-memory storage when absent
    /// - `LANG`: UI locale, `en` when unsupported
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] if the base URL is not an absolute
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`ClientConfig::from_env`].
    pub fn from_vars<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("MARKETPLACE_API_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = normalize_base_url(&raw_url)?;

        let timeouts = ClientTimeouts {
            request_secs: parse_or(lookup("MARKETPLACE_REQUEST_TIMEOUT_SECS"), DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_or(lookup("MARKETPLACE_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let ttl_secs = parse_or(lookup("MARKETPLACE_QUERY_CACHE_TTL_SECS"), DEFAULT_QUERY_CACHE_TTL_SECS);
        let query_cache = QueryCacheLimits {
            max_entries: parse_or(lookup("MARKETPLACE_QUERY_CACHE_MAX_ENTRIES"), DEFAULT_QUERY_CACHE_MAX_ENTRIES),
            ttl_secs: (ttl_secs > 0).then_some(ttl_secs),
        };

        let storage_dir = lookup("MARKETPLACE_STORAGE_DIR")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let locale = Locale::detect(lookup("LANG").as_deref());

        Ok(Self { api_base_url, timeouts, query_cache, storage_dir, locale })
    }

    /// Replace the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] for non-http(s) or relative URLs.
    pub fn with_api_base_url(mut self, url: &str) -> Result<Self, ApiError> {
        self.api_base_url = normalize_base_url(url)?;
        Ok(self)
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}

pub(crate) fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = reqwest::Url::parse(trimmed).map_err(|e| ApiError::ConfigParse(format!("invalid API base URL '{raw}': {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ApiError::ConfigParse(format!("unsupported API base URL scheme: {}", parsed.scheme())));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
