// src/config.rs
use std::time::Duration;

use reqwest::Url;

use crate::error::HubError;
use crate::feed::FeedCfg;

pub const ENV_API_URL: &str = "NEWS_API_URL";
pub const ENV_API_TIMEOUT_SECS: &str = "NEWS_API_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Backend location plus the feed cadence.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Base URL without a trailing slash; endpoint paths are appended to it.
    pub base_url: String,
    pub request_timeout: Duration,
    pub feed: FeedCfg,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_API_TIMEOUT_SECS),
            feed: FeedCfg::default(),
        }
    }
}

impl HubConfig {
    /// Build a config for an explicit base URL (validated).
    pub fn with_base_url(base_url: &str) -> Result<Self, HubError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Read configuration from the environment:
    /// - `NEWS_API_URL` (default `http://localhost:3000`)
    /// - `NEWS_API_TIMEOUT_SECS` (default 10; unparseable or zero falls back)
    pub fn from_env() -> Result<Self, HubError> {
        let base_url = match std::env::var(ENV_API_URL) {
            Ok(v) if !v.trim().is_empty() => validate_base_url(&v)?,
            _ => DEFAULT_API_URL.to_string(),
        };

        let timeout_secs = std::env::var(ENV_API_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_API_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            request_timeout: Duration::from_secs(timeout_secs),
            feed: FeedCfg::default(),
        })
    }

    /// Absolute URL for an endpoint path such as `search`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

fn validate_base_url(raw: &str) -> Result<String, HubError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| {
        HubError::Config(format!("{ENV_API_URL}={trimmed:?} is not a valid URL: {e}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HubError::Config(format!(
            "{ENV_API_URL} must use http or https, got {}",
            url.scheme()
        )));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
