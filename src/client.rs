// src/client.rs
//! Backend contracts: relevance search, suggestions, latest entries.
//!
//! `NewsApi` is the seam the pipelines talk to; `HttpNewsApi` is the real
//! reqwest-backed implementation. Responses are returned as raw JSON records
//! so that normalization stays in one place (`crate::model`).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::HubConfig;
use crate::error::{ApiError, HubError};

pub const SEARCH_PATH: &str = "search";
pub const SUGGEST_PATH: &str = "advanced-suggestions";
pub const LATEST_PATH: &str = "latest-entries";

#[async_trait]
pub trait NewsApi: Send + Sync {
    /// `POST /search` with `{ query }`; returns the raw `fetchedEntries` hits.
    async fn search(&self, query: &str) -> Result<Vec<Value>, ApiError>;

    /// `GET /advanced-suggestions?q=<query>`.
    async fn suggestions(&self, query: &str) -> Result<Vec<String>, ApiError>;

    /// `GET /latest-entries`; returns the raw `data` records.
    async fn latest_entries(&self) -> Result<Vec<Value>, ApiError>;
}

pub type DynNewsApi = Arc<dyn NewsApi>;

#[derive(Clone)]
pub struct HttpNewsApi {
    cfg: HubConfig,
    client: Client,
}

impl HttpNewsApi {
    pub fn new(cfg: HubConfig) -> Result<Self, HubError> {
        let client = Client::builder()
            .user_agent(concat!("news-hub/", env!("CARGO_PKG_VERSION")))
            .timeout(cfg.request_timeout)
            .build()
            .map_err(|e| HubError::Config(format!("building http client: {e}")))?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &HubConfig {
        &self.cfg
    }

    async fn read_json(
        endpoint: &'static str,
        resp: reqwest::Response,
    ) -> Result<Value, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let body = resp
            .text()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    fetched_entries: Vec<Value>,
}

#[derive(Deserialize)]
struct LatestEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<Value>,
}

/// Pull `fetchedEntries` out of a search body.
pub fn parse_search_body(body: Value) -> Result<Vec<Value>, ApiError> {
    let env: SearchEnvelope = serde_json::from_value(body).map_err(|e| ApiError::Malformed {
        endpoint: SEARCH_PATH,
        reason: e.to_string(),
    })?;
    Ok(env.fetched_entries)
}

/// Pull `data` out of a latest-entries body; `success` must be true and
/// `data` must be an array.
pub fn parse_latest_body(body: Value) -> Result<Vec<Value>, ApiError> {
    let env: LatestEnvelope = serde_json::from_value(body).map_err(|e| ApiError::Malformed {
        endpoint: LATEST_PATH,
        reason: e.to_string(),
    })?;
    match (env.success, env.data) {
        (true, Some(Value::Array(items))) => Ok(items),
        (false, _) => Err(ApiError::Malformed {
            endpoint: LATEST_PATH,
            reason: "success flag not set".to_string(),
        }),
        _ => Err(ApiError::Malformed {
            endpoint: LATEST_PATH,
            reason: "data is not an array".to_string(),
        }),
    }
}

/// Suggestions are a JSON array; non-string items are skipped.
pub fn parse_suggestions_body(body: Value) -> Result<Vec<String>, ApiError> {
    match body {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Err(ApiError::Malformed {
            endpoint: SUGGEST_PATH,
            reason: "expected a JSON array".to_string(),
        }),
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn search(&self, query: &str) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .client
            .post(self.cfg.endpoint(SEARCH_PATH))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: SEARCH_PATH,
                source,
            })?;
        parse_search_body(Self::read_json(SEARCH_PATH, resp).await?)
    }

    async fn suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let resp = self
            .client
            .get(self.cfg.endpoint(SUGGEST_PATH))
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: SUGGEST_PATH,
                source,
            })?;
        parse_suggestions_body(Self::read_json(SUGGEST_PATH, resp).await?)
    }

    async fn latest_entries(&self) -> Result<Vec<Value>, ApiError> {
        let resp = self
            .client
            .get(self.cfg.endpoint(LATEST_PATH))
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: LATEST_PATH,
                source,
            })?;
        parse_latest_body(Self::read_json(LATEST_PATH, resp).await?)
    }
}
