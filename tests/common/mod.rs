// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use news_hub::{ApiError, NewsApi};

/// Scriptable backend. Every call is logged; suggestion latency can be set
/// per query and each endpoint can be switched to fail.
#[derive(Default)]
pub struct MockApi {
    pub search_calls: Mutex<Vec<String>>,
    pub suggest_calls: Mutex<Vec<String>>,
    pub latest_calls: Mutex<usize>,
    pub search_hits: Mutex<Vec<Value>>,
    pub latest: Mutex<Vec<Value>>,
    pub suggest_delay: Mutex<HashMap<String, Duration>>,
    pub fail_search: AtomicBool,
    pub fail_suggest: AtomicBool,
    pub fail_latest: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search_hits(self, hits: Vec<Value>) -> Self {
        *self.search_hits.lock() = hits;
        self
    }

    pub fn with_latest(self, raws: Vec<Value>) -> Self {
        *self.latest.lock() = raws;
        self
    }

    pub fn set_latest(&self, raws: Vec<Value>) {
        *self.latest.lock() = raws;
    }

    pub fn delay_suggestions(&self, query: &str, d: Duration) {
        self.suggest_delay.lock().insert(query.to_string(), d);
    }

    pub fn set_fail_search(&self, v: bool) {
        self.fail_search.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_suggest(&self, v: bool) {
        self.fail_suggest.store(v, Ordering::SeqCst);
    }

    pub fn set_fail_latest(&self, v: bool) {
        self.fail_latest.store(v, Ordering::SeqCst);
    }

    pub fn suggest_calls(&self) -> Vec<String> {
        self.suggest_calls.lock().clone()
    }

    pub fn latest_calls(&self) -> usize {
        *self.latest_calls.lock()
    }
}

#[async_trait]
impl NewsApi for MockApi {
    async fn search(&self, query: &str) -> Result<Vec<Value>, ApiError> {
        self.search_calls.lock().push(query.to_string());
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                endpoint: "search",
                status: 500,
            });
        }
        Ok(self.search_hits.lock().clone())
    }

    async fn suggestions(&self, query: &str) -> Result<Vec<String>, ApiError> {
        self.suggest_calls.lock().push(query.to_string());
        let delay = self.suggest_delay.lock().get(query).copied();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_suggest.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                endpoint: "advanced-suggestions",
                status: 503,
            });
        }
        Ok(vec![format!("{query} news"), format!("{query} price")])
    }

    async fn latest_entries(&self) -> Result<Vec<Value>, ApiError> {
        *self.latest_calls.lock() += 1;
        if self.fail_latest.load(Ordering::SeqCst) {
            return Err(ApiError::Malformed {
                endpoint: "latest-entries",
                reason: "success flag not set".into(),
            });
        }
        Ok(self.latest.lock().clone())
    }
}

/// `n` raw latest-entries records with ids `e0..e{n-1}`.
pub fn raw_entries(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| {
            json!({
                "_id": format!("e{i}"),
                "title": format!("Entry {i}"),
                "created_at": "2025-03-01T10:00:00Z",
                "category": "General"
            })
        })
        .collect()
}
