// src/search.rs
//! Search pipeline: one backend call, fixed relevance threshold, then
//! client-side category filtering.

use chrono::Utc;
use metrics::counter;
use serde_json::Value;

use crate::client::NewsApi;
use crate::error::HubError;
use crate::model::{normalize_entry, score_of, NewsEntry, SearchResponse};

/// Hits scoring below this never reach the results list.
pub const RELEVANCE_THRESHOLD: f64 = 0.6;

/// Sample queries cycled through the search placeholder.
pub const QUICK_QUERIES: [&str; 7] = [
    "Bitcoin",
    "AI Technology",
    "Climate Change",
    "Healthcare",
    "Politics",
    "Cryptocurrency",
    "Science",
];

/// The shortcuts offered as one-click searches.
pub fn quick_queries() -> &'static [&'static str] {
    &QUICK_QUERIES[..4]
}

/// Keep hits at or above the threshold and normalize them. Fallback ids use
/// the hit's position in the raw list.
pub fn filter_relevant(hits: &[Value]) -> Vec<NewsEntry> {
    let now = Utc::now();
    hits.iter()
        .enumerate()
        .filter(|(_, hit)| score_of(hit) >= RELEVANCE_THRESHOLD)
        .map(|(i, hit)| normalize_entry(hit, i, now))
        .collect()
}

/// Retain entries whose category matches any requested label,
/// case-insensitively. An empty label set disables the filter.
pub fn filter_by_category<S: AsRef<str>>(
    entries: Vec<NewsEntry>,
    categories: &[S],
) -> Vec<NewsEntry> {
    if categories.is_empty() {
        return entries;
    }
    entries
        .into_iter()
        .filter(|e| categories.iter().any(|c| e.in_category(c.as_ref())))
        .collect()
}

/// Run a search. `query` is expected trimmed and non-empty; rejecting blank
/// submissions is the caller's job.
pub async fn search<S: AsRef<str>>(
    api: &dyn NewsApi,
    query: &str,
    categories: &[S],
) -> Result<SearchResponse, HubError> {
    crate::telemetry::ensure_metrics_described();
    counter!("search_requests_total").increment(1);

    let hits = match api.search(query).await {
        Ok(h) => h,
        Err(e) => {
            counter!("search_failures_total").increment(1);
            tracing::warn!(target: "search", error = %e, query, "search request failed");
            return Err(HubError::SearchFailed(e));
        }
    };

    let relevant = filter_relevant(&hits);
    let above_threshold = relevant.len();
    let results = filter_by_category(relevant, categories);

    counter!("search_results_total").increment(results.len() as u64);
    tracing::info!(
        target: "search",
        query,
        hits = hits.len(),
        above_threshold,
        results = results.len(),
        categories = categories.len(),
        "search finished"
    );

    Ok(SearchResponse::new(results, query))
}

/// Sidebar tag selection. Labels are kept exactly as toggled; matching
/// against entries is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: Vec<String>,
}

impl CategoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the label if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, label: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|t| t == label) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(label.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.selected.iter().any(|t| t == label)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// `"Tags: a, b"` while a filter is active.
    pub fn summary(&self) -> Option<String> {
        self.is_active()
            .then(|| format!("Tags: {}", self.selected.join(", ")))
    }
}

/// Result state behind the dashboard's results grid.
#[derive(Debug, Default)]
pub struct SearchSession {
    results: Vec<NewsEntry>,
    query: Option<String>,
    loading: bool,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search and fold the outcome into the session. On failure the
    /// previous results stay in place; `loading` is cleared either way.
    pub async fn submit(
        &mut self,
        api: &dyn NewsApi,
        query: &str,
        filter: &CategoryFilter,
    ) -> Result<usize, HubError> {
        self.loading = true;
        self.query = Some(query.to_string());

        let outcome = search(api, query, filter.selected()).await;
        self.loading = false;

        match outcome {
            Ok(resp) => {
                self.results = resp.results;
                Ok(resp.total)
            }
            Err(e) => {
                tracing::error!(target: "search", error = %e, "search failed; keeping previous results");
                Err(e)
            }
        }
    }

    pub fn results(&self) -> &[NewsEntry] {
        &self.results
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self, index: usize) -> Option<&NewsEntry> {
        self.results.get(index)
    }

    /// `Showing 3 results for "bitcoin"`; `None` before any search or when
    /// there is nothing to show.
    pub fn results_summary(&self) -> Option<String> {
        let query = self.query.as_deref()?;
        let n = self.results.len();
        if n == 0 {
            return None;
        }
        let plural = if n > 1 { "s" } else { "" };
        Some(format!("Showing {n} result{plural} for \"{query}\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn threshold_is_inclusive() {
        let hits = vec![
            json!({ "_id": "a", "score": 0.6 }),
            json!({ "_id": "b", "score": 0.5999 }),
            json!({ "_id": "c" }),
            json!({ "_id": "d", "score": "0.9" }),
        ];
        let ids: Vec<_> = filter_relevant(&hits).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["a"]);
    }

    #[test]
    fn category_filter_drops_uncategorized_when_active() {
        let hits = vec![
            json!({ "_id": "a", "score": 0.9, "category": "Technology" }),
            json!({ "_id": "b", "score": 0.9 }),
            json!({ "_id": "c", "score": 0.9, "category": "sports" }),
        ];
        let all = filter_relevant(&hits);
        let none: [&str; 0] = [];
        assert_eq!(filter_by_category(all.clone(), &none).len(), 3);
        let ids: Vec<_> = filter_by_category(all, &["TECHNOLOGY", "Sports"])
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut f = CategoryFilter::new();
        assert!(f.toggle("Business"));
        assert!(f.toggle("Health"));
        assert_eq!(f.summary().as_deref(), Some("Tags: Business, Health"));
        assert!(!f.toggle("Business"));
        assert_eq!(f.selected().to_vec(), vec!["Health".to_string()]);
        f.clear();
        assert!(!f.is_active());
        assert_eq!(f.summary(), None);
    }

    #[test]
    fn quick_queries_are_first_four_samples() {
        assert_eq!(
            quick_queries().to_vec(),
            vec!["Bitcoin", "AI Technology", "Climate Change", "Healthcare"]
        );
    }
}
