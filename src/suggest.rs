// src/suggest.rs
//! Debounced autocomplete.
//!
//! Every keystroke bumps a sequence number. A fetch only fires after
//! `SUGGEST_DEBOUNCE` of quiet, and its response is applied only if its
//! sequence number is still the latest one issued; anything older is dropped
//! no matter when it arrives.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use metrics::counter;
use tokio_util::sync::CancellationToken;

use crate::client::DynNewsApi;
use crate::error::{ApiError, HubError};

pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Default)]
struct SuggestState {
    /// Sequence number of the most recent keystroke.
    latest: u64,
    suggestions: Vec<String>,
}

/// Autocomplete state for one search box. Must be driven from inside a Tokio
/// runtime; fetches run as spawned tasks.
pub struct Suggester {
    api: DynNewsApi,
    debounce: Duration,
    state: Arc<Mutex<SuggestState>>,
    shutdown: CancellationToken,
    pending: Option<CancellationToken>,
}

impl Suggester {
    pub fn new(api: DynNewsApi) -> Self {
        Self {
            api,
            debounce: SUGGEST_DEBOUNCE,
            state: Arc::new(Mutex::new(SuggestState::default())),
            shutdown: CancellationToken::new(),
            pending: None,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// React to the query text changing. `searching` is true while a full
    /// search is being submitted; suggestions are suppressed then.
    pub fn on_input(&mut self, text: &str, searching: bool) {
        let seq = self.invalidate();
        let query = text.trim();
        if query.is_empty() || searching {
            self.lock().suggestions.clear();
            return;
        }

        let wait = self.shutdown.child_token();
        self.pending = Some(wait.clone());

        let api = Arc::clone(&self.api);
        let state = Arc::clone(&self.state);
        let shutdown = self.shutdown.clone();
        let debounce = self.debounce;
        let query = query.to_string();

        tokio::spawn(async move {
            tokio::select! {
                _ = wait.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            // Later keystrokes do not cancel an in-flight fetch; the sequence
            // check in `apply` discards it instead.
            counter!("suggest_requests_total").increment(1);
            tracing::debug!(target: "suggest", seq, query = %query, "fetching suggestions");
            let res = tokio::select! {
                _ = shutdown.cancelled() => return,
                r = api.suggestions(&query) => r,
            };
            apply(&state, seq, &query, res);
        });
    }

    /// A suggestion was clicked: clear the dropdown at once, drop any pending
    /// or in-flight fetch, and hand back the text to submit as a search.
    pub fn take_for_submit(&mut self, suggestion: &str) -> String {
        self.clear();
        suggestion.trim().to_string()
    }

    /// Clear the list and invalidate anything pending.
    pub fn clear(&mut self) {
        self.invalidate();
        self.lock().suggestions.clear();
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.lock().suggestions.clone()
    }

    /// Cancel every pending timer and in-flight fetch. Nothing touches the
    /// suggestion list after this returns.
    pub fn shutdown(&mut self) {
        self.shutdown.cancel();
        self.invalidate();
    }

    fn invalidate(&mut self) -> u64 {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
        let mut st = self.lock();
        st.latest += 1;
        st.latest
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SuggestState> {
        self.state.lock().expect("suggest state mutex poisoned")
    }
}

impl Drop for Suggester {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn apply(
    state: &Mutex<SuggestState>,
    seq: u64,
    query: &str,
    res: Result<Vec<String>, ApiError>,
) {
    let mut st = state.lock().expect("suggest state mutex poisoned");
    if st.latest != seq {
        counter!("suggest_stale_total").increment(1);
        tracing::debug!(target: "suggest", seq, latest = st.latest, query, "dropping stale suggestions");
        return;
    }
    match res {
        Ok(list) => st.suggestions = list,
        Err(e) => {
            let e = HubError::SuggestionsFailed(e);
            tracing::warn!(target: "suggest", error = %e, query, "suggestions unavailable");
            st.suggestions.clear();
        }
    }
}
