// src/dashboard.rs
//! Ties search, suggestions and the detail view together the way the
//! dashboard page drives them.

use std::sync::Arc;

use crate::client::DynNewsApi;
use crate::error::HubError;
use crate::feed::LiveFeed;
use crate::model::{NewsEntry, WebhookEvent};
use crate::search::{CategoryFilter, SearchSession};
use crate::selection::Selection;
use crate::suggest::Suggester;

pub struct Dashboard {
    api: DynNewsApi,
    filter: CategoryFilter,
    session: SearchSession,
    suggester: Suggester,
    selection: Selection,
}

impl Dashboard {
    /// Must be created inside a Tokio runtime (suggestions spawn tasks).
    pub fn new(api: DynNewsApi) -> Self {
        let suggester = Suggester::new(Arc::clone(&api));
        Self::with_suggester(api, suggester)
    }

    pub fn with_suggester(api: DynNewsApi, suggester: Suggester) -> Self {
        Self {
            api,
            filter: CategoryFilter::new(),
            session: SearchSession::new(),
            suggester,
            selection: Selection::new(),
        }
    }

    /// The search box text changed.
    pub fn type_query(&mut self, text: &str) {
        self.suggester.on_input(text, self.session.is_loading());
    }

    /// Submit a search. Blank input is ignored and yields `Ok(None)`.
    pub async fn submit(&mut self, query: &str) -> Result<Option<usize>, HubError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(None);
        }
        self.suggester.clear();
        self.session
            .submit(self.api.as_ref(), query, &self.filter)
            .await
            .map(Some)
    }

    pub async fn submit_suggestion(&mut self, suggestion: &str) -> Result<Option<usize>, HubError> {
        let query = self.suggester.take_for_submit(suggestion);
        self.submit(&query).await
    }

    /// A quick-search shortcut was clicked.
    pub async fn quick_search(&mut self, query: &str) -> Result<Option<usize>, HubError> {
        self.submit(query).await
    }

    /// Open the search result at `index` in the detail view.
    pub fn open_result(&mut self, index: usize) -> bool {
        match self.session.result(index) {
            Some(entry) => {
                self.selection.open_entry(entry.clone());
                true
            }
            None => false,
        }
    }

    /// Open the entry behind a live-feed event, looked up in the feed's
    /// current snapshot.
    pub fn open_feed_event(&mut self, event: &WebhookEvent, feed: &LiveFeed) -> bool {
        let snapshot = feed.snapshot();
        self.selection.open_event(event, &snapshot.entries)
    }

    pub fn close_detail(&mut self) {
        self.selection.close();
    }

    pub fn selected(&self) -> Option<&NewsEntry> {
        self.selection.selected()
    }

    pub fn results(&self) -> &[NewsEntry] {
        self.session.results()
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Sidebar tag selection; applies from the next submit on.
    pub fn filter_mut(&mut self) -> &mut CategoryFilter {
        &mut self.filter
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn suggestions(&self) -> Vec<String> {
        self.suggester.suggestions()
    }
}
