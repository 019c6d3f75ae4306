// src/selection.rs
//! Detail-view selection and event-to-entry correlation.

use crate::model::{NewsEntry, WebhookEvent};

/// The entry an event refers to, if it is in `entries`. Synthetic live
/// events never resolve.
pub fn correlate<'a>(event: &WebhookEvent, entries: &'a [NewsEntry]) -> Option<&'a NewsEntry> {
    entries.iter().find(|e| e.id == event.entry_id)
}

/// At most one entry is open in the detail view.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<NewsEntry>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the entry behind `event`. An unresolvable event leaves the
    /// current selection untouched and returns false.
    pub fn open_event(&mut self, event: &WebhookEvent, entries: &[NewsEntry]) -> bool {
        match correlate(event, entries) {
            Some(entry) => {
                self.selected = Some(entry.clone());
                true
            }
            None => {
                tracing::debug!(target: "selection", entry_id = %event.entry_id, "event has no matching entry");
                false
            }
        }
    }

    pub fn open_entry(&mut self, entry: NewsEntry) {
        self.selected = Some(entry);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&NewsEntry> {
        self.selected.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.selected.is_some()
    }
}
