// src/feed/mod.rs
//! Live webhook feed: periodic fetch, synthetic live events, and a rotating
//! window over the result.

use std::time::Duration;

use crate::model::{NewsEntry, WebhookEvent};

pub mod poller;
pub mod rotation;
pub mod synth;

pub use poller::LiveFeed;
pub use rotation::Rotator;
pub use synth::LiveInjector;

pub const FEED_FETCH_INTERVAL: Duration = Duration::from_secs(10);
pub const ROTATE_INTERVAL: Duration = Duration::from_secs(10);
pub const BATCH_SIZE: usize = 5;
/// Chance that a successful fetch gets one synthetic live event on top.
pub const LIVE_EVENT_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedCfg {
    pub fetch_interval: Duration,
    pub rotate_interval: Duration,
    pub batch_size: usize,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            fetch_interval: FEED_FETCH_INTERVAL,
            rotate_interval: ROTATE_INTERVAL,
            batch_size: BATCH_SIZE,
        }
    }
}

/// Result of one successful fetch. Replaced wholesale, never patched, so a
/// reader always sees events and entries from the same poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedSnapshot {
    pub events: Vec<WebhookEvent>,
    pub entries: Vec<NewsEntry>,
}

impl FeedSnapshot {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<&NewsEntry> {
        self.entries.iter().find(|e| e.id == id)
    }
}
