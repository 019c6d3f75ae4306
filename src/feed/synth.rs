// src/feed/synth.rs
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::feed::LIVE_EVENT_PROBABILITY;
use crate::model::{EventType, NewsEntry, WebhookEvent};

pub const LIVE_TITLE_PREFIX: &str = "Live Update: ";
pub const LIVE_TITLES: [&str; 3] = ["Market Analysis", "Tech News", "Breaking Story"];
/// Prefix of synthetic entry ids. These never resolve to a real entry.
pub const LIVE_ENTRY_PREFIX: &str = "live-";

/// One `create` event per fetched entry, in entry order.
pub fn events_from_entries(entries: &[NewsEntry]) -> Vec<WebhookEvent> {
    entries.iter().map(WebhookEvent::created).collect()
}

/// Decides whether a fetch gets a synthetic "live" event and builds it.
/// Seedable so tests can pin the outcome.
#[derive(Debug, Clone)]
pub struct LiveInjector {
    probability: f64,
    rng: StdRng,
}

impl Default for LiveInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveInjector {
    pub fn new() -> Self {
        Self {
            probability: LIVE_EVENT_PROBABILITY,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            probability: LIVE_EVENT_PROBABILITY,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Never injects.
    pub fn disabled() -> Self {
        Self::seeded(0).with_probability(0.0)
    }

    /// Clamped to `[0, 1]`; NaN counts as zero.
    pub fn with_probability(mut self, p: f64) -> Self {
        self.probability = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        self
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Maybe prepend one synthetic event. Returns whether one was added.
    pub fn inject(
        &mut self,
        events: &mut Vec<WebhookEvent>,
        entries: &[NewsEntry],
        now: DateTime<Utc>,
    ) -> bool {
        if !self.rng.random_bool(self.probability) {
            return false;
        }
        let ev = self.live_event(entries, now);
        tracing::debug!(target: "feed", id = %ev.id, kind = %ev.event_type, "injecting live event");
        events.insert(0, ev);
        true
    }

    fn live_event(&mut self, entries: &[NewsEntry], now: DateTime<Utc>) -> WebhookEvent {
        let (id, entry_id) = loop {
            let uuid = uuid::Builder::from_random_bytes(self.rng.random()).into_uuid();
            let id = uuid.to_string();
            let entry_id = format!("{LIVE_ENTRY_PREFIX}{uuid}");
            if !entries.iter().any(|e| e.id == id || e.id == entry_id) {
                break (id, entry_id);
            }
        };
        let event_type = *EventType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&EventType::Create);
        let title = *LIVE_TITLES.choose(&mut self.rng).unwrap_or(&LIVE_TITLES[0]);

        WebhookEvent {
            id,
            timestamp: now,
            event_type,
            category: None,
            entry_title: format!("{LIVE_TITLE_PREFIX}{title}"),
            entry_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_entries;
    use serde_json::json;

    fn entries() -> Vec<NewsEntry> {
        normalize_entries(
            &[json!({ "_id": "a", "title": "A" }), json!({ "_id": "b" })],
            Utc::now(),
        )
    }

    #[test]
    fn one_create_event_per_entry() {
        let evs = events_from_entries(&entries());
        assert_eq!(evs.len(), 2);
        assert!(evs.iter().all(|e| e.event_type == EventType::Create));
        assert_eq!(evs[0].entry_id, "a");
        assert_eq!(evs[0].entry_title, "A");
        assert_eq!(evs[1].entry_title, "Untitled");
    }

    #[test]
    fn certain_injection_prepends_unresolvable_event() {
        let ents = entries();
        let mut evs = events_from_entries(&ents);
        let mut inj = LiveInjector::seeded(7).with_probability(1.0);
        assert!(inj.inject(&mut evs, &ents, Utc::now()));
        assert_eq!(evs.len(), 3);
        let live = &evs[0];
        assert!(live.entry_id.starts_with(LIVE_ENTRY_PREFIX));
        assert!(live.entry_title.starts_with(LIVE_TITLE_PREFIX));
        assert!(ents.iter().all(|e| e.id != live.entry_id && e.id != live.id));
    }

    #[test]
    fn disabled_never_injects() {
        let ents = entries();
        let mut evs = events_from_entries(&ents);
        let mut inj = LiveInjector::disabled();
        for _ in 0..100 {
            assert!(!inj.inject(&mut evs, &ents, Utc::now()));
        }
        assert_eq!(evs.len(), 2);
    }

    #[test]
    fn seeded_rate_is_near_configured_probability() {
        let mut inj = LiveInjector::seeded(42);
        let trials = 2000;
        let mut hits = 0;
        for _ in 0..trials {
            let mut evs = Vec::new();
            if inj.inject(&mut evs, &[], Utc::now()) {
                hits += 1;
            }
        }
        let rate = hits as f64 / trials as f64;
        assert!((0.25..0.35).contains(&rate), "rate {rate}");
    }
}
