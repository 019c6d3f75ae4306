// tests/correlation.rs
use chrono::Utc;
use serde_json::json;

use news_hub::feed::synth::{events_from_entries, LiveInjector};
use news_hub::model::normalize_entries;
use news_hub::{correlate, Selection};

#[test]
fn every_fetched_event_resolves_to_its_entry() {
    let entries = normalize_entries(
        &[json!({ "_id": "x" }), json!({ "title": "no id" }), json!({ "_id": 7 })],
        Utc::now(),
    );
    for ev in events_from_entries(&entries) {
        let hit = correlate(&ev, &entries).expect("resolves");
        assert_eq!(hit.id, ev.entry_id);
    }
}

#[test]
fn clicking_a_live_event_leaves_selection_alone() {
    let entries = normalize_entries(&[json!({ "_id": "a", "title": "A" })], Utc::now());
    let mut events = events_from_entries(&entries);
    let mut inj = LiveInjector::seeded(11).with_probability(1.0);
    assert!(inj.inject(&mut events, &entries, Utc::now()));

    let mut sel = Selection::new();
    assert!(!sel.open_event(&events[0], &entries));
    assert!(!sel.is_open());

    assert!(sel.open_event(&events[1], &entries));
    assert!(!sel.open_event(&events[0], &entries));
    assert_eq!(sel.selected().map(|e| e.title.as_str()), Some("A"));
}

#[test]
fn stale_event_from_an_older_snapshot_does_not_resolve() {
    let old = normalize_entries(&[json!({ "_id": "gone" })], Utc::now());
    let new = normalize_entries(&[json!({ "_id": "fresh" })], Utc::now());
    let ev = &events_from_entries(&old)[0];
    assert!(correlate(ev, &new).is_none());
}
