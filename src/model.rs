// src/model.rs
//! Shared data shapes and the normalization boundary.
//!
//! Backend records arrive as loosely shaped JSON: fields may be missing,
//! null, or typed differently from one endpoint to the next (`url` is either
//! a string or an object with `href`, ids may be Mongo `$oid` wrappers).
//! Everything is read through `serde_json::Value` and coerced with defaults,
//! so one bad record never fails a batch.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title used when a record carries none.
pub const UNTITLED: &str = "Untitled";

/// Categories offered by the dashboard's filter palette.
pub const KNOWN_CATEGORIES: [&str; 7] = [
    "Business",
    "Entertainment",
    "General",
    "Health",
    "Science",
    "Sports",
    "Technology",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub author: String,
    pub published_at: DateTime<Utc>,
    /// Empty when the backend sent no image.
    pub image_url: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl NewsEntry {
    pub fn image(&self) -> Option<&str> {
        (!self.image_url.is_empty()).then_some(self.image_url.as_str())
    }

    /// Case-insensitive category match. Entries without a category never match.
    pub fn in_category(&self, label: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(label.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Create,
    Update,
    Publish,
}

impl EventType {
    pub const ALL: [EventType; 3] = [EventType::Create, EventType::Update, EventType::Publish];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Publish => "publish",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed record describing an ingestion action. `entry_id` is a weak
/// reference: it is only ever used for lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub entry_title: String,
    pub entry_id: String,
}

impl WebhookEvent {
    /// The `create` event announcing a freshly ingested entry. Each call
    /// gets its own random id, never equal to the entry's id.
    pub fn created(entry: &NewsEntry) -> Self {
        let id = loop {
            let id = uuid::Uuid::new_v4().to_string();
            if id != entry.id {
                break id;
            }
        };
        Self {
            id,
            timestamp: entry.published_at,
            event_type: EventType::Create,
            category: entry.category.clone(),
            entry_title: entry.title.clone(),
            entry_id: entry.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<NewsEntry>,
    pub total: usize,
    pub query: String,
}

impl SearchResponse {
    /// Builds a response whose `total` always equals `results.len()`.
    pub fn new(results: Vec<NewsEntry>, query: impl Into<String>) -> Self {
        Self {
            total: results.len(),
            results,
            query: query.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Relevance score attached to a raw search hit. Missing or non-numeric
/// scores count as zero so the hit never passes a threshold.
pub fn score_of(raw: &Value) -> f64 {
    raw.get("score").and_then(Value::as_f64).unwrap_or(0.0)
}

/// Normalize one raw backend record. Total: never fails, never panics.
///
/// `index` is the record's position in its batch and becomes the id when the
/// backend sent none; `now` fills in a missing or unparseable timestamp.
pub fn normalize_entry(raw: &Value, index: usize, now: DateTime<Utc>) -> NewsEntry {
    let id = id_field(raw.get("_id"))
        .or_else(|| id_field(raw.get("id")))
        .unwrap_or_else(|| index.to_string());

    let published_at = ["publishedAt", "created_at"]
        .iter()
        .find_map(|k| raw.get(*k).and_then(parse_timestamp))
        .unwrap_or(now);

    NewsEntry {
        id,
        title: non_blank(raw.get("title")).unwrap_or_else(|| UNTITLED.to_string()),
        description: text_field(raw.get("description")),
        content: text_field(raw.get("content")),
        author: text_field(raw.get("author")),
        published_at,
        image_url: text_field(raw.get("imageUrl")),
        tags: tags_field(raw.get("tags")),
        url: url_field(raw.get("url")),
        category: non_blank(raw.get("category")),
    }
}

/// Normalize a batch, using each record's position as its fallback id.
pub fn normalize_entries(raws: &[Value], now: DateTime<Utc>) -> Vec<NewsEntry> {
    raws.iter()
        .enumerate()
        .map(|(i, raw)| normalize_entry(raw, i, now))
        .collect()
}

fn text_field(v: Option<&Value>) -> String {
    v.and_then(Value::as_str).unwrap_or_default().to_string()
}

fn non_blank(v: Option<&Value>) -> Option<String> {
    v.and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_field(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(o) => non_blank(o.get("$oid")),
        _ => None,
    }
}

fn url_field(v: Option<&Value>) -> Option<String> {
    match v? {
        Value::String(_) => non_blank(v),
        Value::Object(o) => non_blank(o.get("href")),
        _ => None,
    }
}

fn tags_field(v: Option<&Value>) -> Vec<String> {
    v.and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_timestamp(v: &Value) -> Option<DateTime<Utc>> {
    let s = v.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_object_gets_all_defaults() {
        let e = normalize_entry(&json!({}), 4, t0());
        assert_eq!(e.id, "4");
        assert_eq!(e.title, UNTITLED);
        assert_eq!(e.author, "");
        assert_eq!(e.image_url, "");
        assert!(e.tags.is_empty());
        assert_eq!(e.url, None);
        assert_eq!(e.category, None);
        assert_eq!(e.published_at, t0());
    }

    #[test]
    fn non_object_input_degrades_to_defaults() {
        let e = normalize_entry(&json!("garbage"), 0, t0());
        assert_eq!(e.id, "0");
        assert_eq!(e.title, UNTITLED);
    }

    #[test]
    fn url_accepts_string_or_href_object() {
        let a = normalize_entry(&json!({ "url": "https://a.example/x" }), 0, t0());
        let b = normalize_entry(&json!({ "url": { "href": "https://b.example/y" } }), 0, t0());
        let c = normalize_entry(&json!({ "url": { "host": "c.example" } }), 0, t0());
        assert_eq!(a.url.as_deref(), Some("https://a.example/x"));
        assert_eq!(b.url.as_deref(), Some("https://b.example/y"));
        assert_eq!(c.url, None);
    }

    #[test]
    fn created_at_is_timestamp_fallback() {
        let e = normalize_entry(&json!({ "created_at": "2024-05-06T07:08:09Z" }), 0, t0());
        assert_eq!(e.published_at, Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap());
    }

    #[test]
    fn space_separated_timestamp_is_accepted() {
        let e = normalize_entry(&json!({ "created_at": "2025-03-01 10:00:00" }), 0, t0());
        assert_eq!(e.published_at, Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap());
        let f = normalize_entry(&json!({ "publishedAt": "2025-03-01 10:00:00.250" }), 0, t0());
        assert_eq!(f.published_at.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn created_event_has_its_own_id() {
        let e = normalize_entry(&json!({ "_id": "abc", "title": "T" }), 0, t0());
        let a = WebhookEvent::created(&e);
        let b = WebhookEvent::created(&e);
        assert_ne!(a.id, a.entry_id);
        assert_ne!(a.id, b.id);
        assert_eq!(a.entry_id, "abc");
        assert_eq!(a.entry_title, "T");
    }

    #[test]
    fn mongo_oid_and_numeric_ids() {
        let a = normalize_entry(&json!({ "_id": { "$oid": "65f0c0ffee" } }), 9, t0());
        let b = normalize_entry(&json!({ "_id": 42 }), 9, t0());
        assert_eq!(a.id, "65f0c0ffee");
        assert_eq!(b.id, "42");
    }

    #[test]
    fn in_category_ignores_case() {
        let mut e = normalize_entry(&json!({ "category": "Technology" }), 0, t0());
        assert!(e.in_category("technology"));
        assert!(!e.in_category("science"));
        e.category = None;
        assert!(!e.in_category("technology"));
    }
}
