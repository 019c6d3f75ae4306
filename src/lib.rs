// src/lib.rs
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod feed;
pub mod model;
pub mod search;
pub mod selection;
pub mod suggest;
pub mod telemetry;

pub use client::{DynNewsApi, HttpNewsApi, NewsApi};
pub use config::HubConfig;
pub use dashboard::Dashboard;
pub use error::{ApiError, HubError};
pub use feed::{FeedCfg, FeedSnapshot, LiveFeed, LiveInjector, Rotator};
pub use model::{EventType, NewsEntry, SearchResponse, WebhookEvent};
pub use search::{search, CategoryFilter, SearchSession};
pub use selection::{correlate, Selection};
pub use suggest::Suggester;
