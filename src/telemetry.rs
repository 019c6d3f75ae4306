// src/telemetry.rs
//! Tracing setup for binaries plus one-time metric descriptions.

use metrics::{describe_counter, describe_gauge};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "news_hub=info,warn";
const ENV_LOG_JSON: &str = "NEWS_HUB_LOG_JSON";

/// Install a global subscriber. Filter comes from `RUST_LOG`, falling back to
/// `news_hub=info,warn`; `NEWS_HUB_LOG_JSON=1` switches to JSON lines.
///
/// Safe to call more than once: later calls are ignored.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(ENV_LOG_JSON).ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// One-time metrics registration (so series carry help text once a recorder
/// is installed by the host application).
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("search_requests_total", "Searches issued to the backend.");
        describe_counter!(
            "search_failures_total",
            "Searches that failed (transport or body)."
        );
        describe_counter!(
            "search_results_total",
            "Entries returned after threshold + category filtering."
        );
        describe_counter!(
            "suggest_requests_total",
            "Suggestion fetches fired after debounce."
        );
        describe_counter!(
            "suggest_stale_total",
            "Suggestion responses discarded because a newer query was issued."
        );
        describe_counter!("feed_polls_total", "Successful latest-entries polls.");
        describe_counter!("feed_poll_errors_total", "Failed latest-entries polls.");
        describe_counter!("feed_live_events_total", "Synthetic live events injected.");
        describe_gauge!("feed_events", "Events in the current feed snapshot.");
        describe_gauge!("feed_last_poll_ts", "Unix ts of the last successful poll.");
    });
}
