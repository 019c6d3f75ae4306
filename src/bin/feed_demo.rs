//! Demo against a running backend: optional search from argv, then a few
//! rotations of the live feed printed to stdout.
//!
//!   NEWS_API_URL=http://localhost:3000 cargo run --bin feed_demo -- bitcoin

use std::sync::Arc;
use std::time::Duration;

use news_hub::feed::LiveInjector;
use news_hub::telemetry::init_tracing;
use news_hub::{search, DynNewsApi, HttpNewsApi, HubConfig, LiveFeed};

const DEMO_TICKS: usize = 4;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = HubConfig::from_env()?;
    tracing::info!(base_url = %cfg.base_url, "using backend");
    let feed_cfg = cfg.feed;
    let api: DynNewsApi = Arc::new(HttpNewsApi::new(cfg)?);

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if !query.trim().is_empty() {
        let none: [&str; 0] = [];
        match search(api.as_ref(), query.trim(), &none).await {
            Ok(resp) => {
                println!("{} result(s) for {:?}", resp.total, resp.query);
                for e in &resp.results {
                    println!("  [{}] {}", e.id, e.title);
                }
            }
            Err(e) => eprintln!("search failed: {e}"),
        }
    }

    let mut feed = LiveFeed::spawn(api, feed_cfg, LiveInjector::new());
    for tick in 0..DEMO_TICKS {
        tokio::time::sleep(feed_cfg.rotate_interval + Duration::from_millis(50)).await;
        let snap = feed.snapshot();
        println!(
            "tick {tick}: {} event(s), window starts at {}",
            snap.events.len(),
            feed.start_index()
        );
        for ev in feed.visible() {
            println!("  {:>7} {}", ev.event_type, ev.entry_title);
        }
    }
    feed.stop();

    println!("feed-demo done");
    Ok(())
}
