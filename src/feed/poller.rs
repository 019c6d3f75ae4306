// src/feed/poller.rs
//! Background loops behind the live feed panel.
//!
//! Two independent tickers share one state: the fetch loop replaces the
//! snapshot every `fetch_interval`, the rotation loop advances the visible
//! window every `rotate_interval`. Both stop on `stop()` or drop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use metrics::{counter, gauge};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::client::{DynNewsApi, NewsApi};
use crate::error::HubError;
use crate::feed::rotation::Rotator;
use crate::feed::synth::{events_from_entries, LiveInjector};
use crate::feed::{FeedCfg, FeedSnapshot};
use crate::model::{normalize_entries, WebhookEvent};

// tokio intervals panic on a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

struct Shared {
    snapshot: RwLock<Arc<FeedSnapshot>>,
    rotator: Mutex<Rotator>,
    injector: Mutex<LiveInjector>,
    loading: AtomicBool,
}

pub struct LiveFeed {
    api: DynNewsApi,
    cfg: FeedCfg,
    shared: Arc<Shared>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl LiveFeed {
    /// Build an idle feed. Nothing runs until `start`.
    pub fn new(api: DynNewsApi, cfg: FeedCfg, injector: LiveInjector) -> Self {
        Self {
            api,
            shared: Arc::new(Shared {
                snapshot: RwLock::new(Arc::new(FeedSnapshot::default())),
                rotator: Mutex::new(Rotator::new(cfg.batch_size)),
                injector: Mutex::new(injector),
                loading: AtomicBool::new(true),
            }),
            cfg,
            cancel: CancellationToken::new(),
            tasks: Vec::new(),
        }
    }

    /// Build and start in one go. Must be called inside a Tokio runtime.
    pub fn spawn(api: DynNewsApi, cfg: FeedCfg, injector: LiveInjector) -> Self {
        let mut feed = Self::new(api, cfg, injector);
        feed.start();
        feed
    }

    /// Start both loops. The first fetch happens immediately, the first
    /// rotation one interval later. No-op while already running.
    pub fn start(&mut self) {
        if !self.tasks.is_empty() {
            return;
        }
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }

        let fetch = {
            let api = Arc::clone(&self.api);
            let shared = Arc::clone(&self.shared);
            let cancel = self.cancel.clone();
            let period = self.cfg.fetch_interval.max(MIN_PERIOD);
            tokio::spawn(async move {
                let mut ticker = time::interval(period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => {}
                    }
                    let res = tokio::select! {
                        _ = cancel.cancelled() => break,
                        r = poll(api.as_ref(), &shared) => r,
                    };
                    if let Err(e) = res {
                        tracing::warn!(target: "feed", error = %e, "live feed poll failed; keeping previous snapshot");
                    }
                }
            })
        };

        let rotation = {
            let shared = Arc::clone(&self.shared);
            let cancel = self.cancel.clone();
            let period = self.cfg.rotate_interval.max(MIN_PERIOD);
            tokio::spawn(async move {
                let mut ticker = time::interval_at(Instant::now() + period, period);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = ticker.tick() => {}
                    }
                    rotate(&shared);
                }
            })
        };

        self.tasks.push(fetch);
        self.tasks.push(rotation);
        tracing::info!(
            target: "feed",
            fetch_every = ?self.cfg.fetch_interval,
            rotate_every = ?self.cfg.rotate_interval,
            batch = self.cfg.batch_size,
            "live feed started"
        );
    }

    /// Stop both loops. Idempotent.
    pub fn stop(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Run one fetch cycle now. Returns the number of events in the new
    /// snapshot; on failure the previous snapshot is kept.
    pub async fn poll_once(&self) -> Result<usize, HubError> {
        poll(self.api.as_ref(), &self.shared).await
    }

    /// Advance the window once. Returns the new start index.
    pub fn rotate_once(&self) -> usize {
        rotate(&self.shared)
    }

    /// True until the first fetch completes, successful or not.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::Acquire)
    }

    pub fn snapshot(&self) -> Arc<FeedSnapshot> {
        Arc::clone(&self.shared.snapshot.read().expect("feed snapshot lock poisoned"))
    }

    pub fn start_index(&self) -> usize {
        self.shared
            .rotator
            .lock()
            .expect("feed rotator mutex poisoned")
            .start()
    }

    /// Events in the currently visible window.
    pub fn visible(&self) -> Vec<WebhookEvent> {
        let snap = self.snapshot();
        let rotator = *self
            .shared
            .rotator
            .lock()
            .expect("feed rotator mutex poisoned");
        rotator.window(&snap.events).to_vec()
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll(api: &dyn NewsApi, shared: &Shared) -> Result<usize, HubError> {
    crate::telemetry::ensure_metrics_described();
    let res = api.latest_entries().await;
    shared.loading.store(false, Ordering::Release);

    let raws = match res {
        Ok(r) => r,
        Err(e) => {
            counter!("feed_poll_errors_total").increment(1);
            return Err(HubError::FeedFailed(e));
        }
    };

    let now = Utc::now();
    let entries = normalize_entries(&raws, now);
    let mut events = events_from_entries(&entries);
    let injected = shared
        .injector
        .lock()
        .expect("feed injector mutex poisoned")
        .inject(&mut events, &entries, now);

    let count = events.len();
    let next = Arc::new(FeedSnapshot { events, entries });
    *shared.snapshot.write().expect("feed snapshot lock poisoned") = next;

    counter!("feed_polls_total").increment(1);
    if injected {
        counter!("feed_live_events_total").increment(1);
    }
    gauge!("feed_events").set(count as f64);
    gauge!("feed_last_poll_ts").set(now.timestamp() as f64);
    tracing::debug!(target: "feed", events = count, injected, "live feed refreshed");

    Ok(count)
}

fn rotate(shared: &Shared) -> usize {
    let len = shared
        .snapshot
        .read()
        .expect("feed snapshot lock poisoned")
        .events
        .len();
    let mut rotator = shared.rotator.lock().expect("feed rotator mutex poisoned");
    rotator.advance(len);
    rotator.start()
}
