//! Data provider: owns the current record set and its refresh lifecycle.
//!
//! ## State
//!
//! ```text
//! Uninitialized ──refresh──▶ Loading ──ok──▶ Ready { connected: true }
//!                               │
//!                               └──err──▶ Ready { connected: false, using_fallback: true }
//! ```
//!
//! Every refresh (manual or timer) goes back through `Loading`. With no
//! source configured the provider goes straight to the fallback state.
//!
//! ## Concurrency
//!
//! The state tuple lives behind one lock and every transition is applied in
//! a single write, so readers never see new records next to an old error
//! flag. At most one fetch runs at a time: manual refreshes wait for an
//! in-flight fetch, timer ticks skip. After [`DataProvider::shutdown`] no
//! fetch result is committed; a fetch cut off that way only clears the
//! loading flag.

use crate::constants::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_REFRESH_INTERVAL_MS};
use crate::data::{DataError, RecordSource};
use crate::perf::RefreshTimings;
use crate::query::FilterVocabulary;
use crate::stats::{SensorStats, compute_stats};
use crate::types::SensorRecord;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ============================================================================
// Configuration & State
// ============================================================================

/// Refresh schedule and fetch bound
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Auto-refresh period; zero or negative disables polling
    pub refresh_interval_ms: i64,
    /// Upper bound on a single fetch
    pub fetch_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Polling period, or `None` when polling is disabled
    pub fn refresh_period(&self) -> Option<Duration> {
        u64::try_from(self.refresh_interval_ms)
            .ok()
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "phase")]
pub enum ProviderPhase {
    Uninitialized,
    Loading,
    #[serde(rename_all = "camelCase")]
    Ready {
        connected: bool,
        using_fallback: bool,
    },
}

/// Everything the presentation layer reads, captured at one instant
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSnapshot {
    pub records: Arc<Vec<SensorRecord>>,
    pub phase: ProviderPhase,
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: DateTime<Utc>,
    pub is_connected: bool,
    pub using_fallback: bool,
    /// Bumped on every committed transition
    pub generation: u64,
}

impl ProviderSnapshot {
    fn initial(fallback: Arc<Vec<SensorRecord>>) -> Self {
        Self {
            records: fallback,
            phase: ProviderPhase::Uninitialized,
            is_loading: false,
            error: None,
            last_updated: Utc::now(),
            is_connected: false,
            using_fallback: true,
            generation: 0,
        }
    }

    pub fn stats(&self) -> SensorStats {
        compute_stats(self.records.iter())
    }

    pub fn vocabulary(&self) -> FilterVocabulary {
        FilterVocabulary::from_records(&self.records)
    }
}

/// What a call to `refresh` ended up doing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh rows from the source
    Live { records: usize },
    /// No source configured; the fallback set is shown
    Fallback,
    /// The fetch failed; the fallback set is shown with the error
    FallbackAfterError,
    /// A timer tick found a fetch already running
    Skipped,
    /// The provider was shut down; nothing was committed
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RefreshTrigger {
    Manual,
    Timer,
}

// ============================================================================
// Shared core
// ============================================================================

struct Shared {
    source: Option<Arc<dyn RecordSource>>,
    fallback: Arc<Vec<SensorRecord>>,
    fetch_timeout: Duration,
    state: RwLock<ProviderSnapshot>,
    /// Held for the duration of one fetch
    fetch_gate: tokio::sync::Mutex<()>,
    timings: Mutex<RefreshTimings>,
    changes: watch::Sender<u64>,
    /// Cancelled on shutdown; parent of every poller token
    active: CancellationToken,
}

impl Shared {
    /// Apply one transition atomically. Returns false, applying nothing, once
    /// the provider has been shut down.
    fn commit(&self, apply: impl FnOnce(&mut ProviderSnapshot)) -> bool {
        let generation = {
            let mut state = self.state.write();
            if self.active.is_cancelled() {
                return false;
            }
            apply(&mut state);
            state.generation += 1;
            state.generation
        };
        self.changes.send_replace(generation);
        true
    }

    /// Clear a `Loading` left behind by a fetch that outlived shutdown.
    /// Records, error and timestamp are left as they were.
    fn settle_cancelled(&self, previous: ProviderPhase) {
        let generation = {
            let mut state = self.state.write();
            if !state.is_loading {
                return;
            }
            state.is_loading = false;
            state.phase = previous;
            state.generation += 1;
            state.generation
        };
        self.changes.send_replace(generation);
    }

    fn show_fallback(&self, error: Option<String>, touch_timestamp: bool) -> bool {
        let fallback = Arc::clone(&self.fallback);
        self.commit(|state| {
            state.records = fallback;
            state.is_connected = false;
            state.using_fallback = true;
            state.error = error;
            state.is_loading = false;
            state.phase = ProviderPhase::Ready {
                connected: false,
                using_fallback: true,
            };
            if touch_timestamp {
                state.last_updated = Utc::now();
            }
        })
    }

    async fn refresh(&self, trigger: RefreshTrigger) -> RefreshOutcome {
        if self.active.is_cancelled() {
            return RefreshOutcome::Cancelled;
        }

        let Some(source) = self.source.clone() else {
            debug!("No sheet source configured; using sample data");
            return if self.show_fallback(None, true) {
                RefreshOutcome::Fallback
            } else {
                RefreshOutcome::Cancelled
            };
        };

        let _gate = match trigger {
            RefreshTrigger::Manual => self.fetch_gate.lock().await,
            RefreshTrigger::Timer => match self.fetch_gate.try_lock() {
                Ok(gate) => gate,
                Err(_) => {
                    debug!(source = source.name(), "Refresh already in flight; skipping tick");
                    return RefreshOutcome::Skipped;
                }
            },
        };

        let mut previous = ProviderPhase::Uninitialized;
        let started = self.commit(|state| {
            previous = state.phase;
            state.is_loading = true;
            state.error = None;
            state.phase = ProviderPhase::Loading;
        });
        if !started {
            return RefreshOutcome::Cancelled;
        }

        let fetch_started = Instant::now();
        let fetched = match tokio::time::timeout(self.fetch_timeout, source.fetch_rows()).await {
            Ok(result) => result,
            Err(_) => Err(DataError::Timeout(self.fetch_timeout)),
        };
        self.timings
            .lock()
            .record(fetch_started.elapsed(), fetched.is_ok());

        match fetched {
            Ok(rows) => {
                let records = source.transform(&rows);
                let count = records.len();
                let committed = self.commit(|state| {
                    state.records = Arc::new(records);
                    state.is_connected = true;
                    state.using_fallback = false;
                    state.error = None;
                    state.last_updated = Utc::now();
                    state.is_loading = false;
                    state.phase = ProviderPhase::Ready {
                        connected: true,
                        using_fallback: false,
                    };
                });
                if !committed {
                    debug!(source = source.name(), "Provider shut down mid-fetch; dropping result");
                    self.settle_cancelled(previous);
                    return RefreshOutcome::Cancelled;
                }
                info!(
                    source = source.name(),
                    records = count,
                    "Loaded sensor records from sheet"
                );
                RefreshOutcome::Live { records: count }
            }
            Err(err) => {
                let message = err.to_string();
                if !self.show_fallback(Some(message.clone()), false) {
                    self.settle_cancelled(previous);
                    return RefreshOutcome::Cancelled;
                }
                warn!(
                    source = source.name(),
                    error = %message,
                    "Sheet fetch failed; showing sample data"
                );
                RefreshOutcome::FallbackAfterError
            }
        }
    }
}

async fn poll_loop(shared: Arc<Shared>, token: CancellationToken, period: Duration) {
    let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        shared.refresh(RefreshTrigger::Timer).await;
    }
    debug!("Refresh timer stopped");
}

struct Poller {
    token: CancellationToken,
    _handle: JoinHandle<()>,
}

// ============================================================================
// Public handle
// ============================================================================

/// Owner of the authoritative record set.
///
/// Holds the fallback records from construction, so a renderer never sees
/// an empty table before the first load.
pub struct DataProvider {
    shared: Arc<Shared>,
    refresh_interval_ms: Mutex<i64>,
    poller: Mutex<Option<Poller>>,
    started: AtomicBool,
}

impl DataProvider {
    pub fn new(
        source: Option<Arc<dyn RecordSource>>,
        fallback: Arc<Vec<SensorRecord>>,
        config: ProviderConfig,
    ) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            shared: Arc::new(Shared {
                source,
                state: RwLock::new(ProviderSnapshot::initial(Arc::clone(&fallback))),
                fallback,
                fetch_timeout: config.fetch_timeout,
                fetch_gate: tokio::sync::Mutex::new(()),
                timings: Mutex::new(RefreshTimings::default()),
                changes,
                active: CancellationToken::new(),
            }),
            refresh_interval_ms: Mutex::new(config.refresh_interval_ms),
            poller: Mutex::new(None),
            started: AtomicBool::new(false),
        }
    }

    /// Run the first load, then start auto-refresh. Calling it again
    /// restarts the timer.
    pub async fn start(&self) -> RefreshOutcome {
        self.started.store(true, Ordering::SeqCst);
        let outcome = self.refresh().await;
        self.restart_poller();
        outcome
    }

    /// Fetch now. Waits for an in-flight fetch instead of running alongside
    /// it, and leaves the timer schedule untouched.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.shared.refresh(RefreshTrigger::Manual).await
    }

    /// Change the polling period. If the provider is running this cancels
    /// the current timer, reloads, and schedules the new period.
    pub async fn set_refresh_interval(&self, refresh_interval_ms: i64) -> Option<RefreshOutcome> {
        *self.refresh_interval_ms.lock() = refresh_interval_ms;
        if !self.started.load(Ordering::SeqCst) || !self.is_active() {
            return None;
        }
        self.stop_poller();
        Some(self.start().await)
    }

    pub fn refresh_interval_ms(&self) -> i64 {
        *self.refresh_interval_ms.lock()
    }

    /// Stop polling and refuse to commit any later fetch result. A fetch
    /// already in flight drops its result and resets `is_loading`.
    pub fn shutdown(&self) {
        if !self.shared.active.is_cancelled() {
            info!("Shutting down data provider");
        }
        self.shared.active.cancel();
        self.stop_poller();
    }

    pub fn is_active(&self) -> bool {
        !self.shared.active.is_cancelled()
    }

    /// Whether a refresh timer is currently scheduled
    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .as_ref()
            .is_some_and(|p| !p.token.is_cancelled())
    }

    fn stop_poller(&self) {
        if let Some(poller) = self.poller.lock().take() {
            poller.token.cancel();
        }
    }

    fn restart_poller(&self) {
        let mut slot = self.poller.lock();
        if let Some(previous) = slot.take() {
            previous.token.cancel();
        }
        if !self.is_active() {
            return;
        }

        let config = ProviderConfig {
            refresh_interval_ms: self.refresh_interval_ms(),
            fetch_timeout: self.shared.fetch_timeout,
        };
        let Some(period) = config.refresh_period() else {
            debug!(
                refresh_interval_ms = config.refresh_interval_ms,
                "Auto-refresh disabled"
            );
            return;
        };

        let token = self.shared.active.child_token();
        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.shared),
            token.clone(),
            period,
        ));
        debug!(period_ms = period.as_millis() as u64, "Auto-refresh scheduled");
        *slot = Some(Poller {
            token,
            _handle: handle,
        });
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    pub fn snapshot(&self) -> ProviderSnapshot {
        self.shared.state.read().clone()
    }

    pub fn records(&self) -> Arc<Vec<SensorRecord>> {
        Arc::clone(&self.shared.state.read().records)
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.read().is_loading
    }

    pub fn error(&self) -> Option<String> {
        self.shared.state.read().error.clone()
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.shared.state.read().last_updated
    }

    pub fn is_connected(&self) -> bool {
        self.shared.state.read().is_connected
    }

    pub fn phase(&self) -> ProviderPhase {
        self.shared.state.read().phase
    }

    pub fn timings(&self) -> RefreshTimings {
        self.shared.timings.lock().clone()
    }

    /// Notified with the new generation after every committed transition
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }
}

impl Drop for DataProvider {
    fn drop(&mut self) {
        self.shared.active.cancel();
        self.stop_poller();
    }
}
