//! Timing of sheet refreshes and query stages.
//!
//! The provider feeds every fetch into [`RefreshTimings`], so a slow or
//! flaky sheet shows up in the logs and in `DataProvider::timings()`.
//!
//! Query stages can be timed with `stage_timer!`. It expands to nothing
//! unless the crate is built with the `profiling` feature:
//!
//! ```ignore
//! fn filter_and_sort(..) {
//!     stage_timer!("filter_and_sort");
//!     // ...
//! }
//! ```

use crate::constants::SLOW_REFRESH;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tracing::warn;

/// Samples kept by a [`DurationWindow`]
const WINDOW_LEN: usize = 50;

/// Budget for a profiled query stage
pub const STAGE_BUDGET: Duration = Duration::from_millis(1);

/// Time the rest of the enclosing scope as a named stage (`profiling` only).
#[macro_export]
macro_rules! stage_timer {
    ($stage:expr) => {
        #[cfg(feature = "profiling")]
        let _stage_timer = $crate::perf::StageTimer::start($stage, $crate::perf::STAGE_BUDGET);
        #[cfg(not(feature = "profiling"))]
        let _ = $stage;
    };
}

// ============================================================================
// Duration Window
// ============================================================================

/// The most recent durations, plus extremes over every sample seen.
#[derive(Debug, Clone, Default)]
pub struct DurationWindow {
    recent: VecDeque<Duration>,
    seen: u64,
    shortest: Option<Duration>,
    longest: Duration,
}

/// Serializable digest of a window, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingSummary {
    pub samples: u64,
    pub mean_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

impl DurationWindow {
    pub fn push(&mut self, sample: Duration) {
        if self.recent.len() == WINDOW_LEN {
            self.recent.pop_front();
        }
        self.recent.push_back(sample);
        self.seen += 1;
        self.longest = self.longest.max(sample);
        self.shortest = Some(self.shortest.map_or(sample, |s| s.min(sample)));
    }

    /// Samples pushed over the window's lifetime
    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    /// Mean of the retained samples
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.recent.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(n) => self.recent.iter().sum::<Duration>() / n,
        }
    }

    /// Nearest-rank percentile of the retained samples, `pct` in 0..=100
    pub fn percentile(&self, pct: f64) -> Duration {
        let mut sorted: Vec<Duration> = self.recent.iter().copied().collect();
        sorted.sort_unstable();
        let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
        let index = rank.clamp(1, sorted.len().max(1)) - 1;
        sorted.get(index).copied().unwrap_or(Duration::ZERO)
    }

    pub fn shortest(&self) -> Duration {
        self.shortest.unwrap_or(Duration::ZERO)
    }

    pub fn longest(&self) -> Duration {
        self.longest
    }

    pub fn summary(&self) -> TimingSummary {
        TimingSummary {
            samples: self.seen,
            mean_ms: as_ms(self.mean()),
            p95_ms: as_ms(self.percentile(95.0)),
            max_ms: as_ms(self.longest),
        }
    }
}

fn as_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

// ============================================================================
// Refresh Timings
// ============================================================================

/// Fetch durations of one provider, with failure and slow-fetch counts.
#[derive(Debug, Clone, Default)]
pub struct RefreshTimings {
    pub fetches: DurationWindow,
    pub failures: u64,
    /// Fetches that took longer than [`SLOW_REFRESH`]
    pub slow: u64,
    pub last: Option<Duration>,
}

impl RefreshTimings {
    pub fn record(&mut self, elapsed: Duration, succeeded: bool) {
        self.fetches.push(elapsed);
        self.last = Some(elapsed);
        if !succeeded {
            self.failures += 1;
        }
        if elapsed > SLOW_REFRESH {
            self.slow += 1;
            warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                limit_ms = SLOW_REFRESH.as_millis() as u64,
                succeeded,
                "Slow sheet refresh"
            );
        }
    }
}

// ============================================================================
// Stage Timer
// ============================================================================

/// Logs a stage that overran its budget when dropped.
pub struct StageTimer {
    stage: &'static str,
    started: Instant,
    budget: Duration,
}

impl StageTimer {
    pub fn start(stage: &'static str, budget: Duration) -> Self {
        Self {
            stage,
            started: Instant::now(),
            budget,
        }
    }

    pub fn stage(&self) -> &'static str {
        self.stage
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if elapsed > self.budget {
            warn!(
                stage = self.stage,
                elapsed_us = elapsed.as_micros() as u64,
                budget_us = self.budget.as_micros() as u64,
                "Stage over budget"
            );
        }
    }
}
