// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inter-round pacing with jitter and liveness signalling.
//!
//! The wait between rounds is `base + uniform(0, jitter)`. It is slept in
//! bounded slices; after each slice the remaining time is logged and a
//! liveness signal is emitted so a supervisor can tell a long sleep from a
//! hung process. Cancellation ends the wait immediately.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use claimbot_config::model::ScheduleConfig;
use claimbot_core::types::format_duration;

/// Smallest base interval the scheduler accepts.
pub const MIN_BASE_INTERVAL: Duration = Duration::from_secs(50 * 60);

/// Receiver of the per-slice "still alive" signal.
pub trait Liveness: Send + Sync {
    fn alive(&self, remaining: Duration);
}

/// Pings the systemd watchdog. Outside systemd the ping is a no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemdWatchdog;

impl Liveness for SystemdWatchdog {
    #[cfg(unix)]
    fn alive(&self, _remaining: Duration) {
        if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Watchdog]) {
            debug!(error = %e, "watchdog ping failed");
        }
    }

    #[cfg(not(unix))]
    fn alive(&self, _remaining: Duration) {}
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Elapsed,
    Cancelled,
}

/// Computes and sleeps the delay between rounds.
pub struct Scheduler {
    base_interval: Duration,
    jitter_max: Duration,
    slice: Duration,
    liveness: Arc<dyn Liveness>,
}

impl Scheduler {
    /// Build a scheduler, raising `base_interval` to [`MIN_BASE_INTERVAL`]
    /// when it is shorter.
    pub fn new(
        base_interval: Duration,
        jitter_max: Duration,
        slice: Duration,
        liveness: Arc<dyn Liveness>,
    ) -> Self {
        let base_interval = if base_interval < MIN_BASE_INTERVAL {
            warn!(
                configured = %format_duration(base_interval),
                floor = %format_duration(MIN_BASE_INTERVAL),
                "base interval is below the floor; raising it"
            );
            MIN_BASE_INTERVAL
        } else {
            base_interval
        };

        Self {
            base_interval,
            jitter_max,
            slice: slice.max(Duration::from_millis(1)),
            liveness,
        }
    }

    pub fn from_config(config: &ScheduleConfig, liveness: Arc<dyn Liveness>) -> Self {
        Self::new(
            Duration::from_secs(config.base_interval_minutes.saturating_mul(60)),
            Duration::from_secs(config.jitter_seconds_max),
            Duration::from_secs(config.liveness_slice_secs),
            liveness,
        )
    }

    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Base interval plus a fresh uniform jitter in whole seconds.
    pub fn next_delay(&self) -> Duration {
        let jitter = rand::thread_rng().gen_range(0..=self.jitter_max.as_secs());
        self.base_interval.saturating_add(Duration::from_secs(jitter))
    }

    /// Sleep `delay` in slices, signalling liveness after each one.
    pub async fn wait(&self, delay: Duration, cancel: &CancellationToken) -> WaitOutcome {
        let mut remaining = delay;
        while !remaining.is_zero() {
            let step = self.slice.min(remaining);
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(remaining = %format_duration(remaining), "wait interrupted by shutdown");
                    return WaitOutcome::Cancelled;
                }
                _ = tokio::time::sleep(step) => {}
            }
            remaining -= step;
            self.liveness.alive(remaining);
            if !remaining.is_zero() {
                info!(remaining = %format_duration(remaining), "waiting for next round");
            }
        }
        WaitOutcome::Elapsed
    }
}
