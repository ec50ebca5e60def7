// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim orchestration for claimbot.
//!
//! The [`ClaimLoop`] is the target dispatcher. Each round it:
//! - Runs one [`ClaimCycle`] per configured target, strictly in order
//! - Pauses between targets
//! - Reports every result locally and to the status sink
//! - Hands over to the [`Scheduler`] for the jittered wait before the next round
//!
//! A failed cycle never aborts the round; only an authentication failure
//! stops the loop.

pub mod cycle;
pub mod scheduler;
pub mod shutdown;
pub mod status;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use claimbot_core::types::format_duration;
use claimbot_core::{ClaimLedger, ClaimbotError, Clock, CycleResult, Target};

pub use cycle::{ClaimCycle, CycleReport, CycleSettings};
pub use scheduler::{Liveness, Scheduler, SystemdWatchdog, WaitOutcome};
pub use shutdown::install_signal_handler;
pub use status::{ClaimStats, GatewayStatusSink, StatusReporter};

/// How one target's turn in a round ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    Finished(CycleResult),
    Failed(String),
}

impl TargetOutcome {
    fn summary(&self) -> String {
        match self {
            TargetOutcome::Finished(CycleResult::Success { amount, currency }) => {
                format!("success ({amount} {currency})")
            }
            TargetOutcome::Finished(
                result @ (CycleResult::RemoteCooldown { remaining }
                | CycleResult::LocalCooldown { remaining }),
            ) => format!("{} ({})", result.kind(), format_duration(*remaining)),
            TargetOutcome::Finished(result) => result.kind().to_string(),
            TargetOutcome::Failed(_) => "failed".to_string(),
        }
    }
}

/// Results of one pass over the target list, in target order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundReport {
    pub outcomes: Vec<(String, TargetOutcome)>,
}

impl RoundReport {
    /// Number of targets that ended in `Success`.
    pub fn successes(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, TargetOutcome::Finished(CycleResult::Success { .. })))
            .count()
    }

    /// One line covering every target, e.g.
    /// `round finished: 1/2 claimed | ltc: success (0.5 LTC) | doge: remote_cooldown (12m 00s)`.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "round finished: {}/{} claimed",
            self.successes(),
            self.outcomes.len()
        );
        for (id, outcome) in &self.outcomes {
            line.push_str(&format!(" | {id}: {}", outcome.summary()));
        }
        line
    }
}

/// Dispatches claim cycles over all targets, round after round.
pub struct ClaimLoop {
    targets: Vec<Target>,
    cycle: ClaimCycle,
    ledger: Arc<dyn ClaimLedger>,
    clock: Arc<dyn Clock>,
    reporter: StatusReporter,
    scheduler: Scheduler,
    inter_target_pause: Duration,
}

impl ClaimLoop {
    pub fn new(
        targets: Vec<Target>,
        cycle: ClaimCycle,
        ledger: Arc<dyn ClaimLedger>,
        clock: Arc<dyn Clock>,
        reporter: StatusReporter,
        scheduler: Scheduler,
        inter_target_pause: Duration,
    ) -> Self {
        Self {
            targets,
            cycle,
            ledger,
            clock,
            reporter,
            scheduler,
            inter_target_pause,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Run rounds until cancelled.
    ///
    /// Returns `Err` only for fatal errors (authentication).
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), ClaimbotError> {
        info!(targets = self.targets.len(), "claim loop running");

        loop {
            self.run_round(&cancel).await?;
            if cancel.is_cancelled() {
                break;
            }

            let delay = self.scheduler.next_delay();
            let jitter = delay.saturating_sub(self.scheduler.base_interval());
            let next_run = chrono::TimeDelta::from_std(delay)
                .ok()
                .and_then(|d| self.clock.now().checked_add_signed(d))
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "out of range".to_string());
            info!(
                sleep_secs = delay.as_secs(),
                jitter_secs = jitter.as_secs(),
                next_run = %next_run,
                "sleeping until next round"
            );

            if self.scheduler.wait(delay, &cancel).await == WaitOutcome::Cancelled {
                break;
            }
        }

        info!("claim loop stopped");
        Ok(())
    }

    /// Run every target once, in order.
    pub async fn run_round(&self, cancel: &CancellationToken) -> Result<RoundReport, ClaimbotError> {
        let mut round = RoundReport::default();

        for (index, target) in self.targets.iter().enumerate() {
            if index > 0 && !self.pause(cancel).await {
                break;
            }
            if cancel.is_cancelled() {
                break;
            }

            let outcome = match self.cycle.run(target, cancel).await {
                Ok(report) => {
                    let stats = self.stats_for(target, &report.result).await;
                    self.reporter.cycle_finished(target, &report, stats).await;
                    TargetOutcome::Finished(report.result)
                }
                Err(e) if e.is_fatal() => {
                    error!(target_id = %target.id, error = %e, "fatal error, stopping");
                    self.reporter.cycle_failed(target, &e).await;
                    return Err(e);
                }
                Err(e) => {
                    error!(target_id = %target.id, error = %e, "claim cycle failed");
                    self.reporter.cycle_failed(target, &e).await;
                    TargetOutcome::Failed(e.to_string())
                }
            };

            let cancelled = matches!(outcome, TargetOutcome::Finished(CycleResult::Cancelled));
            round.outcomes.push((target.id.clone(), outcome));
            if cancelled {
                break;
            }
        }

        let line = round.summary_line();
        info!("{line}");
        self.reporter.post(&line).await;
        Ok(round)
    }

    /// Sleep the inter-target pause; `false` if shutdown arrived first.
    async fn pause(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.inter_target_pause) => true,
        }
    }

    /// Sequence number and weekly total after a success; `None` otherwise
    /// or when the ledger cannot be read.
    async fn stats_for(&self, target: &Target, result: &CycleResult) -> Option<ClaimStats> {
        if !matches!(result, CycleResult::Success { .. }) {
            return None;
        }

        let sequence = self.ledger.sequence_number(&target.namespace).await;
        let weekly_total = self.ledger.weekly_total(&target.namespace).await;
        match (sequence, weekly_total) {
            (Ok(sequence), Ok(weekly_total)) => Some(ClaimStats {
                sequence,
                weekly_total,
            }),
            (Err(e), _) | (_, Err(e)) => {
                warn!(target_id = %target.id, error = %e, "could not read ledger stats");
                None
            }
        }
    }
}
