// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The claim cycle state machine.
//!
//! One cycle takes one target from the local cooldown gate through the
//! trigger message and a bounded polling loop to a terminal
//! [`CycleResult`]:
//!
//! ```text
//! Start -> CooldownGate -> Triggered -> Polling [-> Pressed] -> Finished
//! ```
//!
//! A control is pressed at most once per cycle. Shutdown interrupts every
//! wait and every in-flight gateway call. A cooldown or reward seen in
//! any fresh message of a poll takes precedence over an actionable control.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use claimbot_classifier::MessageClassifier;
use claimbot_config::model::{CycleConfig, UnknownCooldown};
use claimbot_core::{
    ChatMessage, ClaimLedger, ClaimbotError, ClassifiedEvent, Clock, ControlRef, CycleResult,
    CycleState, MessagingGateway, Target,
};

/// Polling bound used when the configured timeout does not fit an `Instant`.
const MAX_POLL_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Timing knobs of a single cycle.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    pub cooldown_window: Duration,
    pub poll_timeout: Duration,
    pub poll_interval: Duration,
    pub history_limit: usize,
    pub settle_delay: Duration,
    pub unknown_cooldown: UnknownCooldown,
}

impl CycleSettings {
    pub fn from_config(config: &CycleConfig) -> Self {
        Self {
            cooldown_window: Duration::from_secs(config.cooldown_window_secs),
            poll_timeout: Duration::from_secs(config.poll_timeout_secs),
            poll_interval: Duration::from_secs(config.poll_interval_secs),
            history_limit: config.history_limit,
            settle_delay: Duration::from_secs(config.settle_delay_secs),
            unknown_cooldown: config.unknown_cooldown,
        }
    }

    /// Remaining time assumed when the remote side gives none.
    fn unknown_remaining(&self) -> Duration {
        match self.unknown_cooldown {
            UnknownCooldown::FullWindow => self.cooldown_window,
            UnknownCooldown::Zero => Duration::ZERO,
        }
    }
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self::from_config(&CycleConfig::default())
    }
}

/// Terminal result of a cycle plus the furthest state it reached.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub result: CycleResult,
    pub reached: CycleState,
    pub pressed: bool,
}

/// What one poll's worth of fresh messages amounted to.
enum PollVerdict {
    Cooldown(Option<Duration>),
    Reward { amount: f64, currency: String },
    Actionable { control: ControlRef, label: String },
    Nothing,
}

/// Drives claim cycles against injected gateway, ledger, and clock.
pub struct ClaimCycle {
    gateway: Arc<dyn MessagingGateway>,
    ledger: Arc<dyn ClaimLedger>,
    clock: Arc<dyn Clock>,
    settings: CycleSettings,
}

/// Mutable per-run bookkeeping.
struct Run<'a> {
    target: &'a Target,
    state: CycleState,
    pressed: bool,
}

impl Run<'_> {
    fn transition(&mut self, next: CycleState) {
        debug!(
            target_id = %self.target.id,
            from = %self.state,
            to = %next,
            "cycle state transition"
        );
        self.state = next;
    }

    fn finish(mut self, result: CycleResult) -> CycleReport {
        let reached = self.state;
        self.transition(CycleState::Finished);
        CycleReport {
            result,
            reached,
            pressed: self.pressed,
        }
    }

    /// Map a gateway failure to a terminal result; `Auth` stays an error.
    fn fault(self, op: &str, err: ClaimbotError) -> Result<CycleReport, ClaimbotError> {
        if err.is_fatal() {
            return Err(err);
        }
        let detail = match err {
            ClaimbotError::Transport {
                message,
                source: Some(source),
            } => format!("{op}: {message}: {source}"),
            ClaimbotError::Transport {
                message,
                source: None,
            } => format!("{op}: {message}"),
            other => format!("{op}: {other}"),
        };
        Ok(self.finish(CycleResult::TransportError { detail }))
    }
}

impl ClaimCycle {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        ledger: Arc<dyn ClaimLedger>,
        clock: Arc<dyn Clock>,
        settings: CycleSettings,
    ) -> Self {
        Self {
            gateway,
            ledger,
            clock,
            settings,
        }
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Run one complete cycle for `target`.
    ///
    /// Gateway faults end the cycle as [`CycleResult::TransportError`].
    /// `Auth` failures and ledger I/O errors are returned as `Err`.
    pub async fn run(
        &self,
        target: &Target,
        cancel: &CancellationToken,
    ) -> Result<CycleReport, ClaimbotError> {
        let mut run = Run {
            target,
            state: CycleState::Start,
            pressed: false,
        };

        if cancel.is_cancelled() {
            return Ok(run.finish(CycleResult::Cancelled));
        }

        run.transition(CycleState::CooldownGate);
        if let Some(remaining) = self.local_cooldown(target).await? {
            return Ok(run.finish(CycleResult::LocalCooldown { remaining }));
        }

        let sent = match interruptible(
            cancel,
            self.gateway.send_message(&target.handle, &target.trigger_text),
        )
        .await
        {
            None => return Ok(run.finish(CycleResult::Cancelled)),
            Some(Ok(sent)) => sent,
            Some(Err(e)) => return run.fault("send", e),
        };
        run.transition(CycleState::Triggered);
        debug!(target_id = %target.id, message_id = %sent.id, sent_at = %sent.sent_at, "trigger sent");

        run.transition(CycleState::Polling);
        let classifier = MessageClassifier::new(&target.button_label);
        let started = Instant::now();
        let deadline = started
            .checked_add(self.settings.poll_timeout)
            .unwrap_or(started + MAX_POLL_WINDOW);
        let mut wait = self.settings.poll_interval;

        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let sleep = wait.min(deadline - now);
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Ok(run.finish(CycleResult::Cancelled));
                }
                _ = tokio::time::sleep(sleep) => {}
            }

            let messages = match interruptible(
                cancel,
                self.gateway
                    .fetch_recent_messages(&target.handle, self.settings.history_limit),
            )
            .await
            {
                None => return Ok(run.finish(CycleResult::Cancelled)),
                Some(Ok(messages)) => messages,
                Some(Err(e)) => return run.fault("fetch", e),
            };

            wait = self.settings.poll_interval;
            match judge(&classifier, &messages, sent.sent_at) {
                PollVerdict::Cooldown(remaining) => {
                    let remaining = remaining.unwrap_or_else(|| self.settings.unknown_remaining());
                    return Ok(run.finish(CycleResult::RemoteCooldown { remaining }));
                }
                PollVerdict::Reward { amount, currency } => {
                    self.ledger.record_claim(&target.namespace, amount).await?;
                    return Ok(run.finish(CycleResult::Success { amount, currency }));
                }
                PollVerdict::Actionable { control, label } if !run.pressed => {
                    match interruptible(cancel, self.gateway.press_control(&target.handle, &control))
                        .await
                    {
                        None => return Ok(run.finish(CycleResult::Cancelled)),
                        Some(Err(e)) => return run.fault("press", e),
                        Some(Ok(())) => {}
                    }
                    run.pressed = true;
                    run.transition(CycleState::Pressed);
                    info!(target_id = %target.id, label = %label, message_id = %control.message_id, "pressed control");
                    wait = self.settings.settle_delay;
                }
                PollVerdict::Actionable { .. } | PollVerdict::Nothing => {}
            }
        }

        Ok(run.finish(CycleResult::NoActionableMessage))
    }

    /// Remaining local cooldown, or `None` if the gate is open.
    async fn local_cooldown(&self, target: &Target) -> Result<Option<Duration>, ClaimbotError> {
        let Some(last) = self.ledger.last_claim_time(&target.namespace).await? else {
            return Ok(None);
        };

        // A record stamped in the future counts as just claimed.
        let elapsed = (self.clock.now() - last).to_std().unwrap_or(Duration::ZERO);
        if elapsed < self.settings.cooldown_window {
            Ok(Some(self.settings.cooldown_window - elapsed))
        } else {
            Ok(None)
        }
    }
}

/// Await a gateway call unless shutdown arrives first.
async fn interruptible<T>(cancel: &CancellationToken, call: impl Future<Output = T>) -> Option<T> {
    tokio::select! {
        _ = cancel.cancelled() => None,
        out = call => Some(out),
    }
}

/// Classify the messages newer than `since`, newest first.
///
/// The first cooldown or reward wins outright; otherwise the newest
/// actionable control is returned.
fn judge(
    classifier: &MessageClassifier,
    messages: &[ChatMessage],
    since: DateTime<Utc>,
) -> PollVerdict {
    let mut fresh: Vec<&ChatMessage> = messages.iter().filter(|m| m.timestamp >= since).collect();
    fresh.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut actionable = None;
    for message in fresh {
        match classifier.classify(message) {
            ClassifiedEvent::CooldownActive { remaining } => return PollVerdict::Cooldown(remaining),
            ClassifiedEvent::RewardGranted { amount, currency }
                if amount.is_finite() && amount > 0.0 =>
            {
                return PollVerdict::Reward { amount, currency };
            }
            ClassifiedEvent::ActionableControl { label, row, col } if actionable.is_none() => {
                actionable = Some(PollVerdict::Actionable {
                    control: message.control_ref(row, col),
                    label,
                });
            }
            _ => {}
        }
    }

    actionable.unwrap_or(PollVerdict::Nothing)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use claimbot_core::Control;

    use super::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn msg(id: &str, text: &str, offset_secs: i64, controls: &[&str]) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            text: text.to_string(),
            timestamp: t0() + chrono::TimeDelta::seconds(offset_secs),
            controls: if controls.is_empty() {
                Vec::new()
            } else {
                vec![controls.iter().map(|l| Control::new(*l)).collect()]
            },
        }
    }

    #[test]
    fn stale_messages_are_ignored() {
        let c = MessageClassifier::new("Hourly Bonus");
        let messages = vec![msg("1", "You received 1 LTC", -5, &[])];
        assert!(matches!(judge(&c, &messages, t0()), PollVerdict::Nothing));
    }

    #[test]
    fn cooldown_anywhere_beats_newer_control() {
        let c = MessageClassifier::new("Hourly Bonus");
        let messages = vec![
            msg("3", "menu", 3, &["Hourly Bonus"]),
            msg("2", "🚫 after 5 minutes", 2, &[]),
        ];
        assert!(matches!(
            judge(&c, &messages, t0()),
            PollVerdict::Cooldown(Some(d)) if d == Duration::from_secs(300)
        ));
    }

    #[test]
    fn newest_conclusive_message_wins() {
        let c = MessageClassifier::new("Hourly Bonus");
        // Delivered oldest first; judged newest first.
        let messages = vec![
            msg("1", "🚫 already claimed", 1, &[]),
            msg("2", "You received 2 DOGE", 2, &[]),
        ];
        assert!(matches!(
            judge(&c, &messages, t0()),
            PollVerdict::Reward { amount, .. } if amount == 2.0
        ));
    }

    #[test]
    fn actionable_control_addresses_its_message() {
        let c = MessageClassifier::new("bonus");
        let messages = vec![msg("9", "menu", 1, &["Balance", "Hourly Bonus"])];
        match judge(&c, &messages, t0()) {
            PollVerdict::Actionable { control, label } => {
                assert_eq!(control.message_id, "9");
                assert_eq!((control.row, control.col), (0, 1));
                assert_eq!(label, "Hourly Bonus");
            }
            _ => panic!("expected actionable control"),
        }
    }

    #[test]
    fn settings_from_default_config() {
        let s = CycleSettings::default();
        assert_eq!(s.cooldown_window, Duration::from_secs(3600));
        assert_eq!(s.poll_timeout, Duration::from_secs(20));
        assert_eq!(s.poll_interval, Duration::from_secs(1));
        assert_eq!(s.history_limit, 5);
        assert_eq!(s.unknown_remaining(), Duration::from_secs(3600));
    }

    #[test]
    fn zero_policy_for_unknown_cooldown() {
        let s = CycleSettings {
            unknown_cooldown: UnknownCooldown::Zero,
            ..CycleSettings::default()
        };
        assert_eq!(s.unknown_remaining(), Duration::ZERO);
    }
}
