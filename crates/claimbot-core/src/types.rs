// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the classifier, ledger, orchestrator, and gateways.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// One remote chat entity to claim from.
///
/// Built once at startup from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Stable identifier used in logs and status lines.
    pub id: String,
    /// Chat handle (username or numeric id) understood by the gateway.
    pub handle: String,
    /// Outbound text that provokes the reply carrying the claim control.
    pub trigger_text: String,
    /// Case-insensitive substring of the control label to press.
    /// Empty means "the first control".
    pub button_label: String,
    /// Ledger namespace; records for different namespaces never mix.
    pub namespace: String,
}

/// A labeled, pressable control attached to a received message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub label: String,
}

impl Control {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// Opaque address of a control, handed back to the gateway to press it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRef {
    pub message_id: String,
    pub row: usize,
    pub col: usize,
}

/// A message observed in a target's chat history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Gateway-assigned message identifier.
    pub id: String,
    /// Raw message text (may contain invisible characters).
    pub text: String,
    /// When the remote side posted the message.
    pub timestamp: DateTime<Utc>,
    /// Inline controls, row by row.
    pub controls: Vec<Vec<Control>>,
}

impl ChatMessage {
    /// Address of the control at `(row, col)` on this message.
    pub fn control_ref(&self, row: usize, col: usize) -> ControlRef {
        ControlRef {
            message_id: self.id.clone(),
            row,
            col,
        }
    }
}

/// Acknowledgement returned by the gateway after sending a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub id: String,
    /// Server-side send time; the reference instant for the cycle.
    pub sent_at: DateTime<Utc>,
}

/// Semantic interpretation of one observed message.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    /// The service confirmed a payout.
    RewardGranted { amount: f64, currency: String },
    /// The service reported a cooldown; `None` when only a marker was seen.
    CooldownActive { remaining: Option<Duration> },
    /// The message carries a control matching the configured label.
    ActionableControl { label: String, row: usize, col: usize },
    /// Nothing the cycle can act on.
    Irrelevant,
}

/// States of the claim cycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum CycleState {
    Start,
    CooldownGate,
    Triggered,
    Polling,
    Pressed,
    Finished,
}

/// Outcome of one claim cycle. Only `Success` is ever persisted.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CycleResult {
    Success { amount: f64, currency: String },
    RemoteCooldown { remaining: Duration },
    LocalCooldown { remaining: Duration },
    NoActionableMessage,
    TransportError { detail: String },
    /// Shutdown arrived while the cycle was suspended.
    Cancelled,
}

impl CycleResult {
    /// Short snake_case label for structured logging.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Human-readable one-line description.
    pub fn describe(&self) -> String {
        match self {
            CycleResult::Success { amount, currency } => {
                format!("claimed {amount} {currency}")
            }
            CycleResult::RemoteCooldown { remaining } => {
                format!("remote cooldown, {} left", format_duration(*remaining))
            }
            CycleResult::LocalCooldown { remaining } => {
                format!("local cooldown, {} left", format_duration(*remaining))
            }
            CycleResult::NoActionableMessage => "no actionable message".to_string(),
            CycleResult::TransportError { detail } => format!("transport error: {detail}"),
            CycleResult::Cancelled => "cancelled by shutdown".to_string(),
        }
    }
}

/// One persisted successful claim.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRecord {
    pub timestamp: DateTime<Utc>,
    pub amount: f64,
}

/// Health status reported by gateways and sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Format a duration as `1h 02m 05s` / `38m 25s` / `12s`.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{hours}h {minutes:02}m {seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
