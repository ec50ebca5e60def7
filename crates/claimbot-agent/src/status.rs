// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable status lines and their optional secondary channel.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use claimbot_core::{
    ClaimbotError, CycleResult, HealthStatus, MessagingGateway, StatusSink, Target,
};

use crate::cycle::CycleReport;

/// Ledger figures attached to a successful claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimStats {
    pub sequence: u64,
    pub weekly_total: f64,
}

/// Result line for one target, as posted to the status sink.
pub fn result_line(target: &Target, report: &CycleReport, stats: Option<ClaimStats>) -> String {
    match (&report.result, stats) {
        (CycleResult::Success { currency, .. }, Some(stats)) => format!(
            "[{}] {} (claim #{}, 7-day total {} {currency})",
            target.id,
            report.result.describe(),
            stats.sequence,
            stats.weekly_total,
        ),
        _ => format!("[{}] {}", target.id, report.result.describe()),
    }
}

/// Fans status lines out to the local log and, if configured, a sink.
///
/// Sink failures are logged and swallowed.
#[derive(Clone, Default)]
pub struct StatusReporter {
    sink: Option<Arc<dyn StatusSink>>,
}

impl StatusReporter {
    pub fn new(sink: Option<Arc<dyn StatusSink>>) -> Self {
        Self { sink }
    }

    pub fn local_only() -> Self {
        Self::default()
    }

    pub async fn post(&self, line: &str) {
        let Some(sink) = &self.sink else {
            return;
        };
        if let Err(e) = sink.post(line).await {
            warn!(sink = sink.name(), error = %e, "failed to forward status line");
        }
    }

    /// Log the result of one cycle and forward it.
    pub async fn cycle_finished(
        &self,
        target: &Target,
        report: &CycleReport,
        stats: Option<ClaimStats>,
    ) {
        let line = result_line(target, report, stats);
        match &report.result {
            CycleResult::TransportError { detail } => warn!(
                target_id = %target.id,
                result = report.result.kind(),
                reached = %report.reached,
                detail = %detail,
                "{line}"
            ),
            CycleResult::RemoteCooldown { remaining } | CycleResult::LocalCooldown { remaining } => {
                info!(
                    target_id = %target.id,
                    result = report.result.kind(),
                    reached = %report.reached,
                    remaining_secs = remaining.as_secs(),
                    "{line}"
                )
            }
            _ => info!(
                target_id = %target.id,
                result = report.result.kind(),
                reached = %report.reached,
                pressed = report.pressed,
                "{line}"
            ),
        }
        self.post(&line).await;
    }

    /// Forward a line about a cycle that failed with an error.
    pub async fn cycle_failed(&self, target: &Target, error: &ClaimbotError) {
        self.post(&format!("[{}] cycle failed: {error}", target.id))
            .await;
    }
}

/// Status sink that writes into a chat through the messaging gateway session.
pub struct GatewayStatusSink {
    gateway: Arc<dyn MessagingGateway>,
    chat: String,
}

impl GatewayStatusSink {
    pub fn new(gateway: Arc<dyn MessagingGateway>, chat: impl Into<String>) -> Self {
        Self {
            gateway,
            chat: chat.into(),
        }
    }
}

#[async_trait]
impl StatusSink for GatewayStatusSink {
    fn name(&self) -> &str {
        "gateway"
    }

    async fn post(&self, text: &str) -> Result<(), ClaimbotError> {
        if let Ok(HealthStatus::Unhealthy(reason)) = self.gateway.health_check().await {
            return Err(ClaimbotError::Notify {
                message: format!("gateway unhealthy: {reason}"),
                source: None,
            });
        }
        self.gateway
            .send_message(&self.chat, text)
            .await
            .map(|_| ())
            .map_err(|e| ClaimbotError::Notify {
                message: format!("could not post to {}", self.chat),
                source: Some(Box::new(e)),
            })
    }
}
