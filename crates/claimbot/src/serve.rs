// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `claimbot run` and `claimbot once` command implementation.
//!
//! Connects the bridge gateway, wires the ledger, status sink and scheduler
//! into a [`ClaimLoop`], and drives it until shutdown (or for one round).

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use claimbot_agent::{
    ClaimCycle, ClaimLoop, CycleSettings, GatewayStatusSink, Scheduler, StatusReporter,
    SystemdWatchdog, install_signal_handler,
};
use claimbot_bridge::BridgeGateway;
use claimbot_config::model::{ClaimbotConfig, SinkKind};
use claimbot_core::{
    ClaimLedger, ClaimbotError, Clock, HealthStatus, MessagingGateway, StatusSink, SystemClock,
};
use claimbot_ledger::CsvLedger;
use claimbot_telegram::TelegramStatusSink;

/// How long the claim loop is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Rounds until SIGINT/SIGTERM.
    Forever,
    /// A single round without waiting.
    Once,
}

/// Runs the `claimbot run` / `claimbot once` command.
pub async fn run_serve(config: ClaimbotConfig, mode: RunMode) -> Result<(), ClaimbotError> {
    init_tracing(&config.agent.log_level);

    info!(
        agent = %config.agent.name,
        targets = config.targets.len(),
        ledger = %config.ledger.directory,
        ?mode,
        "starting claimbot"
    );

    let mut bridge = BridgeGateway::new(&config.gateway)?;
    bridge.connect().await?;
    let gateway: Arc<dyn MessagingGateway> = Arc::new(bridge);

    match gateway.health_check().await {
        Ok(HealthStatus::Healthy) => {}
        Ok(status) => warn!(?status, "bridge reports reduced health"),
        Err(e) => warn!(error = %e, "bridge health check failed"),
    }

    let sink = build_sink(&config, gateway.clone()).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ledger: Arc<dyn ClaimLedger> =
        Arc::new(CsvLedger::new(config.ledger.directory.clone(), clock.clone()));
    let cycle = ClaimCycle::new(
        gateway,
        ledger.clone(),
        clock.clone(),
        CycleSettings::from_config(&config.cycle),
    );
    let scheduler = Scheduler::from_config(&config.schedule, Arc::new(SystemdWatchdog));
    let claim_loop = ClaimLoop::new(
        config.targets(),
        cycle,
        ledger,
        clock,
        StatusReporter::new(sink),
        scheduler,
        Duration::from_secs(config.schedule.inter_target_pause_secs),
    );

    let cancel = install_signal_handler();
    notify_ready();

    let result = match mode {
        RunMode::Forever => claim_loop.run(cancel).await,
        RunMode::Once => claim_loop.run_round(&cancel).await.map(|round| {
            info!(
                claimed = round.successes(),
                targets = round.outcomes.len(),
                "single round complete"
            );
        }),
    };

    notify_stopping();
    info!("claimbot stopped");
    result
}

/// Builds the secondary status channel selected by `[status] sink`.
async fn build_sink(
    config: &ClaimbotConfig,
    gateway: Arc<dyn MessagingGateway>,
) -> Result<Option<Arc<dyn StatusSink>>, ClaimbotError> {
    let status = &config.status;
    match status.sink {
        SinkKind::None => {
            info!("status sink disabled, results go to the local log only");
            Ok(None)
        }
        SinkKind::Gateway => {
            let chat = status.log_sink_id.clone().ok_or_else(|| {
                ClaimbotError::Config("status.log_sink_id is required for the gateway sink".into())
            })?;
            info!(chat = %chat, "status lines go through the bridge session");
            Ok(Some(
                Arc::new(GatewayStatusSink::new(gateway, chat)) as Arc<dyn StatusSink>
            ))
        }
        SinkKind::Telegram => {
            let sink = TelegramStatusSink::new(status)?;
            match sink.health_check().await {
                HealthStatus::Healthy => info!("telegram status sink ready"),
                other => warn!(status = ?other, "telegram status sink is not reachable yet"),
            }
            Ok(Some(Arc::new(sink) as Arc<dyn StatusSink>))
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("claimbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(unix)]
fn notify_ready() {
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        tracing::debug!(error = %e, "sd_notify READY failed");
    }
}

#[cfg(not(unix))]
fn notify_ready() {}

#[cfg(unix)]
fn notify_stopping() {
    if let Err(e) = sd_notify::notify(false, &[sd_notify::NotifyState::Stopping]) {
        tracing::debug!(error = %e, "sd_notify STOPPING failed");
    }
}

#[cfg(not(unix))]
fn notify_stopping() {}
