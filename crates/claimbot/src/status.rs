// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `claimbot status` command implementation.
//!
//! Reads each target's ledger file and prints the claim count, the last claim
//! and the trailing 7-day total. Never touches the network, so it works while
//! the bot is stopped.

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use claimbot_config::model::ClaimbotConfig;
use claimbot_core::types::format_duration;
use claimbot_core::{ClaimbotError, Clock, SystemClock};
use claimbot_ledger::{CsvLedger, LedgerSummary};

/// One target's row in the status output.
#[derive(Debug, Serialize)]
pub struct TargetStatus {
    pub id: String,
    pub namespace: String,
    pub claims: u64,
    pub last_claim: Option<DateTime<Utc>>,
    pub last_claim_ago: Option<String>,
    /// Time left before the local cooldown gate lets the target run again.
    pub cooldown_left: Option<String>,
    pub weekly_total: f64,
}

impl TargetStatus {
    fn from_summary(
        id: &str,
        summary: LedgerSummary,
        now: DateTime<Utc>,
        cooldown_window: Duration,
    ) -> Self {
        let elapsed = summary
            .last_claim
            .map(|last| (now - last).to_std().unwrap_or_default());
        let cooldown_left = elapsed
            .map(|elapsed| cooldown_window.saturating_sub(elapsed))
            .filter(|left| !left.is_zero())
            .map(format_duration);

        Self {
            id: id.to_string(),
            namespace: summary.namespace,
            claims: summary.claims,
            last_claim: summary.last_claim,
            last_claim_ago: elapsed.map(format_duration),
            cooldown_left,
            weekly_total: summary.weekly_total,
        }
    }
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub ledger_directory: String,
    pub targets: Vec<TargetStatus>,
}

/// Run the `claimbot status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(
    config: &ClaimbotConfig,
    json: bool,
    plain: bool,
) -> Result<(), ClaimbotError> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let report = collect(config, clock).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_report(&report, use_color);
    }

    Ok(())
}

async fn collect(
    config: &ClaimbotConfig,
    clock: Arc<dyn Clock>,
) -> Result<StatusReport, ClaimbotError> {
    let ledger = CsvLedger::new(config.ledger.directory.clone(), clock.clone());
    let window = Duration::from_secs(config.cycle.cooldown_window_secs);
    let now = clock.now();

    let mut targets = Vec::with_capacity(config.targets.len());
    for target in config.targets() {
        let summary = ledger.summarize(&target.namespace).await?;
        targets.push(TargetStatus::from_summary(&target.id, summary, now, window));
    }

    Ok(StatusReport {
        ledger_directory: config.ledger.directory.clone(),
        targets,
    })
}

fn print_report(report: &StatusReport, use_color: bool) {
    println!();
    println!("  claimbot status");
    println!("  {}", "-".repeat(35));
    println!("    Ledger:   {}", report.ledger_directory);

    for target in &report.targets {
        println!();
        print_target(target, use_color);
    }
    println!();
}

fn print_target(target: &TargetStatus, use_color: bool) {
    let last = match &target.last_claim_ago {
        Some(ago) => format!("{ago} ago"),
        None => "never".to_string(),
    };
    let gate = match &target.cooldown_left {
        Some(left) => format!("cooling down, {left} left"),
        None => "ready".to_string(),
    };

    if use_color {
        use colored::Colorize;
        let gate = if target.cooldown_left.is_some() {
            gate.yellow()
        } else {
            gate.green()
        };
        println!("    {}", target.id.bold());
        println!("      State:    {gate}");
    } else {
        println!("    {}", target.id);
        println!("      State:    {gate}");
    }

    println!("      Claims:   {}", target.claims);
    println!("      Last:     {last}");
    println!("      7 days:   {}", target.weekly_total);
}
