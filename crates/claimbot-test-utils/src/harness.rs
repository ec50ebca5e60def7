// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness wiring a claim loop to mocks and a temp ledger.
//!
//! Durations default to milliseconds so whole cycles run in well under a
//! second with the real tokio timer.

use std::sync::Arc;
use std::time::Duration;

use claimbot_agent::scheduler::MIN_BASE_INTERVAL;
use claimbot_agent::{ClaimCycle, ClaimLoop, CycleSettings, Liveness, Scheduler, StatusReporter};
use claimbot_config::model::UnknownCooldown;
use claimbot_core::{ClaimbotError, StatusSink, Target};
use claimbot_ledger::CsvLedger;

use crate::clock::FakeClock;
use crate::mock_gateway::MockGateway;
use crate::mock_sink::MockSink;

/// Liveness receiver that ignores every signal.
struct NoLiveness;

impl Liveness for NoLiveness {
    fn alive(&self, _remaining: Duration) {}
}

/// Fast cycle settings for tests: 300 ms poll timeout, 10 ms ticks.
pub fn fast_settings() -> CycleSettings {
    CycleSettings {
        cooldown_window: Duration::from_secs(3600),
        poll_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(10),
        history_limit: 5,
        settle_delay: Duration::from_millis(10),
        unknown_cooldown: UnknownCooldown::FullWindow,
    }
}

/// A target named after `id`, pressing "Hourly Bonus".
pub fn target(id: &str) -> Target {
    Target {
        id: id.to_string(),
        handle: format!("{id}_bot"),
        trigger_text: "/start".to_string(),
        button_label: "Hourly Bonus".to_string(),
        namespace: id.to_string(),
    }
}

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    targets: Vec<Target>,
    settings: CycleSettings,
    inter_target_pause: Duration,
    with_sink: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            targets: Vec::new(),
            settings: fast_settings(),
            inter_target_pause: Duration::from_millis(5),
            with_sink: true,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_settings(mut self, settings: CycleSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_inter_target_pause(mut self, pause: Duration) -> Self {
        self.inter_target_pause = pause;
        self
    }

    /// Report to the local log only.
    pub fn without_sink(mut self) -> Self {
        self.with_sink = false;
        self
    }

    pub fn build(self) -> Result<TestHarness, ClaimbotError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| ClaimbotError::Ledger {
            source: Box::new(e),
        })?;

        let clock = Arc::new(FakeClock::default());
        let gateway = Arc::new(MockGateway::new(clock.clone()));
        let ledger = Arc::new(CsvLedger::new(temp_dir.path().join("ledger"), clock.clone()));
        let sink = Arc::new(MockSink::new());

        Ok(TestHarness {
            targets: self.targets,
            settings: self.settings,
            inter_target_pause: self.inter_target_pause,
            with_sink: self.with_sink,
            clock,
            gateway,
            ledger,
            sink,
            _temp_dir: temp_dir,
        })
    }
}

/// Mocks, a temp-dir ledger, and factories for the cycle and loop.
pub struct TestHarness {
    pub targets: Vec<Target>,
    pub settings: CycleSettings,
    pub inter_target_pause: Duration,
    with_sink: bool,
    pub clock: Arc<FakeClock>,
    pub gateway: Arc<MockGateway>,
    pub ledger: Arc<CsvLedger>,
    pub sink: Arc<MockSink>,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A claim cycle over the harness mocks.
    pub fn cycle(&self) -> ClaimCycle {
        ClaimCycle::new(
            self.gateway.clone(),
            self.ledger.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }

    /// A claim loop over every configured target.
    pub fn claim_loop(&self) -> ClaimLoop {
        let reporter = if self.with_sink {
            StatusReporter::new(Some(self.sink.clone() as Arc<dyn StatusSink>))
        } else {
            StatusReporter::local_only()
        };
        let scheduler = Scheduler::new(
            MIN_BASE_INTERVAL,
            Duration::ZERO,
            Duration::from_secs(60),
            Arc::new(NoLiveness),
        );
        ClaimLoop::new(
            self.targets.clone(),
            self.cycle(),
            self.ledger.clone(),
            self.clock.clone(),
            reporter,
            scheduler,
            self.inter_target_pause,
        )
    }
}
