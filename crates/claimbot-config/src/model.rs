// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for claimbot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

use claimbot_core::Target;

/// Top-level claimbot configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimbotConfig {
    /// Process identity and logging.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Inter-round pacing.
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Timing of a single claim cycle.
    #[serde(default)]
    pub cycle: CycleConfig,

    /// Where claim records are stored.
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Messaging gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Secondary status channel.
    #[serde(default)]
    pub status: StatusConfig,

    /// Chats to claim from, processed in order.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

impl ClaimbotConfig {
    /// Domain targets built from the `[[targets]]` entries.
    pub fn targets(&self) -> Vec<Target> {
        self.targets.iter().map(TargetConfig::to_target).collect()
    }
}

/// Process identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in status lines.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "claimbot".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Pacing between rounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Base spacing between rounds. Values under 50 are raised at runtime.
    #[serde(default = "default_base_interval_minutes")]
    pub base_interval_minutes: u64,

    /// Upper bound of the uniform random jitter added to each delay.
    #[serde(default = "default_jitter_seconds_max")]
    pub jitter_seconds_max: u64,

    /// Pause between two targets of the same round.
    #[serde(default = "default_inter_target_pause_secs")]
    pub inter_target_pause_secs: u64,

    /// Length of one wait slice; a liveness signal follows each slice.
    #[serde(default = "default_liveness_slice_secs")]
    pub liveness_slice_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            base_interval_minutes: default_base_interval_minutes(),
            jitter_seconds_max: default_jitter_seconds_max(),
            inter_target_pause_secs: default_inter_target_pause_secs(),
            liveness_slice_secs: default_liveness_slice_secs(),
        }
    }
}

fn default_base_interval_minutes() -> u64 {
    61
}

fn default_jitter_seconds_max() -> u64 {
    300
}

fn default_inter_target_pause_secs() -> u64 {
    5
}

fn default_liveness_slice_secs() -> u64 {
    300
}

/// What to assume when the remote side reports a cooldown without a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownCooldown {
    /// Treat it as a full cooldown window.
    #[default]
    FullWindow,
    /// Treat it as already expired.
    Zero,
}

/// Timing of a single claim cycle.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CycleConfig {
    /// Minimum spacing between two recorded claims of the same target.
    #[serde(default = "default_cooldown_window_secs")]
    pub cooldown_window_secs: u64,

    /// How long to wait for a conclusive reply after the trigger.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Spacing between two history fetches.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Number of recent messages fetched per poll.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Delay after pressing a control before re-fetching.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,

    /// Remaining time assumed for a cooldown marker without a duration.
    #[serde(default)]
    pub unknown_cooldown: UnknownCooldown,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            cooldown_window_secs: default_cooldown_window_secs(),
            poll_timeout_secs: default_poll_timeout_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            history_limit: default_history_limit(),
            settle_delay_secs: default_settle_delay_secs(),
            unknown_cooldown: UnknownCooldown::default(),
        }
    }
}

fn default_cooldown_window_secs() -> u64 {
    3600
}

fn default_poll_timeout_secs() -> u64 {
    20
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_history_limit() -> usize {
    5
}

fn default_settle_delay_secs() -> u64 {
    3
}

/// Ledger storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Directory holding one `<namespace>.csv` file per target.
    #[serde(default = "default_ledger_directory")]
    pub directory: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            directory: default_ledger_directory(),
        }
    }
}

fn default_ledger_directory() -> String {
    dirs::data_dir()
        .map(|p| p.join("claimbot").join("ledger"))
        .unwrap_or_else(|| std::path::PathBuf::from("ledger"))
        .to_string_lossy()
        .to_string()
}

/// Messaging gateway (user-client bridge) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Base URL of the user-client bridge.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Application id issued by the messaging platform.
    #[serde(default)]
    pub api_id: Option<i64>,

    /// Application hash issued by the messaging platform.
    #[serde(default)]
    pub api_hash: Option<String>,

    /// Session name or serialized session string.
    #[serde(default = "default_session")]
    pub session: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            api_id: None,
            api_hash: None,
            session: default_session(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bridge_url() -> String {
    "http://127.0.0.1:8081".to_string()
}

fn default_session() -> String {
    "auto_session".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Which secondary channel receives status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    /// Local log only.
    #[default]
    None,
    /// Send through the messaging gateway session.
    Gateway,
    /// Send through a Telegram Bot API token.
    Telegram,
}

/// Secondary status channel configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatusConfig {
    #[serde(default)]
    pub sink: SinkKind,

    /// Chat that receives status lines (numeric id or `@channel`).
    #[serde(default)]
    pub log_sink_id: Option<String>,

    /// Bot API token, required when `sink = "telegram"`.
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
}

/// One `[[targets]]` entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Stable identifier.
    pub id: String,

    /// Chat handle understood by the gateway.
    pub handle: String,

    /// Message sent to provoke the claim reply.
    #[serde(default = "default_trigger_text")]
    pub trigger_text: String,

    /// Substring of the control label to press; empty presses the first control.
    #[serde(default)]
    pub button_label: String,

    /// Ledger namespace; defaults to `id`.
    #[serde(default)]
    pub namespace: Option<String>,
}

impl TargetConfig {
    /// The effective ledger namespace.
    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or(&self.id)
    }

    pub fn to_target(&self) -> Target {
        Target {
            id: self.id.clone(),
            handle: self.handle.clone(),
            trigger_text: self.trigger_text.clone(),
            button_label: self.button_label.trim().to_string(),
            namespace: self.namespace().to_string(),
        }
    }
}

fn default_trigger_text() -> String {
    "/start".to_string()
}
