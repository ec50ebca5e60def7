// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the claimbot configuration system.

use claimbot_config::diagnostic::ConfigError;
use claimbot_config::model::{SinkKind, UnknownCooldown};
use claimbot_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

const FULL_CONFIG: &str = r#"
[agent]
name = "faucet-runner"
log_level = "debug"

[schedule]
base_interval_minutes = 65
jitter_seconds_max = 120
inter_target_pause_secs = 7
liveness_slice_secs = 60

[cycle]
cooldown_window_secs = 3700
poll_timeout_secs = 30
poll_interval_secs = 2
history_limit = 8
settle_delay_secs = 4
unknown_cooldown = "zero"

[ledger]
directory = "/var/lib/claimbot"

[gateway]
bridge_url = "http://10.0.0.2:9000"
api_id = 123456
api_hash = "abcdef"
session = "main"

[status]
sink = "gateway"
log_sink_id = "@claim_log"

[[targets]]
id = "ltc"
handle = "LitecoinFaucetBot"
button_label = "Hourly Bonus"

[[targets]]
id = "doge"
handle = "DogeClickBot"
trigger_text = "/bonus"
namespace = "doge-main"
"#;

#[test]
fn full_toml_deserializes() {
    let config = load_and_validate_str(FULL_CONFIG).expect("valid config");

    assert_eq!(config.agent.name, "faucet-runner");
    assert_eq!(config.schedule.base_interval_minutes, 65);
    assert_eq!(config.schedule.jitter_seconds_max, 120);
    assert_eq!(config.cycle.cooldown_window_secs, 3700);
    assert_eq!(config.cycle.history_limit, 8);
    assert_eq!(config.cycle.unknown_cooldown, UnknownCooldown::Zero);
    assert_eq!(config.ledger.directory, "/var/lib/claimbot");
    assert_eq!(config.gateway.api_id, Some(123456));
    assert_eq!(config.status.sink, SinkKind::Gateway);

    let targets = config.targets();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].trigger_text, "/start");
    assert_eq!(targets[0].namespace, "ltc");
    assert_eq!(targets[1].trigger_text, "/bonus");
    assert_eq!(targets[1].namespace, "doge-main");
    assert!(targets[1].button_label.is_empty());
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.schedule.base_interval_minutes, 61);
    assert_eq!(config.schedule.jitter_seconds_max, 300);
    assert_eq!(config.schedule.liveness_slice_secs, 300);
    assert_eq!(config.cycle.cooldown_window_secs, 3600);
    assert_eq!(config.cycle.poll_timeout_secs, 20);
    assert_eq!(config.cycle.poll_interval_secs, 1);
    assert_eq!(config.cycle.history_limit, 5);
    assert_eq!(config.cycle.unknown_cooldown, UnknownCooldown::FullWindow);
    assert_eq!(config.status.sink, SinkKind::None);
    assert_eq!(config.gateway.session, "auto_session");
}

#[test]
fn misspelled_key_gets_a_suggestion() {
    let toml = r#"
[schedule]
jitter_second_max = 10

[[targets]]
id = "ltc"
handle = "bot"
"#;

    let errors = load_and_validate_str(toml).expect_err("unknown key should fail");
    let suggestion = errors.iter().find_map(|e| match e {
        ConfigError::UnknownKey { suggestion, .. } => suggestion.clone(),
        _ => None,
    });
    assert_eq!(suggestion.as_deref(), Some("jitter_seconds_max"));
}

#[test]
fn target_without_handle_is_missing_key() {
    let toml = r#"
[[targets]]
id = "ltc"
"#;

    let errors = load_and_validate_str(toml).expect_err("handle is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key == "handle")),
        "got {errors:?}"
    );
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[cycle]
history_limit = "five"
"#;

    let errors = load_and_validate_str(toml).expect_err("string is not an integer");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { key, .. } if key.contains("history_limit"))));
}

#[test]
fn env_overrides_file_values() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "custom.toml",
            r#"
[schedule]
jitter_seconds_max = 300

[[targets]]
id = "ltc"
handle = "bot"
"#,
        )?;
        jail.set_env("CLAIMBOT_SCHEDULE_JITTER_SECONDS_MAX", "42");
        jail.set_env("CLAIMBOT_STATUS_LOG_SINK_ID", "-100123");

        let config = load_and_validate_path(std::path::Path::new("custom.toml"))
            .map_err(|errors| format!("{errors:?}"))?;
        assert_eq!(config.schedule.jitter_seconds_max, 42);
        assert_eq!(config.status.log_sink_id.as_deref(), Some("-100123"));
        Ok(())
    });
}

#[test]
fn file_on_disk_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("claimbot.toml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = load_and_validate_path(&path).expect("file config should load");
    assert_eq!(config.targets.len(), 2);
}
