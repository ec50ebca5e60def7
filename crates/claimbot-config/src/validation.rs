// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Collects every violation instead of stopping at the first one.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{ClaimbotConfig, SinkKind};

/// Upper bound for `cycle.history_limit`.
const MAX_HISTORY_LIMIT: usize = 100;

/// One week, the upper bound for `schedule.base_interval_minutes`.
const MAX_BASE_INTERVAL_MINUTES: u64 = 7 * 24 * 60;

/// Upper bound for `schedule.jitter_seconds_max` and `cycle.cooldown_window_secs`.
const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Upper bound for the per-cycle waits (`poll_timeout_secs`, `settle_delay_secs`).
const MAX_CYCLE_WAIT_SECS: u64 = 60 * 60;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ClaimbotConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_targets(config, &mut errors);
    validate_cycle(config, &mut errors);
    validate_status(config, &mut errors);

    if config.ledger.directory.trim().is_empty() {
        errors.push(ConfigError::validation("ledger.directory must not be empty"));
    }

    if config.gateway.bridge_url.trim().is_empty() {
        errors.push(ConfigError::validation("gateway.bridge_url must not be empty"));
    }

    validate_schedule(config, &mut errors);

    if config.schedule.liveness_slice_secs == 0 {
        errors.push(ConfigError::validation(
            "schedule.liveness_slice_secs must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_targets(config: &ClaimbotConfig, errors: &mut Vec<ConfigError>) {
    if config.targets.is_empty() {
        errors.push(ConfigError::validation(
            "at least one [[targets]] entry is required",
        ));
    }

    let mut ids = HashSet::new();
    let mut namespaces = HashSet::new();
    for (i, target) in config.targets.iter().enumerate() {
        if target.id.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "targets[{i}].id must not be empty"
            )));
        } else if !ids.insert(target.id.as_str()) {
            errors.push(ConfigError::validation(format!(
                "duplicate target id `{}` in [[targets]]",
                target.id
            )));
        }

        if target.handle.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "targets[{i}].handle must not be empty"
            )));
        }

        if target.trigger_text.trim().is_empty() {
            errors.push(ConfigError::validation(format!(
                "targets[{i}].trigger_text must not be empty"
            )));
        }

        let namespace = target.namespace();
        if namespace.contains(['/', '\\']) || namespace.starts_with('.') {
            errors.push(ConfigError::validation(format!(
                "targets[{i}] namespace `{namespace}` must be a plain file name"
            )));
        }
        if !namespace.is_empty() && !namespaces.insert(namespace) {
            errors.push(ConfigError::validation(format!(
                "ledger namespace `{namespace}` is used by more than one target"
            )));
        }
    }
}

fn validate_schedule(config: &ClaimbotConfig, errors: &mut Vec<ConfigError>) {
    let schedule = &config.schedule;

    if schedule.base_interval_minutes > MAX_BASE_INTERVAL_MINUTES {
        errors.push(ConfigError::validation(format!(
            "schedule.base_interval_minutes must be at most {MAX_BASE_INTERVAL_MINUTES}, got {}",
            schedule.base_interval_minutes
        )));
    }

    if schedule.jitter_seconds_max > MAX_WINDOW_SECS {
        errors.push(ConfigError::validation(format!(
            "schedule.jitter_seconds_max must be at most {MAX_WINDOW_SECS}, got {}",
            schedule.jitter_seconds_max
        )));
    }
}

fn validate_cycle(config: &ClaimbotConfig, errors: &mut Vec<ConfigError>) {
    let cycle = &config.cycle;

    if cycle.poll_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "cycle.poll_timeout_secs must be greater than zero",
        ));
    }

    if cycle.poll_interval_secs == 0 {
        errors.push(ConfigError::validation(
            "cycle.poll_interval_secs must be greater than zero",
        ));
    } else if cycle.poll_interval_secs > cycle.poll_timeout_secs {
        errors.push(ConfigError::validation(format!(
            "cycle.poll_interval_secs ({}) must not exceed cycle.poll_timeout_secs ({})",
            cycle.poll_interval_secs, cycle.poll_timeout_secs
        )));
    }

    if cycle.poll_timeout_secs > MAX_CYCLE_WAIT_SECS {
        errors.push(ConfigError::validation(format!(
            "cycle.poll_timeout_secs must be at most {MAX_CYCLE_WAIT_SECS}, got {}",
            cycle.poll_timeout_secs
        )));
    }

    if cycle.settle_delay_secs > MAX_CYCLE_WAIT_SECS {
        errors.push(ConfigError::validation(format!(
            "cycle.settle_delay_secs must be at most {MAX_CYCLE_WAIT_SECS}, got {}",
            cycle.settle_delay_secs
        )));
    }

    if cycle.cooldown_window_secs > MAX_WINDOW_SECS {
        errors.push(ConfigError::validation(format!(
            "cycle.cooldown_window_secs must be at most {MAX_WINDOW_SECS}, got {}",
            cycle.cooldown_window_secs
        )));
    }

    if cycle.history_limit == 0 || cycle.history_limit > MAX_HISTORY_LIMIT {
        errors.push(ConfigError::validation(format!(
            "cycle.history_limit must be between 1 and {MAX_HISTORY_LIMIT}, got {}",
            cycle.history_limit
        )));
    }
}

fn validate_status(config: &ClaimbotConfig, errors: &mut Vec<ConfigError>) {
    let status = &config.status;
    let has_sink_id = status
        .log_sink_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());

    match status.sink {
        SinkKind::None => {}
        SinkKind::Gateway => {
            if !has_sink_id {
                errors.push(ConfigError::validation(
                    "status.log_sink_id is required when status.sink = \"gateway\"",
                ));
            }
        }
        SinkKind::Telegram => {
            if !has_sink_id {
                errors.push(ConfigError::validation(
                    "status.log_sink_id is required when status.sink = \"telegram\"",
                ));
            }
            if status
                .telegram_bot_token
                .as_deref()
                .is_none_or(|t| t.trim().is_empty())
            {
                errors.push(ConfigError::validation(
                    "status.telegram_bot_token is required when status.sink = \"telegram\"",
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TargetConfig;

    fn target(id: &str) -> TargetConfig {
        TargetConfig {
            id: id.to_string(),
            handle: format!("{id}_bot"),
            trigger_text: "/start".to_string(),
            button_label: "Hourly Bonus".to_string(),
            namespace: None,
        }
    }

    fn valid_config() -> ClaimbotConfig {
        ClaimbotConfig {
            targets: vec![target("ltc")],
            ..ClaimbotConfig::default()
        }
    }

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn single_target_config_validates() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn default_config_needs_a_target() {
        let errors = validate_config(&ClaimbotConfig::default()).unwrap_err();
        assert!(has_error(&errors, "at least one [[targets]]"));
    }

    #[test]
    fn duplicate_ids_and_namespaces_are_rejected() {
        let mut config = valid_config();
        config.targets.push(target("ltc"));
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "duplicate target id `ltc`"));
        assert!(has_error(&errors, "namespace `ltc` is used by more than one"));
    }

    #[test]
    fn shared_explicit_namespace_is_rejected() {
        let mut config = valid_config();
        let mut other = target("doge");
        other.namespace = Some("ltc".into());
        config.targets.push(other);
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "namespace `ltc`"));
    }

    #[test]
    fn path_like_namespace_is_rejected() {
        let mut config = valid_config();
        config.targets[0].namespace = Some("../escape".into());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "plain file name"));
    }

    #[test]
    fn poll_interval_longer_than_timeout_is_rejected() {
        let mut config = valid_config();
        config.cycle.poll_interval_secs = 30;
        config.cycle.poll_timeout_secs = 20;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must not exceed"));
    }

    #[test]
    fn absurd_durations_are_rejected() {
        let mut config = valid_config();
        config.schedule.base_interval_minutes = u64::MAX;
        config.schedule.jitter_seconds_max = u64::MAX;
        config.cycle.poll_timeout_secs = u64::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "base_interval_minutes must be at most 10080"));
        assert!(has_error(&errors, "jitter_seconds_max must be at most"));
        assert!(has_error(&errors, "poll_timeout_secs must be at most 3600"));
    }

    #[test]
    fn week_long_interval_is_accepted() {
        let mut config = valid_config();
        config.schedule.base_interval_minutes = 7 * 24 * 60;
        config.schedule.jitter_seconds_max = 3600;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_history_limit_is_rejected() {
        let mut config = valid_config();
        config.cycle.history_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "history_limit"));
    }

    #[test]
    fn telegram_sink_requires_token_and_chat() {
        let mut config = valid_config();
        config.status.sink = SinkKind::Telegram;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "log_sink_id"));
        assert!(has_error(&errors, "telegram_bot_token"));
    }

    #[test]
    fn gateway_sink_with_chat_is_valid() {
        let mut config = valid_config();
        config.status.sink = SinkKind::Gateway;
        config.status.log_sink_id = Some("@claim_log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = ClaimbotConfig::default();
        config.cycle.poll_timeout_secs = 0;
        config.cycle.history_limit = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3, "got {errors:?}");
    }
}
