// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup order: `./claimbot.toml` > `~/.config/claimbot/claimbot.toml` >
//! `/etc/claimbot/claimbot.toml`, with `CLAIMBOT_*` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ClaimbotConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/claimbot/claimbot.toml";

/// Config file in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "claimbot.toml";

/// Per-user config file under the XDG config directory.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("claimbot").join("claimbot.toml"))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/claimbot/claimbot.toml`
/// 3. `~/.config/claimbot/claimbot.toml`
/// 4. `./claimbot.toml`
/// 5. `CLAIMBOT_*` environment variables
pub fn load_config() -> Result<ClaimbotConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ClaimbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClaimbotConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ClaimbotConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ClaimbotConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ClaimbotConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Environment provider mapping `CLAIMBOT_<SECTION>_<KEY>` to `section.key`.
///
/// Uses `Env::map()` rather than `Env::split("_")`: key names contain
/// underscores, so `CLAIMBOT_SCHEDULE_BASE_INTERVAL_MINUTES` must become
/// `schedule.base_interval_minutes`, not `schedule.base.interval.minutes`.
fn env_provider() -> Env {
    Env::prefixed("CLAIMBOT_").map(|key| map_env_key(key.as_str()).into())
}

/// Replace the first `<section>_` prefix with `<section>.`.
pub(crate) fn map_env_key(key: &str) -> String {
    const SECTIONS: &[&str] = &["agent", "schedule", "cycle", "ledger", "gateway", "status"];

    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
