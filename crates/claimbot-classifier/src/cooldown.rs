// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cooldown marker detection and remaining-time extraction.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

/// Prohibition glyph used by faucet bots to refuse a claim.
pub const PROHIBITION_GLYPH: char = '🚫';

/// The bare word "after", as in "come back after the cooldown".
static AFTER_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bafter\b").unwrap());

/// "after 38 minutes 25" / "after 12 min" / "after 5m 10s".
static AFTER_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bafter\s+(\d{1,4})\s*(?:minutes?|mins?|m)\b(?:\s*(?:and\s+)?(\d{1,2})\s*(?:seconds?|secs?|s)?\b)?",
    )
    .unwrap()
});

/// A bare minute count: "38 minutes", "12 min", "5m".
static MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,4})\s*(?:minutes?|mins?|m)\b").unwrap()
});

/// Clock notation: "0:38:25".
static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(\d{1,2}):([0-5]\d):([0-5]\d)\b").unwrap()
});

/// What a cooldown message said about the time left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownSignal {
    /// `None` when a marker was present but no duration could be read.
    pub remaining: Option<Duration>,
}

/// Detect a cooldown in already-normalized text.
///
/// A message is a cooldown when it carries the prohibition glyph, the word
/// "after", or any recognized duration phrase.
pub fn detect_cooldown(normalized: &str) -> Option<CooldownSignal> {
    let remaining = parse_remaining(normalized);
    if remaining.is_some()
        || normalized.contains(PROHIBITION_GLYPH)
        || AFTER_WORD.is_match(normalized)
    {
        Some(CooldownSignal { remaining })
    } else {
        None
    }
}

/// Extract the remaining wait from a duration phrase, trying the most
/// specific pattern first.
pub fn parse_remaining(normalized: &str) -> Option<Duration> {
    if let Some(caps) = AFTER_MINUTES.captures(normalized) {
        let minutes = parse_u64(caps.get(1).map(|m| m.as_str()))?;
        let seconds = parse_u64(caps.get(2).map(|m| m.as_str())).unwrap_or(0);
        return Some(Duration::from_secs(minutes * 60 + seconds));
    }

    if let Some(caps) = MINUTES.captures(normalized) {
        let minutes = parse_u64(caps.get(1).map(|m| m.as_str()))?;
        return Some(Duration::from_secs(minutes * 60));
    }

    if let Some(caps) = CLOCK.captures(normalized) {
        let hours = parse_u64(caps.get(1).map(|m| m.as_str()))?;
        let minutes = parse_u64(caps.get(2).map(|m| m.as_str()))?;
        let seconds = parse_u64(caps.get(3).map(|m| m.as_str()))?;
        return Some(Duration::from_secs(hours * 3600 + minutes * 60 + seconds));
    }

    None
}

fn parse_u64(s: Option<&str>) -> Option<u64> {
    s.and_then(|s| s.parse().ok())
}
