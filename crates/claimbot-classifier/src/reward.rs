// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reward confirmation detection.

use std::sync::LazyLock;

use regex::Regex;

/// Stems that mark a payout confirmation ("received", "receive", "bonus").
static REWARD_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(receiv|bonus)").unwrap());

/// Decimal amount followed by a known currency ticker.
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(LTC|DOGE|BTC|USDT|TRX)\b").unwrap()
});

/// Whether the normalized text carries a reward keyword.
pub fn has_reward_keyword(normalized: &str) -> bool {
    REWARD_KEYWORD.is_match(normalized)
}

/// First strictly positive amount with its currency, upper-cased.
///
/// Zero, unparsable, and non-finite amounts are skipped.
pub fn extract_amount(normalized: &str) -> Option<(f64, String)> {
    AMOUNT.captures_iter(normalized).find_map(|caps| {
        let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
        if !(amount.is_finite() && amount > 0.0) {
            return None;
        }
        let currency = caps.get(2)?.as_str().to_ascii_uppercase();
        Some((amount, currency))
    })
}

/// Detect a reward confirmation: keyword plus a positive amount.
pub fn detect_reward(normalized: &str) -> Option<(f64, String)> {
    if !has_reward_keyword(normalized) {
        return None;
    }
    extract_amount(normalized)
}
