// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Claim ledger trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ClaimbotError;

/// Append-only record of granted rewards, one stream per namespace.
#[async_trait]
pub trait ClaimLedger: Send + Sync + 'static {
    /// Timestamp of the most recent valid record, if any.
    async fn last_claim_time(&self, namespace: &str) -> Result<Option<DateTime<Utc>>, ClaimbotError>;

    /// Appends `{now, amount}` and returns the timestamp written.
    async fn record_claim(&self, namespace: &str, amount: f64) -> Result<DateTime<Utc>, ClaimbotError>;

    /// Sum of amounts recorded within the trailing seven days.
    async fn weekly_total(&self, namespace: &str) -> Result<f64, ClaimbotError>;

    /// Number of valid records ever written.
    async fn sequence_number(&self, namespace: &str) -> Result<u64, ClaimbotError>;
}
