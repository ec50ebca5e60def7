// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secondary notification channel for human-readable status lines.

use async_trait::async_trait;

use crate::error::ClaimbotError;

/// Destination for status text besides the local log.
///
/// Failures are reported to the caller, which logs them and moves on.
#[async_trait]
pub trait StatusSink: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn post(&self, text: &str) -> Result<(), ClaimbotError>;
}
