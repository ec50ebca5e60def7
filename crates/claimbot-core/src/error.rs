// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for claimbot.

use thiserror::Error;

/// The primary error type used across claimbot traits and core operations.
#[derive(Debug, Error)]
pub enum ClaimbotError {
    /// Configuration errors (missing credentials, invalid target definitions).
    #[error("configuration error: {0}")]
    Config(String),

    /// The messaging session was rejected (invalid or expired credentials).
    ///
    /// Fatal: the process stops instead of retrying.
    #[error("authentication failed: {message}")]
    Auth { message: String },

    /// Messaging gateway failure while sending, fetching, or pressing a control.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Ledger I/O failure (directory missing, permission denied, disk full).
    #[error("ledger error: {source}")]
    Ledger {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Status notification could not be delivered to the secondary channel.
    #[error("notification error: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Shutdown was requested while the operation was suspended.
    #[error("operation cancelled by shutdown")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClaimbotError {
    /// Shorthand for a transport error without an underlying source.
    pub fn transport(message: impl Into<String>) -> Self {
        ClaimbotError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error must terminate the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClaimbotError::Auth { .. })
    }
}
