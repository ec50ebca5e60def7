// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway trait for the chat session the cycles run against.

use async_trait::async_trait;

use crate::error::ClaimbotError;
use crate::types::{ChatMessage, ControlRef, HealthStatus, SentMessage};

/// Capability to talk to remote chats on behalf of the user account.
///
/// The gateway owns the live session. Raw platform objects never cross this
/// boundary: messages are copied into [`ChatMessage`] and controls are
/// addressed through [`ControlRef`].
///
/// Implementations report rejected credentials as [`ClaimbotError::Auth`] and
/// every other failure as [`ClaimbotError::Transport`].
#[async_trait]
pub trait MessagingGateway: Send + Sync + 'static {
    /// Human-readable name of this gateway implementation.
    fn name(&self) -> &str;

    /// Establishes and authenticates the session.
    async fn connect(&mut self) -> Result<(), ClaimbotError>;

    /// Sends `text` to the chat identified by `handle`.
    async fn send_message(&self, handle: &str, text: &str) -> Result<SentMessage, ClaimbotError>;

    /// Fetches up to `limit` of the most recent messages in the chat, newest first.
    async fn fetch_recent_messages(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ClaimbotError>;

    /// Presses the control addressed by `control`.
    async fn press_control(&self, handle: &str, control: &ControlRef) -> Result<(), ClaimbotError>;

    /// Reports whether the session is usable.
    async fn health_check(&self) -> Result<HealthStatus, ClaimbotError>;
}
