// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API status sink for claimbot.
//!
//! Posts status lines to a chat through a bot token, independently of the
//! user session the claim cycles run on.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::debug;

use claimbot_config::model::StatusConfig;
use claimbot_core::{ClaimbotError, HealthStatus, StatusSink};

/// Parse a log sink id: a signed integer chat id or an `@channel` username.
pub fn parse_recipient(id: &str) -> Result<Recipient, ClaimbotError> {
    let id = id.trim();
    if let Ok(numeric) = id.parse::<i64>() {
        return Ok(Recipient::Id(ChatId(numeric)));
    }
    if id.len() > 1 && id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(id.to_string()));
    }
    Err(ClaimbotError::Config(format!(
        "status.log_sink_id `{id}` must be a numeric chat id or an @channel name"
    )))
}

/// [`StatusSink`] backed by the Telegram Bot API.
pub struct TelegramStatusSink {
    bot: Bot,
    recipient: Recipient,
}

impl TelegramStatusSink {
    /// Build a sink from the `[status]` section.
    ///
    /// Requires `telegram_bot_token` and `log_sink_id`.
    pub fn new(config: &StatusConfig) -> Result<Self, ClaimbotError> {
        let token = config
            .telegram_bot_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                ClaimbotError::Config("status.telegram_bot_token is required".into())
            })?;
        let chat = config
            .log_sink_id
            .as_deref()
            .ok_or_else(|| ClaimbotError::Config("status.log_sink_id is required".into()))?;

        Ok(Self {
            bot: Bot::new(token),
            recipient: parse_recipient(chat)?,
        })
    }

    pub async fn health_check(&self) -> HealthStatus {
        match self.bot.get_me().await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("Telegram bot unreachable: {e}")),
        }
    }
}

#[async_trait]
impl StatusSink for TelegramStatusSink {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn post(&self, text: &str) -> Result<(), ClaimbotError> {
        self.bot
            .send_message(self.recipient.clone(), text)
            .await
            .map_err(|e| ClaimbotError::Notify {
                message: format!("failed to send status message: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!("status line delivered to telegram");
        Ok(())
    }
}
