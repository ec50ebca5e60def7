// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types of the bridge HTTP API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use claimbot_core::{ChatMessage, Control};

/// `POST /v1/session` body.
#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_hash: Option<&'a str>,
    pub session: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub token: String,
}

/// Message ids arrive as numbers from some bridges and strings from others.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WireId::Number(n) => write!(f, "{n}"),
            WireId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SendRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    pub id: WireId,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireControl {
    #[serde(alias = "text")]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub id: WireId,
    #[serde(default)]
    pub text: String,
    #[serde(alias = "date")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, alias = "buttons")]
    pub controls: Vec<Vec<WireControl>>,
}

impl From<WireMessage> for ChatMessage {
    fn from(m: WireMessage) -> Self {
        ChatMessage {
            id: m.id.to_string(),
            text: m.text,
            timestamp: m.timestamp,
            controls: m
                .controls
                .into_iter()
                .map(|row| row.into_iter().map(|c| Control::new(c.label)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PressRequest {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub detail: Option<String>,
}
