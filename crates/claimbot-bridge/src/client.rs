// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the user-client bridge.
//!
//! The bridge is a sidecar that holds the real user session and exposes a
//! small JSON API. [`BridgeGateway::connect`] exchanges the configured
//! credentials for a bearer token used on every later call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use claimbot_config::model::GatewayConfig;
use claimbot_core::{
    ChatMessage, ClaimbotError, ControlRef, HealthStatus, MessagingGateway, SentMessage,
};

use crate::types::{
    HealthResponse, HistoryResponse, PressRequest, SendRequest, SendResponse, SessionRequest,
    SessionResponse,
};

fn transport(op: &str, e: reqwest::Error) -> ClaimbotError {
    ClaimbotError::Transport {
        message: format!("{op} request failed"),
        source: Some(Box::new(e)),
    }
}

/// [`MessagingGateway`] backed by the bridge HTTP API.
#[derive(Debug, Clone)]
pub struct BridgeGateway {
    client: reqwest::Client,
    base_url: Url,
    api_id: Option<i64>,
    api_hash: Option<String>,
    session: String,
    token: Option<String>,
}

impl BridgeGateway {
    /// Build a client from the `[gateway]` section. Does not touch the network.
    pub fn new(config: &GatewayConfig) -> Result<Self, ClaimbotError> {
        let base_url = Url::parse(&config.bridge_url).map_err(|e| {
            ClaimbotError::Config(format!(
                "invalid gateway.bridge_url `{}`: {e}",
                config.bridge_url
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClaimbotError::Config(format!(
                "gateway.bridge_url `{}` cannot be used as a base URL",
                config.bridge_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ClaimbotError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            session: config.session.clone(),
            token: None,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.token.is_some()
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ClaimbotError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClaimbotError::Internal("bridge URL cannot be a base".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn token(&self) -> Result<&str, ClaimbotError> {
        self.token
            .as_deref()
            .ok_or_else(|| ClaimbotError::transport("bridge session is not connected"))
    }

    /// Pass 2xx responses through; map everything else to an error.
    async fn check(op: &str, response: Response) -> Result<Response, ClaimbotError> {
        let status = response.status();
        debug!(op, status = %status, "bridge response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClaimbotError::Auth {
                message: format!("bridge rejected the session during {op} ({status}): {body}"),
            });
        }
        Err(ClaimbotError::transport(format!(
            "{op}: bridge returned {status}: {body}"
        )))
    }

    async fn json<T: DeserializeOwned>(op: &str, response: Response) -> Result<T, ClaimbotError> {
        let response = Self::check(op, response).await?;
        response.json::<T>().await.map_err(|e| ClaimbotError::Transport {
            message: format!("{op}: malformed bridge response"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl MessagingGateway for BridgeGateway {
    fn name(&self) -> &str {
        "bridge"
    }

    async fn connect(&mut self) -> Result<(), ClaimbotError> {
        let url = self.url(&["v1", "session"])?;
        let body = SessionRequest {
            api_id: self.api_id,
            api_hash: self.api_hash.as_deref(),
            session: &self.session,
        };
        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport("session", e))?;
        let session: SessionResponse = Self::json("session", response).await?;

        self.token = Some(session.token);
        info!(bridge = %self.base_url, session = %self.session, "bridge session established");
        Ok(())
    }

    async fn send_message(&self, handle: &str, text: &str) -> Result<SentMessage, ClaimbotError> {
        let url = self.url(&["v1", "chats", handle, "messages"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .json(&SendRequest { text })
            .send()
            .await
            .map_err(|e| transport("send", e))?;
        let sent: SendResponse = Self::json("send", response).await?;

        Ok(SentMessage {
            id: sent.id.to_string(),
            sent_at: sent.sent_at,
        })
    }

    async fn fetch_recent_messages(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ClaimbotError> {
        let mut url = self.url(&["v1", "chats", handle, "messages"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        let response = self
            .client
            .get(url)
            .bearer_auth(self.token()?)
            .send()
            .await
            .map_err(|e| transport("fetch", e))?;
        let history: HistoryResponse = Self::json("fetch", response).await?;

        let mut messages: Vec<ChatMessage> =
            history.messages.into_iter().map(ChatMessage::from).collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        messages.truncate(limit);
        Ok(messages)
    }

    async fn press_control(&self, handle: &str, control: &ControlRef) -> Result<(), ClaimbotError> {
        let url = self.url(&["v1", "chats", handle, "messages", control.message_id.as_str(), "press"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(self.token()?)
            .json(&PressRequest {
                row: control.row,
                col: control.col,
            })
            .send()
            .await
            .map_err(|e| transport("press", e))?;
        Self::check("press", response).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, ClaimbotError> {
        let url = self.url(&["v1", "health"])?;
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return Ok(HealthStatus::Unhealthy(format!("bridge unreachable: {e}"))),
        };
        if !response.status().is_success() {
            return Ok(HealthStatus::Degraded(format!(
                "bridge health returned {}",
                response.status()
            )));
        }

        let health: HealthResponse = Self::json("health", response).await?;
        Ok(match health.status.as_str() {
            "ok" | "healthy" => HealthStatus::Healthy,
            "degraded" => HealthStatus::Degraded(health.detail.unwrap_or_default()),
            other => HealthStatus::Unhealthy(health.detail.unwrap_or_else(|| other.to_string())),
        })
    }
}
