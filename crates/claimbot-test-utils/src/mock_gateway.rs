// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted messaging gateway for deterministic cycle tests.
//!
//! Each chat handle has a script of fetch results. Every fetch pops the next
//! entry; the last entry is sticky and is returned for all later fetches. A
//! separate "after press" script replaces the remaining entries as soon as a
//! control is pressed.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tokio::sync::Mutex;

use claimbot_core::{
    ChatMessage, ClaimbotError, Clock, Control, ControlRef, HealthStatus, MessagingGateway,
    SentMessage,
};

/// Gateway operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    Send,
    Fetch,
    Press,
}

/// Failure injected into a gateway operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockFailure {
    Transport(String),
    Auth(String),
}

impl MockFailure {
    fn to_error(&self) -> ClaimbotError {
        match self {
            MockFailure::Transport(m) => ClaimbotError::transport(m.clone()),
            MockFailure::Auth(m) => ClaimbotError::Auth { message: m.clone() },
        }
    }
}

#[derive(Default)]
struct Script {
    fetches: VecDeque<Vec<ChatMessage>>,
    after_press: Option<Vec<Vec<ChatMessage>>>,
}

/// A message sent through the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub handle: String,
    pub text: String,
}

/// A control press seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressRecord {
    pub handle: String,
    pub control: ControlRef,
}

/// Build a message posted `offset_secs` after `base`, with one row of controls.
pub fn message_at(
    id: &str,
    text: &str,
    base: DateTime<Utc>,
    offset_secs: i64,
    controls: &[&str],
) -> ChatMessage {
    ChatMessage {
        id: id.to_string(),
        text: text.to_string(),
        timestamp: base + TimeDelta::seconds(offset_secs),
        controls: if controls.is_empty() {
            Vec::new()
        } else {
            vec![controls.iter().map(|l| Control::new(*l)).collect()]
        },
    }
}

/// A scripted [`MessagingGateway`].
pub struct MockGateway {
    clock: Arc<dyn Clock>,
    scripts: Mutex<HashMap<String, Script>>,
    failures: Mutex<HashMap<(String, GatewayOp), MockFailure>>,
    stalls: Mutex<HashMap<(String, GatewayOp), Duration>>,
    connect_failure: Mutex<Option<MockFailure>>,
    sent: Mutex<Vec<SentRecord>>,
    presses: Mutex<Vec<PressRecord>>,
    fetches: Mutex<HashMap<String, usize>>,
    next_id: Mutex<u64>,
}

impl MockGateway {
    /// Create a mock that stamps sent messages with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            scripts: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            stalls: Mutex::new(HashMap::new()),
            connect_failure: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            presses: Mutex::new(Vec::new()),
            fetches: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Script the successive fetch results for `handle`.
    pub async fn script_fetches(&self, handle: &str, fetches: Vec<Vec<ChatMessage>>) {
        let mut scripts = self.scripts.lock().await;
        scripts.entry(handle.to_string()).or_default().fetches = fetches.into();
    }

    /// Script the fetch results that follow the first press in `handle`.
    pub async fn script_after_press(&self, handle: &str, fetches: Vec<Vec<ChatMessage>>) {
        let mut scripts = self.scripts.lock().await;
        scripts.entry(handle.to_string()).or_default().after_press = Some(fetches);
    }

    /// Make `op` on `handle` fail until cleared.
    pub async fn fail(&self, handle: &str, op: GatewayOp, failure: MockFailure) {
        self.failures
            .lock()
            .await
            .insert((handle.to_string(), op), failure);
    }

    /// Make `op` on `handle` take `delay` before answering, like a slow bridge.
    pub async fn stall(&self, handle: &str, op: GatewayOp, delay: Duration) {
        self.stalls
            .lock()
            .await
            .insert((handle.to_string(), op), delay);
    }

    pub async fn fail_connect(&self, failure: MockFailure) {
        *self.connect_failure.lock().await = Some(failure);
    }

    pub async fn clear_failures(&self) {
        self.failures.lock().await.clear();
        self.stalls.lock().await.clear();
        *self.connect_failure.lock().await = None;
    }

    pub async fn sent_messages(&self) -> Vec<SentRecord> {
        self.sent.lock().await.clone()
    }

    pub async fn presses(&self) -> Vec<PressRecord> {
        self.presses.lock().await.clone()
    }

    pub async fn fetch_count(&self, handle: &str) -> usize {
        self.fetches.lock().await.get(handle).copied().unwrap_or(0)
    }

    /// Sends, fetches and presses across all handles.
    pub async fn call_count(&self) -> usize {
        let fetches: usize = self.fetches.lock().await.values().sum();
        self.sent.lock().await.len() + self.presses.lock().await.len() + fetches
    }

    async fn check(&self, handle: &str, op: GatewayOp) -> Result<(), ClaimbotError> {
        let stall = self.stalls.lock().await.get(&(handle.to_string(), op)).copied();
        if let Some(delay) = stall {
            tokio::time::sleep(delay).await;
        }
        match self.failures.lock().await.get(&(handle.to_string(), op)) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    fn name(&self) -> &str {
        "mock-gateway"
    }

    async fn connect(&mut self) -> Result<(), ClaimbotError> {
        match self.connect_failure.lock().await.as_ref() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    async fn send_message(&self, handle: &str, text: &str) -> Result<SentMessage, ClaimbotError> {
        self.check(handle, GatewayOp::Send).await?;

        let id = {
            let mut next = self.next_id.lock().await;
            let id = *next;
            *next += 1;
            format!("mock-{id}")
        };
        self.sent.lock().await.push(SentRecord {
            handle: handle.to_string(),
            text: text.to_string(),
        });
        Ok(SentMessage {
            id,
            sent_at: self.clock.now(),
        })
    }

    async fn fetch_recent_messages(
        &self,
        handle: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ClaimbotError> {
        *self
            .fetches
            .lock()
            .await
            .entry(handle.to_string())
            .or_insert(0) += 1;
        self.check(handle, GatewayOp::Fetch).await?;

        let mut scripts = self.scripts.lock().await;
        let Some(script) = scripts.get_mut(handle) else {
            return Ok(Vec::new());
        };
        let batch = if script.fetches.len() > 1 {
            script.fetches.pop_front().unwrap_or_default()
        } else {
            script.fetches.front().cloned().unwrap_or_default()
        };
        Ok(batch.into_iter().take(limit).collect())
    }

    async fn press_control(&self, handle: &str, control: &ControlRef) -> Result<(), ClaimbotError> {
        self.check(handle, GatewayOp::Press).await?;

        self.presses.lock().await.push(PressRecord {
            handle: handle.to_string(),
            control: control.clone(),
        });

        let mut scripts = self.scripts.lock().await;
        if let Some(script) = scripts.get_mut(handle)
            && let Some(after) = script.after_press.take()
        {
            script.fetches = after.into();
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, ClaimbotError> {
        Ok(HealthStatus::Healthy)
    }
}
