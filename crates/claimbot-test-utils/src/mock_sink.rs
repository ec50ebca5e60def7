// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status sink that captures lines for assertions.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use claimbot_core::{ClaimbotError, StatusSink};

/// Captures posted lines; can be switched into a failing mode.
#[derive(Default)]
pub struct MockSink {
    lines: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later `post` fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn lines(&self) -> Vec<String> {
        self.lines.lock().await.clone()
    }
}

#[async_trait]
impl StatusSink for MockSink {
    fn name(&self) -> &str {
        "mock-sink"
    }

    async fn post(&self, text: &str) -> Result<(), ClaimbotError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClaimbotError::Notify {
                message: "mock sink is failing".into(),
                source: None,
            });
        }
        self.lines.lock().await.push(text.to_string());
        Ok(())
    }
}
