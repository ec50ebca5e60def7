// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for claimbot.
//!
//! This crate holds the error type, the domain types shared by every stage of
//! a claim cycle, and the capability traits (gateway, ledger, clock, status
//! sink) that the orchestrator is wired with.

pub mod error;
pub mod traits;
pub mod types;

pub use error::ClaimbotError;
pub use types::{
    ChatMessage, ClaimRecord, ClassifiedEvent, Control, ControlRef, CycleResult, CycleState,
    HealthStatus, SentMessage, Target,
};

pub use traits::{ClaimLedger, Clock, MessagingGateway, StatusSink, SystemClock};
