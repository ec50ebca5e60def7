// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits injected into the claim cycle.
//!
//! The orchestrator never reaches for globals: the messaging gateway, ledger,
//! clock, and status sink are all passed in as trait objects so tests can
//! substitute fakes.

pub mod clock;
pub mod gateway;
pub mod ledger;
pub mod sink;

pub use clock::{Clock, SystemClock};
pub use gateway::MessagingGateway;
pub use ledger::ClaimLedger;
pub use sink::StatusSink;
