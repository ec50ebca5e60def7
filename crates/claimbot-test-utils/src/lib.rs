// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for claimbot integration tests.
//!
//! # Components
//!
//! - [`MockGateway`] - scripted messaging gateway with failure injection
//! - [`MockSink`] - status sink that captures lines
//! - [`FakeClock`] - manually driven clock
//! - [`TestHarness`] - wires the mocks to a temp-dir ledger

pub mod clock;
pub mod harness;
pub mod mock_gateway;
pub mod mock_sink;

pub use clock::FakeClock;
pub use harness::{TestHarness, fast_settings, target};
pub use mock_gateway::{GatewayOp, MockFailure, MockGateway, message_at};
pub use mock_sink::MockSink;
