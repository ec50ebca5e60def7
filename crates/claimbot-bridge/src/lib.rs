// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway over an HTTP/JSON user-client bridge.
//!
//! Endpoints (all JSON, bearer token after the session call):
//! - `POST /v1/session`
//! - `POST /v1/chats/{handle}/messages`
//! - `GET  /v1/chats/{handle}/messages?limit=N`
//! - `POST /v1/chats/{handle}/messages/{id}/press`
//! - `GET  /v1/health`
//!
//! 401 and 403 map to [`ClaimbotError::Auth`](claimbot_core::ClaimbotError::Auth);
//! every other failure is a transport error.

pub mod client;
pub mod types;

pub use client::BridgeGateway;
