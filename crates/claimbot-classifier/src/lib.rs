// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply classification for claimbot.
//!
//! Turns the text and controls of a message observed in a target chat into a
//! [`ClassifiedEvent`](claimbot_core::ClassifiedEvent). Pattern matching runs
//! on normalized text, so invisible characters and line breaks inserted by
//! remote bots do not defeat it.

pub mod classifier;
pub mod cooldown;
pub mod normalize;
pub mod reward;

pub use classifier::{MessageClassifier, classify_text};
pub use normalize::normalize;
