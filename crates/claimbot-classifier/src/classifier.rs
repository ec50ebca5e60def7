// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message classification with fixed rule precedence.
//!
//! Rules are tried in order and the first hit wins:
//! 1. cooldown marker or duration phrase
//! 2. reward keyword with a positive amount
//! 3. a control whose label contains the configured label
//! 4. otherwise irrelevant
//!
//! Classification is pure: no I/O, no clock, no state.

use claimbot_core::{ChatMessage, ClassifiedEvent, Control};

use crate::cooldown::detect_cooldown;
use crate::normalize::normalize;
use crate::reward::detect_reward;

/// Classifier bound to one target's control label.
#[derive(Debug, Clone)]
pub struct MessageClassifier {
    /// Lower-cased, normalized label substring. Empty matches any control.
    label: String,
}

impl MessageClassifier {
    pub fn new(button_label: &str) -> Self {
        Self {
            label: normalize(button_label).to_lowercase(),
        }
    }

    /// Classify an observed message.
    pub fn classify(&self, message: &ChatMessage) -> ClassifiedEvent {
        self.classify_parts(&message.text, &message.controls)
    }

    /// Classify raw text plus the control grid attached to it.
    pub fn classify_parts(&self, text: &str, controls: &[Vec<Control>]) -> ClassifiedEvent {
        match classify_text(text) {
            ClassifiedEvent::Irrelevant => {}
            event => return event,
        }

        match self.find_control(controls) {
            Some((label, row, col)) => ClassifiedEvent::ActionableControl { label, row, col },
            None => ClassifiedEvent::Irrelevant,
        }
    }

    /// First control, row-major, whose label contains the configured label.
    fn find_control(&self, controls: &[Vec<Control>]) -> Option<(String, usize, usize)> {
        controls.iter().enumerate().find_map(|(row, cells)| {
            cells.iter().enumerate().find_map(|(col, control)| {
                let label = normalize(&control.label);
                label
                    .to_lowercase()
                    .contains(&self.label)
                    .then(|| (label, row, col))
            })
        })
    }
}

/// Text-only classification (rules 1 and 2).
///
/// Returns [`ClassifiedEvent::Irrelevant`] when neither a cooldown nor a
/// reward is present; controls are never considered here.
pub fn classify_text(text: &str) -> ClassifiedEvent {
    let normalized = normalize(text);

    if let Some(signal) = detect_cooldown(&normalized) {
        return ClassifiedEvent::CooldownActive {
            remaining: signal.remaining,
        };
    }

    if let Some((amount, currency)) = detect_reward(&normalized) {
        return ClassifiedEvent::RewardGranted { amount, currency };
    }

    ClassifiedEvent::Irrelevant
}
