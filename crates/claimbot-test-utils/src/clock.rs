// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Manually driven clock.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};

use claimbot_core::Clock;

/// A [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct FakeClock {
    now: Mutex<DateTime<Utc>>,
}

impl FakeClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Fixed, arbitrary starting instant shared by most tests.
    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(Self::epoch())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_by_duration() {
        let clock = FakeClock::default();
        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), FakeClock::epoch() + TimeDelta::seconds(90));
    }

    #[test]
    fn set_overrides() {
        let clock = FakeClock::default();
        let later = FakeClock::epoch() + TimeDelta::days(3);
        clock.set(later);
        assert_eq!(clock.now(), later);
    }
}
