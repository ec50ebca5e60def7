// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the CSV claim ledger.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use claimbot_core::{ClaimLedger, Clock};
use claimbot_ledger::CsvLedger;

/// Clock that only moves when told to.
struct ManualClock(Mutex<DateTime<Utc>>);

impl ManualClock {
    fn at(t: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(t)))
    }

    fn set(&self, t: DateTime<Utc>) {
        *self.0.lock().unwrap() = t;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn record_then_last_claim_time() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::at(t0() + TimeDelta::milliseconds(1234));
    let ledger = CsvLedger::new(dir.path(), clock.clone());

    assert_eq!(ledger.last_claim_time("ltc").await.unwrap(), None);

    let written = ledger.record_claim("ltc", 0.00000045).await.unwrap();
    assert_eq!(ledger.last_claim_time("ltc").await.unwrap(), Some(written));
    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 1);
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 0.00000045);
}

#[tokio::test]
async fn file_layout_is_timestamp_comma_amount() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = CsvLedger::new(dir.path(), ManualClock::at(t0()));

    ledger.record_claim("ltc", 1.5).await.unwrap();
    ledger.record_claim("ltc", 2.0).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("ltc.csv")).unwrap();
    assert_eq!(
        content,
        "2026-03-10T12:00:00.000Z,1.5\n2026-03-10T12:00:00.000Z,2\n"
    );
}

#[tokio::test]
async fn missing_directory_is_created_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let ledger = CsvLedger::new(&nested, ManualClock::at(t0()));

    ledger.record_claim("doge", 3.0).await.unwrap();
    assert!(nested.join("doge.csv").exists());
}

#[tokio::test]
async fn weekly_window_excludes_exact_boundary() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::at(t0());
    let ledger = CsvLedger::new(dir.path(), clock.clone());

    ledger.record_claim("ltc", 1.0).await.unwrap();
    clock.set(t0() + TimeDelta::days(1));
    ledger.record_claim("ltc", 2.0).await.unwrap();

    // Exactly seven days after the first record: it drops out.
    clock.set(t0() + TimeDelta::days(7));
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 2.0);

    // One second earlier it still counts.
    clock.set(t0() + TimeDelta::days(7) - TimeDelta::seconds(1));
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 3.0);

    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 2);
}

#[tokio::test]
async fn malformed_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("ltc.csv"),
        "not-a-date,xyz\n2026-03-09T12:00:00.000Z,0.5\n2026-03-09T13:0",
    )
    .unwrap();
    let ledger = CsvLedger::new(dir.path(), ManualClock::at(t0()));

    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 1);
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 0.5);
    assert_eq!(
        ledger.last_claim_time("ltc").await.unwrap(),
        Some(Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn append_after_torn_line_starts_a_new_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ltc.csv");
    std::fs::write(&path, "2026-03-10T11:00:00.000Z,1\n2026-03-10T11:3").unwrap();
    let ledger = CsvLedger::new(dir.path(), ManualClock::at(t0()));

    let written = ledger.record_claim("ltc", 2.0).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "2026-03-10T11:00:00.000Z,1\n2026-03-10T11:3\n2026-03-10T12:00:00.000Z,2\n"
    );
    assert_eq!(ledger.last_claim_time("ltc").await.unwrap(), Some(written));
    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 2);
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 3.0);
}

#[tokio::test]
async fn namespaces_are_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = CsvLedger::new(dir.path(), ManualClock::at(t0()));

    ledger.record_claim("ltc", 1.0).await.unwrap();
    ledger.record_claim("doge", 10.0).await.unwrap();
    ledger.record_claim("doge", 5.0).await.unwrap();

    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 1);
    assert_eq!(ledger.sequence_number("doge").await.unwrap(), 2);
    assert_eq!(ledger.weekly_total("doge").await.unwrap(), 15.0);
}

#[tokio::test]
async fn non_positive_amount_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = CsvLedger::new(dir.path(), ManualClock::at(t0()));

    assert!(ledger.record_claim("ltc", 0.0).await.is_err());
    assert!(ledger.record_claim("ltc", f64::NAN).await.is_err());
    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 0);
}

#[tokio::test]
async fn summary_reads_everything_once() {
    let dir = tempfile::tempdir().unwrap();
    let clock = ManualClock::at(t0() - TimeDelta::days(10));
    let ledger = CsvLedger::new(dir.path(), clock.clone());

    ledger.record_claim("ltc", 4.0).await.unwrap();
    clock.set(t0());
    let last = ledger.record_claim("ltc", 1.0).await.unwrap();

    let summary = ledger.summarize("ltc").await.unwrap();
    assert_eq!(summary.namespace, "ltc");
    assert_eq!(summary.claims, 2);
    assert_eq!(summary.last_claim, Some(last));
    assert_eq!(summary.weekly_total, 1.0);
}

#[tokio::test]
async fn concurrent_appends_are_not_interleaved() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = Arc::new(CsvLedger::new(dir.path(), ManualClock::at(t0())));

    let mut handles = Vec::new();
    for _ in 0..20 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.record_claim("ltc", 0.25).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(ledger.sequence_number("ltc").await.unwrap(), 20);
    assert_eq!(ledger.weekly_total("ltc").await.unwrap(), 5.0);
}
