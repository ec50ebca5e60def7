// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV-file implementation of [`ClaimLedger`].

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use claimbot_core::{ClaimLedger, ClaimRecord, ClaimbotError, Clock};

/// Length of the rolling window used by [`ClaimLedger::weekly_total`].
fn week() -> TimeDelta {
    TimeDelta::days(7)
}

fn ledger_err(e: impl std::error::Error + Send + Sync + 'static) -> ClaimbotError {
    ClaimbotError::Ledger {
        source: Box::new(e),
    }
}

/// Aggregates for one namespace, computed from a single read.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub namespace: String,
    pub claims: u64,
    pub last_claim: Option<DateTime<Utc>>,
    pub weekly_total: f64,
}

/// Ledger storing one CSV file per namespace.
///
/// Appends are serialized in-process and each record is written with a
/// single append of a complete line.
pub struct CsvLedger {
    directory: PathBuf,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl CsvLedger {
    pub fn new(directory: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            directory: directory.into(),
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File backing `namespace`.
    pub fn path_for(&self, namespace: &str) -> PathBuf {
        self.directory.join(format!("{namespace}.csv"))
    }

    /// All valid records of `namespace`, in file order.
    pub async fn records(&self, namespace: &str) -> Result<Vec<ClaimRecord>, ClaimbotError> {
        let path = self.path_for(namespace);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ledger_err(e)),
        };
        Ok(parse_records(namespace, &bytes))
    }

    /// Count, last claim and trailing-week total in one pass.
    pub async fn summarize(&self, namespace: &str) -> Result<LedgerSummary, ClaimbotError> {
        let records = self.records(namespace).await?;
        let cutoff = self.clock.now() - week();
        Ok(LedgerSummary {
            namespace: namespace.to_string(),
            claims: records.len() as u64,
            last_claim: records.iter().map(|r| r.timestamp).max(),
            weekly_total: sum_since(&records, cutoff),
        })
    }
}

fn sum_since(records: &[ClaimRecord], cutoff: DateTime<Utc>) -> f64 {
    records
        .iter()
        .filter(|r| r.timestamp > cutoff)
        .map(|r| r.amount)
        .sum()
}

/// Parse ledger bytes, skipping every row that is not `<timestamp>,<amount>`.
pub fn parse_records(namespace: &str, bytes: &[u8]) -> Vec<ClaimRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 1;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!(namespace, line, error = %e, "skipping unreadable ledger row");
                continue;
            }
        };

        match parse_row(&row) {
            Some(record) => records.push(record),
            None => warn!(namespace, line, "skipping malformed ledger row"),
        }
    }
    records
}

/// Whether a non-empty file lacks its final newline, e.g. after a torn write.
async fn ends_mid_line(file: &mut tokio::fs::File) -> std::io::Result<bool> {
    let len = file.metadata().await?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::Start(len - 1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] != b'\n')
}

fn parse_row(row: &csv::StringRecord) -> Option<ClaimRecord> {
    if row.len() != 2 {
        return None;
    }
    let timestamp = DateTime::parse_from_rfc3339(row.get(0)?.trim())
        .ok()?
        .with_timezone(&Utc);
    let amount: f64 = row.get(1)?.trim().parse().ok()?;
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    Some(ClaimRecord { timestamp, amount })
}

#[async_trait]
impl ClaimLedger for CsvLedger {
    async fn last_claim_time(&self, namespace: &str) -> Result<Option<DateTime<Utc>>, ClaimbotError> {
        let records = self.records(namespace).await?;
        Ok(records.iter().map(|r| r.timestamp).max())
    }

    async fn record_claim(&self, namespace: &str, amount: f64) -> Result<DateTime<Utc>, ClaimbotError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(ClaimbotError::Internal(format!(
                "refusing to record non-positive amount {amount}"
            )));
        }

        let _guard = self.write_lock.lock().await;

        // Stored with millisecond precision; return exactly what readers will see.
        let timestamp = self.clock.now().trunc_subsecs(3);
        let line = format!(
            "{},{}\n",
            timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            amount
        );

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(ledger_err)?;

        let path = self.path_for(namespace);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await
            .map_err(ledger_err)?;
        if ends_mid_line(&mut file).await.map_err(ledger_err)? {
            warn!(namespace, path = %path.display(), "terminating partial ledger line");
            file.write_all(b"\n").await.map_err(ledger_err)?;
        }
        file.write_all(line.as_bytes()).await.map_err(ledger_err)?;
        file.flush().await.map_err(ledger_err)?;
        file.sync_data().await.map_err(ledger_err)?;

        debug!(namespace, amount, path = %path.display(), "claim recorded");
        Ok(timestamp)
    }

    async fn weekly_total(&self, namespace: &str) -> Result<f64, ClaimbotError> {
        let records = self.records(namespace).await?;
        Ok(sum_since(&records, self.clock.now() - week()))
    }

    async fn sequence_number(&self, namespace: &str) -> Result<u64, ClaimbotError> {
        Ok(self.records(namespace).await?.len() as u64)
    }
}
