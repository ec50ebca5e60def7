// SPDX-FileCopyrightText: 2026 Claimbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only claim ledger for claimbot.
//!
//! Each namespace owns one CSV file, `<directory>/<namespace>.csv`, with one
//! `<RFC 3339 UTC timestamp>,<amount>` line per granted reward and no header.
//! Rows that fail to parse (including a torn trailing line) are skipped, so
//! the ledger never refuses to load.

pub mod csv_ledger;

pub use csv_ledger::{CsvLedger, LedgerSummary, parse_records};
