//! Point-in-time export of the tally as JSON.
//!
//! The watch loop itself never persists anything; a snapshot is written only
//! when asked for (the `s` key in the dashboard, `follow --snapshot`, or
//! `summarize --json`).

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::chart::StackOrder;
use crate::watch::WatchState;

/// One keyword's display slot, in stack order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub rank: usize,
    pub color: String,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub source: String,
    pub captured_at: String,
    pub stack_order: String,
    pub records: u64,
    pub malformed: u64,
    pub blank: u64,
    pub authors: BTreeMap<String, BTreeMap<String, u64>>,
    pub keywords: Vec<KeywordEntry>,
    pub mentionwatch_version: String,
}

impl Snapshot {
    pub fn capture(source: &Path, state: &WatchState, order: StackOrder) -> Self {
        let view = state.view(order);
        let keywords = view
            .series
            .iter()
            .map(|s| KeywordEntry {
                keyword: s.keyword.clone(),
                rank: s.rank,
                color: s.color.hex(),
                total: s.total(),
            })
            .collect();

        Self {
            version: 1,
            source: source.display().to_string(),
            captured_at: format_iso8601(
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default(),
            ),
            stack_order: order.label().to_string(),
            records: state.tally.records(),
            malformed: state.tally.malformed(),
            blank: state.tally.blank(),
            authors: state.tally.counts().clone(),
            keywords,
            mentionwatch_version: crate::VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = self.to_json().map_err(io::Error::other)?;
        fs::write(path, json)
    }

    pub fn read_from(path: &Path) -> io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// `mentionwatch-snapshot-<unix seconds>.json`, for exports into the
/// working directory.
pub fn default_snapshot_name() -> String {
    let epoch = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("mentionwatch-snapshot-{epoch}.json")
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Format a duration-since-epoch as an ISO-8601 UTC timestamp.
/// Example: `2026-02-15T01:30:00Z`
fn format_iso8601(since_epoch: Duration) -> String {
    let secs = since_epoch.as_secs();
    let (year, month, day) = civil_from_days(secs / 86_400);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}Z",
        rem / 3600,
        (rem / 60) % 60,
        rem % 60
    )
}

/// Days since 1970-01-01 → (year, month, day), proleptic Gregorian.
fn civil_from_days(days: u64) -> (u64, u64, u64) {
    let mut days = days;
    let mut year = 1970u64;
    loop {
        let len = if is_leap(year) { 366 } else { 365 };
        if days < len {
            break;
        }
        days -= len;
        year += 1;
    }

    let feb = if is_leap(year) { 29 } else { 28 };
    let month_lengths = [31, feb, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    let mut month = 1u64;
    for len in month_lengths {
        if days < len {
            break;
        }
        days -= len;
        month += 1;
    }
    (year, month, days + 1)
}

fn is_leap(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
