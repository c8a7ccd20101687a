//! Running author → keyword → count aggregate.

use std::collections::{BTreeMap, BTreeSet};

use crate::palette::Colorizer;
use crate::record::{DecodeError, Record};

/// What happened to one input line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Empty or whitespace-only; ignored.
    Blank,
    /// Could not be decoded; the tally is unchanged.
    Malformed(DecodeError),
    /// Decoded and counted.
    Applied(Record),
}

/// Mention counts per author, plus line bookkeeping.
///
/// Counts only ever grow. Authors and keywords are kept in sorted maps so
/// iteration order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    counts: BTreeMap<String, BTreeMap<String, u64>>,
    records: u64,
    malformed: u64,
    blank: u64,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record. Returns the new count for its (author, keyword).
    pub fn apply(&mut self, record: &Record) -> u64 {
        let slot = self
            .counts
            .entry(record.author.clone())
            .or_default()
            .entry(record.keyword.clone())
            .or_insert(0);
        *slot += 1;
        self.records += 1;
        *slot
    }

    /// Decode a raw line and count it, assigning the keyword a color on
    /// first sight.
    pub fn ingest_line(&mut self, line: &str, colors: &mut Colorizer) -> LineOutcome {
        if line.trim().is_empty() {
            self.blank += 1;
            return LineOutcome::Blank;
        }
        match Record::decode(line) {
            Ok(record) => {
                colors.assign(&record.keyword);
                self.apply(&record);
                LineOutcome::Applied(record)
            }
            Err(e) => {
                self.malformed += 1;
                LineOutcome::Malformed(e)
            }
        }
    }

    pub fn count(&self, author: &str, keyword: &str) -> u64 {
        self.counts
            .get(author)
            .and_then(|per| per.get(keyword))
            .copied()
            .unwrap_or(0)
    }

    /// Authors in ascending order.
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.counts.keys().map(String::as_str)
    }

    pub fn author_counts(&self, author: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(author)
    }

    /// Union of keywords across all authors.
    pub fn keywords(&self) -> BTreeSet<&str> {
        self.counts
            .values()
            .flat_map(|per| per.keys().map(String::as_str))
            .collect()
    }

    pub fn counts(&self) -> &BTreeMap<String, BTreeMap<String, u64>> {
        &self.counts
    }

    /// Sum of every count; equals [`Tally::records`].
    pub fn total(&self) -> u64 {
        self.counts.values().flat_map(|per| per.values()).sum()
    }

    pub fn records(&self) -> u64 {
        self.records
    }

    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    pub fn blank(&self) -> u64 {
        self.blank
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
