// Issuance index: name -> issuance timestamps still awaiting a covering CAA check

use super::config::{AuditScope, CoverageWindow};
use crate::error::AuditError;
use crate::logs::{IssuanceRecord, numbered_lines, parse_issuance_line};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;

/// Name -> issuance timestamps, in arrival order.
///
/// A name is present only while it has at least one timestamp left.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuanceIndex {
    issuances: HashMap<String, Vec<DateTime<Utc>>>,
}

/// Counters for one issuance source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub source_name: String,
    pub lines_read: usize,
    /// Issuance records found, in scope or not
    pub issuances: usize,
    /// Issuances skipped by the earliest/latest bounds
    pub out_of_scope: usize,
    /// (name, timestamp) entries appended to the index
    pub timestamps_added: usize,
}

impl IssuanceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the issuance time under every name of the record.
    /// Returns the number of entries appended.
    pub fn record(&mut self, issuance: &IssuanceRecord) -> usize {
        for name in &issuance.names {
            self.issuances
                .entry(name.clone())
                .or_default()
                .push(issuance.issued_at);
        }
        issuance.names.len()
    }

    /// Load every in-scope issuance from one source.
    ///
    /// The whole source is parsed before anything is merged, so on error the
    /// index is left exactly as it was.
    pub fn ingest<R: BufRead>(
        &mut self,
        source_name: &str,
        reader: R,
        scope: &AuditScope,
    ) -> Result<IngestSummary, AuditError> {
        let mut summary = IngestSummary {
            source_name: source_name.to_string(),
            ..Default::default()
        };
        let mut staged = Vec::new();

        for item in numbered_lines(source_name, reader) {
            let (line, text) = item?;
            summary.lines_read = line;

            let record = parse_issuance_line(&text).map_err(|source| AuditError::Parse {
                source_name: source_name.to_string(),
                line,
                source,
            })?;
            let Some(issuance) = record else {
                continue;
            };

            summary.issuances += 1;
            if scope.contains(issuance.issued_at) {
                staged.push(issuance);
            } else {
                summary.out_of_scope += 1;
            }
        }

        for issuance in &staged {
            summary.timestamps_added += self.record(issuance);
        }

        Ok(summary)
    }

    /// Remove every timestamp under `name` covered by a check at `checked_at`,
    /// keeping survivors in their original order. Prunes the name when nothing
    /// is left. Returns the number of timestamps removed.
    pub fn remove_covered(
        &mut self,
        name: &str,
        checked_at: DateTime<Utc>,
        window: &CoverageWindow,
    ) -> usize {
        let Some(timestamps) = self.issuances.get_mut(name) else {
            return 0;
        };

        let before = timestamps.len();
        timestamps.retain(|issued_at| !window.covers(checked_at, *issued_at));
        let removed = before - timestamps.len();

        if timestamps.is_empty() {
            self.issuances.remove(name);
        }
        removed
    }

    /// Number of names still awaiting coverage
    pub fn len(&self) -> usize {
        self.issuances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issuances.is_empty()
    }

    /// Total number of uncovered (name, timestamp) entries
    pub fn pending(&self) -> usize {
        self.issuances.values().map(Vec::len).sum()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.issuances.contains_key(name)
    }

    pub fn timestamps(&self, name: &str) -> Option<&[DateTime<Utc>]> {
        self.issuances.get(name).map(Vec::as_slice)
    }

    /// Iterate in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DateTime<Utc>])> {
        self.issuances
            .iter()
            .map(|(name, timestamps)| (name.as_str(), timestamps.as_slice()))
    }
}
