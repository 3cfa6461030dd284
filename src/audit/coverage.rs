// Coverage reducer
//
// Drains the issuance index with CAA checks. A check covers issuances of the
// checked name inside its window. When the check found no CAA records, the VA
// necessarily walked up the tree and found none at the ancestors either, so
// the same check also covers issuances of every ancestor name below the
// top-level label.

use super::config::CoverageWindow;
use super::index::IssuanceIndex;
use crate::error::AuditError;
use crate::logs::{CaaCheckRecord, numbered_lines, parse_caa_check_line};
use serde::{Deserialize, Serialize};
use std::io::BufRead;

/// Counters for one CAA source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub source_name: String,
    pub lines_read: usize,
    pub checks: usize,
    /// Checks that found no CAA records and so also covered ancestors
    pub checks_without_records: usize,
    /// Index entries removed by this source
    pub timestamps_covered: usize,
}

/// Applies CAA checks to an [`IssuanceIndex`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageReducer {
    window: CoverageWindow,
}

impl CoverageReducer {
    pub fn new(window: CoverageWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> &CoverageWindow {
        &self.window
    }

    /// Remove every issuance covered by one check. Returns the number of
    /// index entries removed.
    pub fn apply_check(&self, check: &CaaCheckRecord, index: &mut IssuanceIndex) -> usize {
        let mut covered = index.remove_covered(&check.name, check.checked_at, &self.window);

        if !check.records_present {
            for ancestor in ancestor_names(&check.name) {
                covered += index.remove_covered(ancestor, check.checked_at, &self.window);
            }
        }

        covered
    }

    /// Apply every CAA check of one source, in file order.
    ///
    /// Stops at the first malformed check line; entries already removed by
    /// earlier lines stay removed.
    pub fn apply_source<R: BufRead>(
        &self,
        source_name: &str,
        reader: R,
        index: &mut IssuanceIndex,
    ) -> Result<CoverageSummary, AuditError> {
        let mut summary = CoverageSummary {
            source_name: source_name.to_string(),
            ..Default::default()
        };

        for item in numbered_lines(source_name, reader) {
            let (line, text) = item?;
            summary.lines_read = line;

            let record = parse_caa_check_line(&text).map_err(|source| AuditError::Parse {
                source_name: source_name.to_string(),
                line,
                source,
            })?;
            let Some(check) = record else {
                continue;
            };

            summary.checks += 1;
            if !check.records_present {
                summary.checks_without_records += 1;
            }
            summary.timestamps_covered += self.apply_check(&check, index);
        }

        Ok(summary)
    }
}

/// Proper ancestors of `name` that an absent-CAA result also vouches for:
/// every suffix starting at the second label, down to but excluding the last
/// label. `a.b.example.com` yields `b.example.com` and `example.com`; the
/// top-level label (`com`) is never yielded.
pub fn ancestor_names(name: &str) -> Vec<&str> {
    let dots: Vec<usize> = name.match_indices('.').map(|(i, _)| i).collect();

    match dots.split_last() {
        Some((_, inner)) => inner.iter().map(|&dot| &name[dot + 1..]).collect(),
        None => Vec::new(),
    }
}
