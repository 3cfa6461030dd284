// CAA coverage audit - Core module
//
// Reconciles issuance events against CAA check events. All issuance sources are
// loaded into an IssuanceIndex first; each CAA source then drains the index;
// whatever is left is reported as an issuance missing its CAA check.
//
// Nothing in this module logs. Per-source summaries are returned to the caller.

pub mod config;
pub mod coverage;
pub mod index;
pub mod report;

pub use config::{AuditConfig, AuditScope, CoverageWindow, DEFAULT_COVERAGE_WINDOW, parse_day};
pub use coverage::{CoverageReducer, CoverageSummary, ancestor_names};
pub use index::{IngestSummary, IssuanceIndex};
pub use report::{AuditReport, AuditStatus, Finding};

use crate::error::AuditError;
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Loading,
    Draining,
}

/// Drives one audit run over any number of issuance and CAA sources
#[derive(Debug)]
pub struct Auditor {
    config: AuditConfig,
    reducer: CoverageReducer,
    index: IssuanceIndex,
    phase: Phase,
    issuance_sources: Vec<IngestSummary>,
    caa_sources: Vec<CoverageSummary>,
}

impl Auditor {
    pub fn new(config: AuditConfig) -> Self {
        Self {
            config,
            reducer: CoverageReducer::new(config.window),
            index: IssuanceIndex::new(),
            phase: Phase::Loading,
            issuance_sources: Vec::new(),
            caa_sources: Vec::new(),
        }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Load one issuance source. Must happen before any CAA source is applied.
    pub fn load_issuances<R: BufRead>(
        &mut self,
        source_name: &str,
        reader: R,
    ) -> Result<IngestSummary, AuditError> {
        if self.phase != Phase::Loading {
            return Err(AuditError::config(format!(
                "issuance source {} loaded after CAA checks were applied",
                source_name
            )));
        }

        let summary = self.index.ingest(source_name, reader, &self.config.scope)?;
        self.issuance_sources.push(summary.clone());
        Ok(summary)
    }

    /// Apply one CAA source to everything loaded so far
    pub fn apply_caa_checks<R: BufRead>(
        &mut self,
        source_name: &str,
        reader: R,
    ) -> Result<CoverageSummary, AuditError> {
        self.phase = Phase::Draining;

        let summary = self.reducer.apply_source(source_name, reader, &mut self.index)?;
        self.caa_sources.push(summary.clone());
        Ok(summary)
    }

    /// Issuances still waiting for a covering check
    pub fn index(&self) -> &IssuanceIndex {
        &self.index
    }

    pub fn finish(self) -> AuditReport {
        AuditReport::build(&self.index).with_sources(self.issuance_sources, self.caa_sources)
    }
}
