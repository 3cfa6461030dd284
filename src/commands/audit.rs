// AuditCommand - Reconcile RA issuance logs against VA CAA check logs
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use super::Command;
use crate::audit::{AuditReport, Auditor};
use crate::error::AuditError;
use crate::logs::LogSource;
use crate::{Args, Result};
use anyhow::Context;
use tracing::{debug, info, warn};

/// AuditCommand runs a full audit
///
/// This command is responsible for:
/// - Loading every RA log into the issuance index
/// - Applying every VA log, one at a time, in the order given
/// - Printing the report and writing the JSON export if requested
/// - Failing with `MissingCaaChecks` when any issuance is uncovered
pub struct AuditCommand {
    args: Args,
}

impl AuditCommand {
    /// Create a new AuditCommand with the given arguments
    pub fn new(args: Args) -> Self {
        Self { args }
    }

    /// Run the audit pipeline without printing anything
    pub fn run(&self) -> std::result::Result<AuditReport, AuditError> {
        let config = self.args.audit_config()?;
        info!(
            window = ?config.window.window(),
            tolerance = ?config.window.tolerance(),
            bounded = config.scope.is_bounded(),
            "Starting CAA coverage audit"
        );

        let mut auditor = Auditor::new(config);

        for path in &self.args.sources.ra_logs {
            let (name, reader) = LogSource::open(path)?.into_parts();
            debug!(source = %name, "Loading issuance log");

            let summary = auditor.load_issuances(&name, reader)?;
            info!(
                source = %summary.source_name,
                lines = summary.lines_read,
                issuances = summary.issuances,
                out_of_scope = summary.out_of_scope,
                "Loaded issuance log"
            );
        }
        info!(
            names = auditor.index().len(),
            pending = auditor.index().pending(),
            "Issuance index built"
        );

        for path in &self.args.sources.va_logs {
            let (name, reader) = LogSource::open(path)?.into_parts();
            debug!(source = %name, "Processing CAA log");

            let summary = auditor.apply_caa_checks(&name, reader)?;
            info!(
                source = %summary.source_name,
                lines = summary.lines_read,
                checks = summary.checks,
                covered = summary.timestamps_covered,
                remaining = auditor.index().pending(),
                "Processed CAA log"
            );
        }

        Ok(auditor.finish())
    }

    fn write_json(&self, report: &AuditReport) -> Result<()> {
        let Some(path) = &self.args.output.json else {
            return Ok(());
        };

        let json = report.to_json(self.args.output.json_pretty)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write JSON report to {}", path.display()))?;
        info!(path = %path.display(), "JSON report written");
        Ok(())
    }
}

impl Command for AuditCommand {
    fn execute(&self) -> Result<()> {
        self.args.validate()?;

        let report = self.run()?;
        self.write_json(&report)?;
        if !self.args.output.quiet {
            println!("{}", report.to_terminal());
        }

        if !report.is_clean() {
            warn!(
                findings = report.findings.len(),
                "Issuances missing CAA checks"
            );
        }
        report.into_result()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "AuditCommand"
    }
}
