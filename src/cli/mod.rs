// CLI module - Command line interface and argument parsing
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0

use crate::audit::{AuditConfig, AuditScope, CoverageWindow};
use crate::error::AuditError;
use clap::Parser;

mod output_args;
mod source_args;
mod window_args;

pub use output_args::OutputArgs;
pub use source_args::SourceArgs;
pub use window_args::WindowArgs;

/// caa-log-checker - verify every issuance was preceded by a CAA check
///
/// The Args struct is organized into logical domains:
/// - Log sources to audit (SourceArgs)
/// - Coverage window, tolerance and date scope (WindowArgs)
/// - Report output and logging (OutputArgs)
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, long_about = None)]
#[command(name = "caa-log-checker")]
#[command(about = "Audit RA issuance logs against VA CAA check logs", long_about = None)]
pub struct Args {
    // ============ Log Sources ============
    #[command(flatten)]
    pub sources: SourceArgs,

    // ============ Coverage Window ============
    #[command(flatten)]
    pub window: WindowArgs,

    // ============ Output and Logging ============
    #[command(flatten)]
    pub output: OutputArgs,
}

impl Args {
    /// Validate CLI arguments for logical consistency
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.sources.ra_logs.is_empty() {
            anyhow::bail!("At least one --ra-log is required");
        }
        if self.sources.va_logs.is_empty() {
            anyhow::bail!("At least one --va-logs path is required");
        }
        if self.output.quiet && self.output.verbose > 0 {
            anyhow::bail!("Cannot use --quiet and --verbose together");
        }

        Ok(())
    }

    /// Build the core audit configuration from the window arguments
    pub fn audit_config(&self) -> Result<AuditConfig, AuditError> {
        Ok(AuditConfig {
            window: CoverageWindow::new(self.window.window, self.window.time_tolerance)?,
            scope: AuditScope::new(self.window.earliest, self.window.latest)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_parse_full_command_line() {
        let args = Args::try_parse_from([
            "caa-log-checker",
            "--ra-log",
            "ra1.log",
            "--ra-log",
            "ra2.log.gz",
            "--va-logs",
            "va1.log,va2.log.gz",
            "--window",
            "4h",
            "--time-tolerance",
            "30s",
            "--earliest",
            "20200604",
            "--latest",
            "20200605",
        ])
        .unwrap();

        assert_eq!(
            args.sources.ra_logs,
            vec![PathBuf::from("ra1.log"), PathBuf::from("ra2.log.gz")]
        );
        assert_eq!(
            args.sources.va_logs,
            vec![PathBuf::from("va1.log"), PathBuf::from("va2.log.gz")]
        );
        assert_eq!(args.window.window, Duration::from_secs(4 * 3600));
        assert_eq!(args.window.time_tolerance, Duration::from_secs(30));
        assert_eq!(args.window.earliest, NaiveDate::from_ymd_opt(2020, 6, 4));
        assert!(args.validate().is_ok());

        let config = args.audit_config().unwrap();
        assert!(config.scope.is_bounded());
    }

    #[test]
    fn test_defaults() {
        let args =
            Args::try_parse_from(["caa-log-checker", "--ra-log", "ra.log", "--va-logs", "va.log"])
                .unwrap();

        assert_eq!(args.window.window, Duration::from_secs(8 * 3600));
        assert_eq!(args.window.time_tolerance, Duration::ZERO);
        assert_eq!(args.audit_config().unwrap(), AuditConfig::default());
    }

    #[test]
    fn test_sources_required() {
        assert!(Args::try_parse_from(["caa-log-checker", "--va-logs", "va.log"]).is_err());
        assert!(Args::try_parse_from(["caa-log-checker", "--ra-log", "ra.log"]).is_err());
        assert!(Args::default().validate().is_err());
    }

    #[test]
    fn test_invalid_day_rejected_by_parser() {
        let result = Args::try_parse_from([
            "caa-log-checker",
            "--ra-log",
            "ra.log",
            "--va-logs",
            "va.log",
            "--earliest",
            "2020-06-04",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected_by_parser() {
        let result = Args::try_parse_from([
            "caa-log-checker",
            "--ra-log",
            "ra.log",
            "--va-logs",
            "va.log",
            "--time-tolerance=-5s",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_single_date_bound_rejected() {
        let mut args = Args::default();
        args.window.earliest = NaiveDate::from_ymd_opt(2020, 6, 4);

        assert!(matches!(
            args.audit_config(),
            Err(AuditError::Config { .. })
        ));
    }
}
