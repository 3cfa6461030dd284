// Audit report - uncovered issuances rendered deterministically

use super::coverage::CoverageSummary;
use super::index::{IngestSummary, IssuanceIndex};
use crate::error::AuditError;
use chrono::{DateTime, SecondsFormat, Utc};
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One issuance with no covering CAA check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub issued_at: DateTime<Utc>,
    pub name: String,
}

impl fmt::Display for Finding {
    /// `2020-06-04T01:02:03.123456Z: www.example.com`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.issued_at.to_rfc3339_opts(SecondsFormat::Micros, true),
            self.name
        )
    }
}

/// Overall audit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditStatus {
    Pass,
    Fail,
}

/// Outcome of an audit run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub status: AuditStatus,
    /// Sorted by rendered string: chronological, then by name
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub issuance_sources: Vec<IngestSummary>,
    #[serde(default)]
    pub caa_sources: Vec<CoverageSummary>,
}

impl AuditReport {
    /// Build the report from whatever is left in the index
    pub fn build(index: &IssuanceIndex) -> Self {
        let mut findings: Vec<Finding> = index
            .iter()
            .flat_map(|(name, timestamps)| {
                timestamps.iter().map(move |issued_at| Finding {
                    issued_at: *issued_at,
                    name: name.to_string(),
                })
            })
            .collect();
        findings.sort_by_cached_key(Finding::to_string);

        let status = if findings.is_empty() {
            AuditStatus::Pass
        } else {
            AuditStatus::Fail
        };

        Self {
            status,
            findings,
            issuance_sources: Vec::new(),
            caa_sources: Vec::new(),
        }
    }

    pub fn with_sources(
        mut self,
        issuance_sources: Vec<IngestSummary>,
        caa_sources: Vec<CoverageSummary>,
    ) -> Self {
        self.issuance_sources = issuance_sources;
        self.caa_sources = caa_sources;
        self
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings one per line, in report order
    pub fn render_findings(&self) -> String {
        self.findings
            .iter()
            .map(Finding::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `Ok(())` when clean, otherwise [`AuditError::MissingCaaChecks`]
    pub fn into_result(self) -> Result<(), AuditError> {
        if self.is_clean() {
            return Ok(());
        }
        Err(AuditError::MissingCaaChecks {
            count: self.findings.len(),
            report: self.render_findings(),
        })
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, serde_json::Error> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }

    /// Terminal-friendly report
    pub fn to_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", "=".repeat(70).cyan()));
        output.push_str(&format!("{}\n", "CAA Coverage Audit".cyan().bold()));
        output.push_str(&format!("{}\n", "=".repeat(70).cyan()));

        let status_str = match self.status {
            AuditStatus::Pass => "PASS".green().bold(),
            AuditStatus::Fail => "FAIL".red().bold(),
        };
        output.push_str(&format!("Overall Status: {}\n", status_str));

        output.push_str(&format!("\n{}\n", "Sources:".cyan().bold()));
        for source in &self.issuance_sources {
            output.push_str(&format!(
                "  [RA] {}: {} issuance(s), {} out of scope, {} line(s)\n",
                source.source_name, source.issuances, source.out_of_scope, source.lines_read
            ));
        }
        for source in &self.caa_sources {
            output.push_str(&format!(
                "  [VA] {}: {} CAA check(s), {} issuance(s) covered, {} line(s)\n",
                source.source_name, source.checks, source.timestamps_covered, source.lines_read
            ));
        }

        let names = {
            let mut names: Vec<&str> = self.findings.iter().map(|f| f.name.as_str()).collect();
            names.sort_unstable();
            names.dedup();
            names.len()
        };
        output.push_str(&format!("\n{}\n", "Summary:".cyan().bold()));
        output.push_str(&format!(
            "  {} Uncovered issuances: {}\n",
            if self.is_clean() { "✓".green() } else { "✗".red() },
            self.findings.len()
        ));
        output.push_str(&format!("  Names affected:       {}\n", names));

        if !self.is_clean() {
            output.push_str(&format!(
                "\n{}\n",
                "Issuances missing CAA checks:".red().bold()
            ));
            output.push_str(&format!("{}\n", "-".repeat(70)));
            for finding in &self.findings {
                output.push_str(&format!("  {}\n", finding.to_string().yellow()));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logs::IssuanceRecord;
    use chrono::{TimeDelta, TimeZone};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 6, 4, h, 0, 0).unwrap()
    }

    fn record(index: &mut IssuanceIndex, names: &[&str], issued_at: DateTime<Utc>) {
        index.record(&IssuanceRecord {
            serial_number: "02".to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            requester: 1,
            issued_at,
        });
    }

    #[test]
    fn test_empty_index_is_clean() {
        let report = AuditReport::build(&IssuanceIndex::new());

        assert!(report.is_clean());
        assert_eq!(report.status, AuditStatus::Pass);
        assert_eq!(report.render_findings(), "");
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_finding_format() {
        let finding = Finding {
            issued_at: at(1) + TimeDelta::microseconds(42),
            name: "x.example.com".to_string(),
        };
        assert_eq!(finding.to_string(), "2020-06-04T01:00:00.000042Z: x.example.com");
    }

    #[test]
    fn test_findings_sorted_chronologically_then_by_name() {
        let mut index = IssuanceIndex::new();
        record(&mut index, &["b.com"], at(3));
        record(&mut index, &["z.com", "a.com"], at(1));
        record(&mut index, &["b.com"], at(1));

        let report = AuditReport::build(&index);

        assert_eq!(report.status, AuditStatus::Fail);
        assert_eq!(
            report.render_findings(),
            [
                "2020-06-04T01:00:00.000000Z: a.com",
                "2020-06-04T01:00:00.000000Z: b.com",
                "2020-06-04T01:00:00.000000Z: z.com",
                "2020-06-04T03:00:00.000000Z: b.com",
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_order_independent_of_insertion() {
        let mut forward = IssuanceIndex::new();
        let mut backward = IssuanceIndex::new();
        let entries = [("a.com", at(5)), ("b.com", at(2)), ("a.com", at(2)), ("c.com", at(9))];

        for (name, ts) in entries {
            record(&mut forward, &[name], ts);
        }
        for &(name, ts) in entries.iter().rev() {
            record(&mut backward, &[name], ts);
        }

        assert_eq!(
            AuditReport::build(&forward).findings,
            AuditReport::build(&backward).findings
        );
    }

    #[test]
    fn test_into_result_carries_report() {
        let mut index = IssuanceIndex::new();
        record(&mut index, &["x.example.com"], at(1));

        let err = AuditReport::build(&index).into_result().unwrap_err();

        match err {
            AuditError::MissingCaaChecks { count, report } => {
                assert_eq!(count, 1);
                assert_eq!(report, "2020-06-04T01:00:00.000000Z: x.example.com");
            }
            other => panic!("expected findings, got {:?}", other),
        }
    }

    #[test]
    fn test_json_output() {
        let mut index = IssuanceIndex::new();
        record(&mut index, &["x.example.com"], at(1));

        let json = AuditReport::build(&index).to_json(false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["status"], "Fail");
        assert_eq!(value["findings"][0]["name"], "x.example.com");
    }

    #[test]
    fn test_terminal_lists_findings() {
        colored::control::set_override(false);
        let mut index = IssuanceIndex::new();
        record(&mut index, &["x.example.com"], at(1));

        let output = AuditReport::build(&index).to_terminal();

        assert!(output.contains("FAIL"));
        assert!(output.contains("2020-06-04T01:00:00.000000Z: x.example.com"));
    }
}
