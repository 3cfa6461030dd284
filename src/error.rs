// Error types for caa-log-checker
//
// Parse and I/O failures are operational errors: the logs could not be audited.
// MissingCaaChecks is the compliance outcome: the logs were audited and some
// issuances had no covering CAA check. Callers must keep the two apart.

use std::io;
use thiserror::Error;

/// Main error type for audit operations
#[derive(Debug, Error)]
pub enum AuditError {
    /// A line matched a known record shape but its fields could not be decoded
    #[error("{source_name}: line {line}: {source}")]
    Parse {
        source_name: String,
        line: usize,
        #[source]
        source: RecordError,
    },

    /// A log source could not be opened
    #[error("failed to open {path}: {source}")]
    FileSystem {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading from an already opened source failed (truncated or corrupt gzip)
    #[error("{source_name}: read failed at line {line}: {source}")]
    Read {
        source_name: String,
        line: usize,
        #[source]
        source: io::Error,
    },

    /// Invalid window, tolerance or date bounds
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// One or more issuances were not covered by any CAA check
    #[error("the following {count} issuance(s) were missing CAA checks:\n{report}")]
    MissingCaaChecks { count: usize, report: String },
}

impl AuditError {
    pub fn config(message: impl Into<String>) -> Self {
        AuditError::Config {
            message: message.into(),
        }
    }

    /// True for the compliance outcome, false for operational failures
    pub fn is_finding(&self) -> bool {
        matches!(self, AuditError::MissingCaaChecks { .. })
    }
}

/// Why a recognized log line could not be turned into a record
#[derive(Debug, Error)]
pub enum RecordError {
    /// The line has no leading timestamp token at all
    #[error("missing leading timestamp")]
    MissingTimestamp,

    /// The leading token is not an RFC 3339 timestamp
    #[error("failed to parse timestamp {token:?}: {source}")]
    InvalidTimestamp {
        token: String,
        #[source]
        source: chrono::ParseError,
    },

    /// The issuance JSON payload is malformed or lacks required fields
    #[error("failed to unmarshal JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The issuance payload decoded but lists no names
    #[error("issuance {serial} lists no names")]
    NoNames { serial: String },
}
