// Audit log sources
//
// Reads RA/VA audit logs (plain or gzip) line by line and extracts the two
// record kinds the audit cares about: issuances and CAA checks.

pub mod parser;
pub mod reader;

pub use parser::{
    CaaCheckRecord, IssuanceRecord, LogRecord, parse_caa_check_line, parse_issuance_line,
    parse_line, parse_timestamp,
};
pub use reader::{LogSource, NumberedLines, numbered_lines};
