// Audit log line parser
//
// Boulder-style syslog lines start with an RFC 3339 timestamp, e.g.
//   2020-06-04T01:02:03.123456+00:00 ra1 boulder-ra[42]: 6 boulder-ra ... Certificate request - successful JSON={...}
//   2020-06-04T01:02:03.123456+00:00 va1 boulder-va[42]: 6 boulder-va ... Checked CAA records for example.com, [Present: false, ...

use crate::error::RecordError;
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref ISSUANCE_LINE_RE: Regex =
        Regex::new(r"Certificate request - successful JSON=(.*)").expect("valid issuance regex");
    static ref CAA_CHECK_LINE_RE: Regex =
        Regex::new(r"Checked CAA records for ([a-z0-9.*-]+), \[Present: (true|false)")
            .expect("valid CAA check regex");
}

/// One certificate issuance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuanceRecord {
    pub serial_number: String,
    /// Names as issued, including wildcard labels
    pub names: Vec<String>,
    pub requester: i64,
    /// Log-line timestamp, shared time base with CAA check lines
    pub issued_at: DateTime<Utc>,
}

/// One CAA lookup performed by the VA
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaaCheckRecord {
    pub name: String,
    pub records_present: bool,
    pub checked_at: DateTime<Utc>,
}

/// Result of classifying a single log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    Issuance(IssuanceRecord),
    CaaCheck(CaaCheckRecord),
    /// Any of the many other record types interleaved in the logs
    Unrecognized,
}

/// JSON payload of a successful certificate request line
#[derive(Debug, Deserialize)]
struct IssuancePayload {
    #[serde(rename = "SerialNumber", default)]
    serial_number: String,
    #[serde(rename = "Names")]
    names: Vec<String>,
    #[serde(rename = "Requester", default)]
    requester: i64,
}

/// Parse a line from an issuance (RA) log.
///
/// Returns `Ok(None)` for any line that is not a successful certificate
/// request, including CAA check lines. An error means the line is an
/// issuance but its timestamp or payload cannot be decoded.
pub fn parse_issuance_line(line: &str) -> Result<Option<IssuanceRecord>, RecordError> {
    let Some(captures) = ISSUANCE_LINE_RE.captures(line) else {
        return Ok(None);
    };

    let payload: IssuancePayload = serde_json::from_str(&captures[1])?;
    if payload.names.is_empty() {
        return Err(RecordError::NoNames {
            serial: payload.serial_number,
        });
    }

    Ok(Some(IssuanceRecord {
        serial_number: payload.serial_number,
        names: payload.names,
        requester: payload.requester,
        issued_at: parse_timestamp(line)?,
    }))
}

/// Parse a line from a CAA check (VA) log.
///
/// Returns `Ok(None)` for any line that is not a CAA check, including
/// issuance lines, whose JSON payload is never decoded here.
pub fn parse_caa_check_line(line: &str) -> Result<Option<CaaCheckRecord>, RecordError> {
    let Some(captures) = CAA_CHECK_LINE_RE.captures(line) else {
        return Ok(None);
    };

    Ok(Some(CaaCheckRecord {
        name: captures[1].to_string(),
        records_present: &captures[2] == "true",
        checked_at: parse_timestamp(line)?,
    }))
}

/// Classify a raw log line of either kind.
///
/// Lines that match neither record shape are `Unrecognized`, never an error.
pub fn parse_line(line: &str) -> Result<LogRecord, RecordError> {
    if let Some(issuance) = parse_issuance_line(line)? {
        return Ok(LogRecord::Issuance(issuance));
    }
    if let Some(check) = parse_caa_check_line(line)? {
        return Ok(LogRecord::CaaCheck(check));
    }
    Ok(LogRecord::Unrecognized)
}

/// Parse the leading RFC 3339 timestamp token of a log line, normalized to UTC
pub fn parse_timestamp(line: &str) -> Result<DateTime<Utc>, RecordError> {
    let token = line
        .split_whitespace()
        .next()
        .ok_or(RecordError::MissingTimestamp)?;

    DateTime::parse_from_rfc3339(token)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| RecordError::InvalidTimestamp {
            token: token.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const RA_LINE: &str = r#"2020-06-04T01:02:03.123456+00:00 ra1 boulder-ra[1234]: 6 boulder-ra 1bE2cgI Certificate request - successful JSON={"ID":"abc","Requester":1001,"SerialNumber":"03a1b2","Names":["example.com","www.example.com"],"ResponseTime":"2020-06-04T01:02:04Z"}"#;
    const VA_LINE: &str = "2020-06-04T00:30:00.000000+00:00 va1 boulder-va[99]: 6 boulder-va 9kd Checked CAA records for www.example.com, [Present: false, Account ID: 1001, Challenge: http-01, Valid for issuance: true]";

    #[test]
    fn test_parse_issuance_line() {
        let record = parse_line(RA_LINE).unwrap();

        let LogRecord::Issuance(issuance) = record else {
            panic!("expected issuance record");
        };
        assert_eq!(issuance.serial_number, "03a1b2");
        assert_eq!(issuance.requester, 1001);
        assert_eq!(issuance.names, vec!["example.com", "www.example.com"]);
        assert_eq!(
            issuance.issued_at,
            Utc.with_ymd_and_hms(2020, 6, 4, 1, 2, 3).unwrap()
                + chrono::TimeDelta::microseconds(123_456)
        );
    }

    #[test]
    fn test_parse_caa_check_line() {
        let record = parse_line(VA_LINE).unwrap();

        assert_eq!(
            record,
            LogRecord::CaaCheck(CaaCheckRecord {
                name: "www.example.com".to_string(),
                records_present: false,
                checked_at: Utc.with_ymd_and_hms(2020, 6, 4, 0, 30, 0).unwrap(),
            })
        );
    }

    #[test]
    fn test_caa_check_wildcard_and_present() {
        let line = "2020-06-04T00:30:00+00:00 va1 boulder-va[99]: Checked CAA records for *.example.com, [Present: true, Valid for issuance: true]";

        let LogRecord::CaaCheck(check) = parse_line(line).unwrap() else {
            panic!("expected CAA check");
        };
        assert_eq!(check.name, "*.example.com");
        assert!(check.records_present);
    }

    #[test]
    fn test_unrelated_lines_are_unrecognized() {
        for line in [
            "",
            "2020-06-04T01:02:03+00:00 ra1 boulder-ra[1]: 6 boulder-ra Certificate request - failed",
            "2020-06-04T01:02:03+00:00 va1 boulder-va[1]: Checked CAA records for EXAMPLE.COM, [Present: true",
            "not even a timestamp",
        ] {
            assert_eq!(parse_line(line).unwrap(), LogRecord::Unrecognized, "{line}");
        }
    }

    #[test]
    fn test_offset_timestamp_normalized_to_utc() {
        let ts = parse_timestamp("2020-06-04T03:00:00+02:00 host prog: msg").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 6, 4, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_recognized_line_with_bad_timestamp_fails() {
        let line = "Jun  4 01:02:03 va1 boulder-va: Checked CAA records for example.com, [Present: true";

        let err = parse_line(line).unwrap_err();
        assert!(matches!(err, RecordError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_recognized_line_with_bad_json_fails() {
        let line = "2020-06-04T01:02:03+00:00 ra1 boulder-ra[1]: Certificate request - successful JSON={\"Names\":";

        let err = parse_line(line).unwrap_err();
        assert!(matches!(err, RecordError::InvalidPayload(_)));
    }

    #[test]
    fn test_issuance_without_names_fails() {
        let line = r#"2020-06-04T01:02:03+00:00 ra1 boulder-ra[1]: Certificate request - successful JSON={"SerialNumber":"ff","Names":[]}"#;

        let err = parse_line(line).unwrap_err();
        assert!(matches!(err, RecordError::NoNames { ref serial } if serial == "ff"));
    }

    #[test]
    fn test_kind_parsers_ignore_foreign_lines() {
        assert_eq!(parse_issuance_line(VA_LINE).unwrap(), None);
        assert_eq!(parse_caa_check_line(RA_LINE).unwrap(), None);

        // malformed lines of the other kind are not looked at
        let bad_check = "Jun  4 01:02:03 va1 boulder-va: Checked CAA records for example.com, [Present: true";
        let bad_issuance = "2020-06-04T01:02:03+00:00 ra1 boulder-ra[1]: Certificate request - successful JSON={\"Names\":";
        assert_eq!(parse_issuance_line(bad_check).unwrap(), None);
        assert_eq!(parse_caa_check_line(bad_issuance).unwrap(), None);
    }

    #[test]
    fn test_kind_parsers_match_parse_line() {
        let issuance = parse_issuance_line(RA_LINE).unwrap().unwrap();
        assert_eq!(parse_line(RA_LINE).unwrap(), LogRecord::Issuance(issuance));

        let check = parse_caa_check_line(VA_LINE).unwrap().unwrap();
        assert_eq!(parse_line(VA_LINE).unwrap(), LogRecord::CaaCheck(check));
    }

    #[test]
    fn test_missing_timestamp() {
        assert!(matches!(
            parse_timestamp("   "),
            Err(RecordError::MissingTimestamp)
        ));
    }
}
