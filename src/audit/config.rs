// Audit configuration: coverage window, clock tolerance and date scope

use crate::error::AuditError;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::time::Duration;

/// How long after a CAA check an issuance for the checked name is authorized
pub const DEFAULT_COVERAGE_WINDOW: Duration = Duration::from_secs(8 * 60 * 60);

/// Day format accepted for `--earliest` / `--latest`
pub const DAY_FORMAT: &str = "%Y%m%d";

/// The interval, relative to a CAA check at `c`, in which an issuance at `t`
/// counts as covered: `c - tolerance <= t <= c + window + tolerance`.
///
/// With zero tolerance a check never covers an issuance that happened before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageWindow {
    window: TimeDelta,
    tolerance: TimeDelta,
    upper: TimeDelta,
}

impl CoverageWindow {
    pub fn new(window: Duration, tolerance: Duration) -> Result<Self, AuditError> {
        if window.is_zero() {
            return Err(AuditError::config("coverage window must be positive"));
        }

        let window = TimeDelta::from_std(window)
            .map_err(|_| AuditError::config("coverage window is out of range"))?;
        let tolerance = TimeDelta::from_std(tolerance)
            .map_err(|_| AuditError::config("time tolerance is out of range"))?;
        let upper = window
            .checked_add(&tolerance)
            .ok_or_else(|| AuditError::config("coverage window plus tolerance is out of range"))?;

        Ok(Self {
            window,
            tolerance,
            upper,
        })
    }

    pub fn window(&self) -> TimeDelta {
        self.window
    }

    pub fn tolerance(&self) -> TimeDelta {
        self.tolerance
    }

    /// Whether a check at `checked_at` covers an issuance at `issued_at`
    pub fn covers(&self, checked_at: DateTime<Utc>, issued_at: DateTime<Utc>) -> bool {
        let diff = issued_at.signed_duration_since(checked_at);
        diff >= -self.tolerance && diff <= self.upper
    }
}

impl Default for CoverageWindow {
    fn default() -> Self {
        let window = TimeDelta::hours(8);
        Self {
            window,
            tolerance: TimeDelta::zero(),
            upper: window,
        }
    }
}

/// Which issuances are in scope for the audit.
///
/// Either unbounded, or a half-open range `[earliest, latest)` of UTC days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditScope {
    bounds: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl AuditScope {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a scope from optional day bounds. Both or neither must be given,
    /// and `earliest` must be strictly before `latest`.
    pub fn new(earliest: Option<NaiveDate>, latest: Option<NaiveDate>) -> Result<Self, AuditError> {
        match (earliest, latest) {
            (None, None) => Ok(Self::unbounded()),
            (Some(earliest), Some(latest)) => {
                if earliest >= latest {
                    return Err(AuditError::config(format!(
                        "earliest date ({}) must be before latest date ({})",
                        earliest.format(DAY_FORMAT),
                        latest.format(DAY_FORMAT)
                    )));
                }
                Ok(Self {
                    bounds: Some((start_of_day(earliest), start_of_day(latest))),
                })
            }
            _ => Err(AuditError::config(
                "earliest and latest must be both set or both unset",
            )),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.bounds
    }

    pub fn contains(&self, issued_at: DateTime<Utc>) -> bool {
        match self.bounds {
            Some((earliest, latest)) => earliest <= issued_at && issued_at < latest,
            None => true,
        }
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Parse a `YYYYMMDD` day, e.g. `20200604`
pub fn parse_day(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|e| format!("invalid day {:?} (expected YYYYMMDD): {}", value, e))
}

/// Everything the core needs besides the log sources themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuditConfig {
    pub window: CoverageWindow,
    pub scope: AuditScope,
}
